//! `stubs`/`expects` declarations become `allow(...)`/`expect(...)`.

use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::synthetic::{Declaration, Polarity, Synthetic};
use crate::tree::Node;

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
    polarity: Polarity,
) -> Result<(), SyntaxError> {
    let declaration = Synthetic::declaration(node, polarity)?;
    dispatcher.count_conversion();
    dispatcher.dispatch_synthetic(declaration)
}

pub(crate) fn render<'t>(
    dispatcher: &mut Dispatcher<'t>,
    declaration: &Declaration<'t>,
) -> Result<(), SyntaxError> {
    let connective = declaration.connective();
    debug!(connective, polarity = ?declaration.polarity, "render declaration");

    let source = dispatcher.source();
    dispatcher.dispatch(declaration.subject)?;
    let edits = dispatcher.edits();
    if let Some(qualifier) = declaration.qualifier {
        edits.remove(qualifier);
    }
    edits.wrap(declaration.subject.span, format!("{connective}("), ")");
    // `&.` and `::` cannot precede the connective.
    if let Some(dot) = declaration.call.dot
        && dot.text(source) != "."
    {
        edits.replace(dot, ".");
    }
    edits.remove(declaration.call.selector);

    let receive = Synthetic::receive(declaration)?;
    dispatcher.dispatch_synthetic(receive)
}
