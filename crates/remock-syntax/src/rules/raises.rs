//! `.raises(error)` becomes `{ raise error }`.

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::span::Span;
use crate::tree::{Arguments, Node};

use super::{call_of, receiver_of, tail};

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
) -> Result<(), SyntaxError> {
    let call = call_of(node, "raises")?;
    let receiver = receiver_of(call, "raises")?;

    dispatcher.dispatch(receiver)?;
    dispatcher.dispatch_all(call.items())?;

    let edits = dispatcher.edits();
    match call.arguments.as_ref().and_then(Arguments::items_span) {
        Some(raised) => {
            edits.remove(Span::new(receiver.span.end, raised.start));
            edits.wrap(raised, " { raise ", " }");
            edits.remove(Span::new(raised.end, node.span.end));
        }
        None => edits.replace(tail(receiver, node), " { raise }"),
    }
    dispatcher.count_conversion();
    Ok(())
}
