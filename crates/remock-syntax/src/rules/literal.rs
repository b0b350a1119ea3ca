//! `stub` and `mock` literals become `double`.

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::tree::{Node, NodeKind};

const DOUBLE: &str = "double";

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
) -> Result<(), SyntaxError> {
    match &node.kind {
        NodeKind::Call(call) => {
            dispatcher.dispatch_all(call.items())?;
            dispatcher.edits().replace(call.selector, DOUBLE);
        }
        NodeKind::Identifier(_) => dispatcher.edits().replace(node.span, DOUBLE),
        _ => {
            return Err(SyntaxError::internal_error(
                "literal rule applied to a non-literal",
            ));
        }
    }
    dispatcher.count_conversion();
    Ok(())
}
