//! `.returns(values)` becomes a block yielding the values.

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::position::spans_lines;
use crate::span::Span;
use crate::tree::Node;

use super::block::{self, BlockBody};
use super::{call_of, receiver_of};

const SEPARATOR: &str = ", ";

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
) -> Result<(), SyntaxError> {
    let call = call_of(node, "returns")?;
    let receiver = receiver_of(call, "returns")?;
    let arguments = call
        .arguments
        .as_ref()
        .ok_or_else(|| SyntaxError::internal_error("returns without arguments"))?;
    let items = arguments.items.as_slice();
    let values = arguments
        .items_span()
        .ok_or_else(|| SyntaxError::internal_error("returns without values"))?;
    let source = dispatcher.source();

    dispatcher.dispatch(receiver)?;
    dispatcher.dispatch_all(items)?;

    let edits = dispatcher.edits();
    if items.iter().all(Node::is_pair) {
        edits.wrap(values, "{ ", " }");
    } else if items.len() > 1 {
        edits.wrap(values, "[", "]");
        if !spans_lines(values.text(source)) {
            for gap in items
                .windows(2)
                .filter_map(|pair| match pair {
                    [left, right] => Some(Span::new(left.span.end, right.span.start)),
                    _ => None,
                })
                .filter(|gap| needs_normalising(gap.text(source)))
            {
                edits.replace(gap, SEPARATOR);
            }
        }
    }

    block::wrap(
        edits,
        source,
        &BlockBody {
            head_start: receiver.span.end,
            arguments,
            body: values,
        },
    );
    dispatcher.count_conversion();
    Ok(())
}

/// Returns `true` for a plain comma separator not already spelt `", "`.
fn needs_normalising(gap: &str) -> bool {
    gap != SEPARATOR && gap.trim() == ","
}
