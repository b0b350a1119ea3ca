//! `.with` without arguments carries no constraint and is dropped.

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::tree::Node;

use super::{call_of, receiver_of, tail};

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
) -> Result<(), SyntaxError> {
    let call = call_of(node, "matcher")?;
    let receiver = receiver_of(call, "matcher")?;

    dispatcher.dispatch(receiver)?;
    dispatcher.edits().remove(tail(receiver, node));
    dispatcher.count_conversion();
    Ok(())
}
