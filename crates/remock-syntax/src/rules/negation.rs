//! `.never` turns the declaration beneath it into `to_not receive`.
//!
//! A `returns` between the declaration and `.never` can never fire and is
//! dropped with its values.

use crate::dispatch::{Dispatcher, declaration_beneath};
use crate::error::SyntaxError;
use crate::synthetic::{Polarity, Synthetic};
use crate::tree::Node;

use super::{call_of, receiver_of, tail};

pub(crate) fn handle<'t>(
    dispatcher: &mut Dispatcher<'t>,
    node: &'t Node,
) -> Result<(), SyntaxError> {
    let call = call_of(node, "negation")?;
    let receiver = receiver_of(call, "negation")?;
    let target = declaration_beneath(receiver)
        .ok_or_else(|| SyntaxError::internal_error("never without a declaration"))?;

    let mut current = receiver;
    while !std::ptr::eq(current, target) {
        let step = call_of(current, "negation")?;
        let inner = receiver_of(step, "negation")?;
        if step.is("returns") || step.items().is_empty() {
            dispatcher.edits().remove(tail(inner, current));
        } else {
            dispatcher.dispatch_all(step.items())?;
        }
        current = inner;
    }

    dispatcher.count_conversion();
    let declaration = Synthetic::declaration(target, Polarity::Negated)?;
    dispatcher.dispatch_synthetic(declaration)?;
    dispatcher.edits().remove(tail(receiver, node));
    Ok(())
}
