//! Rewrite rules, one module per construct.
//!
//! Each rule queues edits for the construct it owns and re-enters the
//! dispatcher for the sub-expressions it leaves in place. Nested nodes are
//! dispatched before the rule queues its own enclosing insertions, so outer
//! text always wraps inner text at a shared offset.

pub(crate) mod block;
pub(crate) mod connective;
pub(crate) mod declaration;
pub(crate) mod literal;
pub(crate) mod matcher;
pub(crate) mod negation;
pub(crate) mod raises;
pub(crate) mod returns;

use crate::error::SyntaxError;
use crate::span::Span;
use crate::tree::{Call, Node};

/// Returns the call a classified node must be.
fn call_of<'t>(node: &'t Node, rule: &str) -> Result<&'t Call, SyntaxError> {
    node.as_call()
        .ok_or_else(|| SyntaxError::internal_error(format!("{rule} rule applied to a non-call")))
}

/// Returns the receiver of an attachment call.
fn receiver_of<'t>(call: &'t Call, rule: &str) -> Result<&'t Node, SyntaxError> {
    call.receiver
        .as_deref()
        .ok_or_else(|| SyntaxError::internal_error(format!("{rule} rule needs a receiver")))
}

/// Returns the span from the end of `receiver` to the end of `node`, which
/// covers `.method(args)` of an attachment.
const fn tail(receiver: &Node, node: &Node) -> Span {
    Span::new(receiver.span.end, node.span.end)
}
