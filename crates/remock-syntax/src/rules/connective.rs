//! Renders `to receive(...)`, `to_not receive(...)` and
//! `to receive_messages(...)` after a declaration selector.

use tracing::trace;

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::span::Span;
use crate::synthetic::{Payload, Receive};
use crate::tree::{KeyNotation, Node};

use super::block::{self, BlockBody};

pub(crate) fn render<'t>(
    dispatcher: &mut Dispatcher<'t>,
    receive: &Receive<'t>,
) -> Result<(), SyntaxError> {
    let verb = receive.polarity.verb();
    let anchor = receive.anchor;
    let source = dispatcher.source();

    match receive.payload {
        Payload::Method(name) => {
            let method = name.span.text(source);
            trace!(method, verb, "receive method");
            dispatcher.dispatch(name)?;
            let edits = dispatcher.edits();
            edits.insert_after(anchor, format!("{verb} receive({method})"));
            edits.remove(Span::new(anchor.end, receive.arguments.span.end));
        }
        Payload::Returning {
            key,
            notation,
            value,
        } => {
            let method = message_name(key, notation, source);
            trace!(method, verb, "receive with return value");
            dispatcher.dispatch(value)?;
            let edits = dispatcher.edits();
            edits.insert_after(anchor, format!("{verb} receive({method})"));
            block::wrap(
                edits,
                source,
                &BlockBody {
                    head_start: anchor.end,
                    arguments: receive.arguments,
                    body: value.span,
                },
            );
        }
        Payload::Messages(pairs) => {
            trace!(count = pairs.len(), verb, "receive messages");
            dispatcher.dispatch_all(pairs)?;
            let edits = dispatcher.edits();
            edits.insert_after(anchor, format!("{verb} receive_messages"));
            if let (None, [first, .., last]) = (receive.arguments.open, pairs) {
                edits.remove(Span::new(anchor.end, first.span.start));
                edits.insert_before(first.span, "(");
                edits.insert_after(last.span, ")");
            }
        }
    }
    Ok(())
}

/// Spells the message name a hash key stands for.
fn message_name(key: &Node, notation: KeyNotation, source: &str) -> String {
    let text = key.span.text(source);
    match notation {
        KeyNotation::Label => format!(":{text}"),
        KeyNotation::Rocket => text.to_owned(),
    }
}
