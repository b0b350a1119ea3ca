//! Turns the tail of a call into a `{ ... }` block around kept text.
//!
//! Shared by the receive connective (single pair payloads) and `returns`.
//! Everything from `head_start` up to the body is dropped together with the
//! closing delimiter; the body itself stays byte-identical.
//!
//! Single-line input renders as ` { body }`. When the first argument sits on
//! a later line than the opening parenthesis the line layout is kept: the
//! parenthesis becomes ` {`, the body gains a two-space lead and the closing
//! parenthesis becomes `  }`.

use crate::edit::EditBuffer;
use crate::position::spans_lines;
use crate::span::Span;
use crate::tree::Arguments;

#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockBody<'t> {
    /// First byte of the call tail being replaced.
    pub head_start: usize,
    pub arguments: &'t Arguments,
    /// The text kept between the braces.
    pub body: Span,
}

impl BlockBody<'_> {
    fn items_start(&self) -> usize {
        self.arguments
            .items
            .first()
            .map_or(self.body.start, |item| item.span.start)
    }

    /// Returns the parentheses when the arguments start on a new line.
    fn multiline(&self, source: &str) -> Option<(Span, Span)> {
        let open = self.arguments.open?;
        let close = self.arguments.close?;
        let lead = Span::new(open.end, self.items_start());
        spans_lines(lead.text(source)).then_some((open, close))
    }
}

pub(crate) fn wrap(edits: &mut EditBuffer, source: &str, block: &BlockBody<'_>) {
    match block.multiline(source) {
        Some((open, close)) => wrap_multiline(edits, source, block, open, close),
        None => wrap_inline(edits, block),
    }
}

fn wrap_inline(edits: &mut EditBuffer, block: &BlockBody<'_>) {
    let body = block.body;
    edits.remove(Span::new(block.head_start, body.start));
    edits.wrap(body, " { ", " }");
    edits.remove(Span::new(body.end, block.arguments.span.end));
}

fn wrap_multiline(
    edits: &mut EditBuffer,
    source: &str,
    block: &BlockBody<'_>,
    open: Span,
    close: Span,
) {
    let body = block.body;
    edits.remove(Span::new(block.head_start, open.start));
    edits.replace(open, " {");
    edits.remove(Span::new(block.items_start(), body.start));
    edits.insert_before(body, "  ");
    if let Some(comma) = trailing_comma(source, body.end, close.start) {
        edits.remove(comma);
    }
    edits.replace(close, "  }");
}

/// Finds a comma directly after the body, ignoring whitespace.
fn trailing_comma(source: &str, from: usize, to: usize) -> Option<Span> {
    let gap = Span::new(from, to).text(source);
    let trimmed = gap.trim_start();
    let start = from.saturating_add(gap.len().saturating_sub(trimmed.len()));
    trimmed
        .starts_with(',')
        .then(|| Span::new(start, start.saturating_add(1)))
}
