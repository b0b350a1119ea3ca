//! Positional edit buffer.
//!
//! Rules never touch text directly. They queue [`EditOperation`]s expressed
//! in original-source coordinates and the buffer composes them in one pass
//! when the walk is complete. Bytes outside every queued edit are copied
//! through unchanged.
//!
//! At a given offset the composed output contains, in order:
//!
//! 1. text inserted after a region ending there, in queue order;
//! 2. text inserted before a region starting there, latest first;
//! 3. the replacement text of a region starting there.
//!
//! A later insertion at the same anchor therefore encloses the earlier ones,
//! which lets an outer rule wrap what an inner rule already produced.

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::SyntaxError;
use crate::span::Span;

/// A single queued text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Delete the bytes of a span.
    Remove(Span),
    /// Insert text immediately before the anchor's start.
    InsertBefore {
        /// The region the text is attached to.
        anchor: Span,
        /// The inserted text.
        text: String,
    },
    /// Insert text immediately after the anchor's end.
    InsertAfter {
        /// The region the text is attached to.
        anchor: Span,
        /// The inserted text.
        text: String,
    },
    /// Replace the bytes of a span.
    Replace {
        /// The replaced region.
        span: Span,
        /// The replacement text.
        text: String,
    },
    /// Surround a span with a prefix and suffix.
    Wrap {
        /// The wrapped region.
        span: Span,
        /// Text placed before the region.
        prefix: String,
        /// Text placed after the region.
        suffix: String,
    },
}

/// Ordered queue of edits against one source text.
#[derive(Debug, Default, Clone)]
pub struct EditBuffer {
    operations: Vec<EditOperation>,
}

impl EditBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Queues the removal of `span`.
    pub fn remove(&mut self, span: Span) {
        self.push(EditOperation::Remove(span));
    }

    /// Queues `text` before `anchor`.
    pub fn insert_before(&mut self, anchor: Span, text: impl Into<String>) {
        self.push(EditOperation::InsertBefore {
            anchor,
            text: text.into(),
        });
    }

    /// Queues `text` after `anchor`.
    pub fn insert_after(&mut self, anchor: Span, text: impl Into<String>) {
        self.push(EditOperation::InsertAfter {
            anchor,
            text: text.into(),
        });
    }

    /// Queues the replacement of `span` with `text`.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.push(EditOperation::Replace {
            span,
            text: text.into(),
        });
    }

    /// Queues `prefix` before and `suffix` after `span`.
    pub fn wrap(&mut self, span: Span, prefix: impl Into<String>, suffix: impl Into<String>) {
        self.push(EditOperation::Wrap {
            span,
            prefix: prefix.into(),
            suffix: suffix.into(),
        });
    }

    fn push(&mut self, operation: EditOperation) {
        trace!(?operation, queued = self.operations.len(), "queue edit");
        self.operations.push(operation);
    }

    /// Returns the queued operations in queue order.
    #[must_use]
    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    /// Returns the number of queued operations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if nothing has been queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Composes every queued edit against `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::EditConflict`] when two removed or replaced
    /// regions overlap, or when an insertion falls strictly inside one.
    /// Returns [`SyntaxError::InternalError`] when an offset is out of
    /// bounds or not on a character boundary.
    pub fn apply(&self, source: &str) -> Result<String, SyntaxError> {
        let plan = Plan::build(&self.operations);
        plan.validate(source)?;
        plan.compose(source)
    }
}

#[derive(Debug, Default)]
struct InsertGroup<'a> {
    after: Vec<&'a str>,
    before: Vec<&'a str>,
}

#[derive(Debug)]
struct Region<'a> {
    span: Span,
    text: &'a str,
}

#[derive(Debug, Default)]
struct Plan<'a> {
    regions: Vec<Region<'a>>,
    inserts: BTreeMap<usize, InsertGroup<'a>>,
}

impl<'a> Plan<'a> {
    fn build(operations: &'a [EditOperation]) -> Self {
        let mut plan = Self::default();
        for operation in operations {
            match operation {
                EditOperation::Remove(span) if span.is_empty() => {}
                EditOperation::Remove(span) => plan.region(*span, ""),
                EditOperation::Replace { span, text } if span.is_empty() => {
                    plan.group(span.start).before.push(text);
                }
                EditOperation::Replace { span, text } => plan.region(*span, text),
                EditOperation::InsertBefore { anchor, text } => {
                    plan.group(anchor.start).before.push(text);
                }
                EditOperation::InsertAfter { anchor, text } => {
                    plan.group(anchor.end).after.push(text);
                }
                EditOperation::Wrap {
                    span,
                    prefix,
                    suffix,
                } => {
                    plan.group(span.start).before.push(prefix);
                    plan.group(span.end).after.push(suffix);
                }
            }
        }
        plan.regions.sort_by_key(|region| (region.span.start, region.span.end));
        plan
    }

    fn region(&mut self, span: Span, text: &'a str) {
        let duplicate_removal = text.is_empty()
            && self
                .regions
                .iter()
                .any(|region| region.span == span && region.text.is_empty());
        if !duplicate_removal {
            self.regions.push(Region { span, text });
        }
    }

    fn group(&mut self, offset: usize) -> &mut InsertGroup<'a> {
        self.inserts.entry(offset).or_default()
    }

    fn validate(&self, source: &str) -> Result<(), SyntaxError> {
        let offsets = self
            .regions
            .iter()
            .flat_map(|region| [region.span.start, region.span.end])
            .chain(self.inserts.keys().copied());
        for offset in offsets {
            if offset > source.len() || !source.is_char_boundary(offset) {
                return Err(SyntaxError::internal_error(format!(
                    "edit offset {offset} is not a character boundary of a {}-byte source",
                    source.len()
                )));
            }
        }

        for pair in self.regions.windows(2) {
            if let [earlier, later] = pair
                && earlier.span.end > later.span.start
            {
                return Err(SyntaxError::edit_conflict(earlier.span, later.span));
            }
        }

        for &offset in self.inserts.keys() {
            if let Some(region) = self
                .regions
                .iter()
                .find(|region| region.span.strictly_contains_offset(offset))
            {
                return Err(SyntaxError::edit_conflict(region.span, Span::point(offset)));
            }
        }
        Ok(())
    }

    fn compose(&self, source: &str) -> Result<String, SyntaxError> {
        let mut offsets: Vec<usize> = self
            .regions
            .iter()
            .map(|region| region.span.start)
            .chain(self.inserts.keys().copied())
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        let mut output = String::with_capacity(source.len());
        let mut regions = self.regions.iter().peekable();
        let mut cursor = 0;
        for offset in offsets {
            output.push_str(slice(source, cursor, offset)?);
            if let Some(group) = self.inserts.get(&offset) {
                group.after.iter().for_each(|text| output.push_str(text));
                group.before.iter().rev().for_each(|text| output.push_str(text));
            }
            cursor = match regions.next_if(|region| region.span.start == offset) {
                Some(region) => {
                    output.push_str(region.text);
                    region.span.end
                }
                None => offset,
            };
        }
        output.push_str(slice(source, cursor, source.len())?);
        Ok(output)
    }
}

fn slice(source: &str, start: usize, end: usize) -> Result<&str, SyntaxError> {
    source.get(start..end).ok_or_else(|| {
        SyntaxError::internal_error(format!("cannot copy source bytes {start}..{end}"))
    })
}
