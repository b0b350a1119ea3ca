//! Byte ranges into the original source text.

use std::fmt;
use std::ops::Range;

/// A half-open byte range `[start, end)` into the original source.
///
/// Spans always refer to the text that was parsed, never to rewritten
/// output. Every edit queued during a rewrite is expressed in these
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a span, swapping the bounds if they are given out of order.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Creates a zero-width span at `offset`.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-width span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if both spans share at least one byte.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns `true` if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns `true` if `offset` lies strictly between the bounds.
    #[must_use]
    pub const fn strictly_contains_offset(self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// Returns the smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the source text covered by this span, or `""` when the span
    /// does not fall on character boundaries of `source`.
    #[must_use]
    pub fn text(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or_default()
    }

    /// Returns the span as a standard range.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Span::new(0, 5), Span::new(4, 8), true)]
    #[case(Span::new(0, 5), Span::new(5, 8), false)]
    #[case(Span::new(3, 3), Span::new(0, 8), false)]
    #[case(Span::new(2, 6), Span::new(3, 4), true)]
    fn overlaps_uses_half_open_bounds(#[case] a: Span, #[case] b: Span, #[case] expected: bool) {
        assert_eq!(a.overlaps(b), expected);
        assert_eq!(b.overlaps(a), expected);
    }

    #[test]
    fn new_orders_bounds() {
        assert_eq!(Span::new(7, 2), Span { start: 2, end: 7 });
    }

    #[test]
    fn contains_accepts_touching_edges() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(2, 10)));
        assert!(outer.contains(Span::point(10)));
        assert!(!outer.contains(Span::new(1, 4)));
    }

    #[test]
    fn text_is_empty_off_char_boundary() {
        let source = "é!";
        assert_eq!(Span::new(0, 1).text(source), "");
        assert_eq!(Span::new(0, 2).text(source), "é");
    }

    #[test]
    fn cover_spans_both_inputs() {
        assert_eq!(Span::new(4, 6).cover(Span::new(1, 2)), Span::new(1, 6));
    }
}
