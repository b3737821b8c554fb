//! Source locations for findings.

use serde::{Deserialize, Serialize};

use crate::text::LineIndex;

/// The location of a match within a content unit.
///
/// Line and column are 1-indexed; the column counts characters, not bytes.
/// Byte offsets index into the unit's raw content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed character column within the line.
    pub column: u32,
    /// Byte offset of the start of the match, inclusive.
    pub byte_start: usize,
    /// Byte offset of the end of the match, exclusive.
    pub byte_end: usize,
}

impl Span {
    /// Builds a span from byte offsets, resolving line and column through a
    /// prebuilt index.
    #[must_use]
    pub fn from_offsets(index: &LineIndex, content: &str, byte_start: usize, byte_end: usize) -> Self {
        let (line, column) = index.location(content, byte_start);
        Self {
            line,
            column,
            byte_start,
            byte_end,
        }
    }

    /// Returns `true` if the two spans share any byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.byte_start < other.byte_end && other.byte_start < self.byte_end
    }

    /// Length of the matched region in bytes.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.byte_end - self.byte_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_offsets_resolves_line_and_column() {
        let content = "first line\nkey = value\n";
        let index = LineIndex::new(content);
        let start = content.find("value").unwrap();

        let span = Span::from_offsets(&index, content, start, start + 5);

        assert_eq!(span.line, 2);
        assert_eq!(span.column, 7);
        assert_eq!(span.byte_len(), 5);
    }

    #[test]
    fn overlapping_spans_are_detected() {
        let a = Span { line: 1, column: 1, byte_start: 0, byte_end: 10 };
        let b = Span { line: 1, column: 6, byte_start: 5, byte_end: 15 };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let a = Span { line: 1, column: 1, byte_start: 0, byte_end: 5 };
        let b = Span { line: 1, column: 6, byte_start: 5, byte_end: 10 };
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_span_overlaps_container() {
        let outer = Span { line: 1, column: 1, byte_start: 0, byte_end: 20 };
        let inner = Span { line: 1, column: 6, byte_start: 5, byte_end: 10 };
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
