//! Line-offset index for byte-offset to line/column translation.

/// Pre-computed line-start offsets for one content unit.
///
/// Built once per unit in O(n); each lookup is a binary search over the
/// line-start table plus a character count within the found line.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds the index by recording the byte offset after every newline.
    #[must_use]
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(content.bytes().enumerate().filter(|&(_, b)| b == b'\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Returns the number of lines the index covers.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the byte offset of the start of the line containing `offset`.
    #[must_use]
    pub fn line_start(&self, offset: usize) -> usize {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        self.line_starts[line - 1]
    }

    /// Translates a byte offset into a 1-indexed (line, column) pair.
    ///
    /// Columns count characters, not bytes. `offset` must lie on a UTF-8
    /// character boundary within `content`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "line/column counts in scannable content fit in u32"
    )]
    #[must_use]
    pub fn location(&self, content: &str, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = content[line_start..offset].chars().count() as u32 + 1;
        (line as u32, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_at_start_returns_line1_column1() {
        let content = "secret";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 0), (1, 1));
    }

    #[test]
    fn location_mid_line_counts_columns_from_line_start() {
        let content = "key = SECRET";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 6), (1, 7));
    }

    #[test]
    fn location_after_newline_moves_to_next_line() {
        let content = "line1\nSECRET";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 6), (2, 1));
    }

    #[test]
    fn location_on_third_line() {
        let content = "line1\nline2\nkey = SECRET";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 18), (3, 7));
    }

    #[test]
    fn location_handles_crlf_newlines() {
        let content = "line1\r\nSECRET";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 7), (2, 1));
    }

    #[test]
    fn location_counts_characters_not_bytes_for_column() {
        let content = "éé = SECRET";
        let index = LineIndex::new(content);
        // The two 'é' occupy four bytes; the secret starts at byte 7.
        assert_eq!(index.location(content, 7), (1, 6));
    }

    #[test]
    fn location_handles_empty_content() {
        let index = LineIndex::new("");
        assert_eq!(index.location("", 0), (1, 1));
    }

    #[test]
    fn line_start_returns_start_of_containing_line() {
        let content = "line1\nline2\nline3";
        let index = LineIndex::new(content);
        assert_eq!(index.line_start(0), 0);
        assert_eq!(index.line_start(4), 0);
        assert_eq!(index.line_start(6), 6);
        assert_eq!(index.line_start(16), 12);
    }

    #[test]
    fn line_count_includes_trailing_line() {
        assert_eq!(LineIndex::new("one\ntwo\nthree").line_count(), 3);
        assert_eq!(LineIndex::new("one\n").line_count(), 2);
        assert_eq!(LineIndex::new("").line_count(), 1);
    }

    #[test]
    fn location_matches_naive_scan_on_consecutive_newlines() {
        let content = "\n\nx\n";
        let index = LineIndex::new(content);
        assert_eq!(index.location(content, 0), (1, 1));
        assert_eq!(index.location(content, 1), (2, 1));
        assert_eq!(index.location(content, 2), (3, 1));
        assert_eq!(index.location(content, 4), (4, 1));
    }
}
