//! Scannable content units.

use crate::error::UnitScanError;

/// Number of leading bytes sniffed for NUL bytes when detecting binary
/// content. Matches how git classifies binaries - they almost always have
/// NULs in their headers.
const BINARY_CHECK_BYTES: usize = 8000;

/// One scannable piece of content: an identifier plus raw bytes.
///
/// The engine only borrows a unit for the duration of a scan call and
/// never stores references into it - findings copy what they need.
#[derive(Debug, Clone, Copy)]
pub struct ContentUnit<'a> {
    /// Path or logical name identifying the unit (matched by path allowlists).
    pub id: &'a str,
    /// Raw content bytes, already materialized by the content provider.
    pub bytes: &'a [u8],
    /// Optional VCS commit this content came from (matched by commit allowlists).
    pub commit: Option<&'a str>,
}

impl<'a> ContentUnit<'a> {
    /// Creates a unit with no commit tag.
    #[must_use]
    pub const fn new(id: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            id,
            bytes,
            commit: None,
        }
    }

    /// Attaches a commit tag, enabling commit-scoped allowlist entries.
    #[must_use]
    pub const fn with_commit(mut self, commit: &'a str) -> Self {
        self.commit = Some(commit);
        self
    }

    /// Decodes the unit's bytes as UTF-8 text.
    ///
    /// Rejects binary content (NUL byte in the sniffed prefix) before
    /// attempting UTF-8 validation, so common binary blobs fail fast.
    pub fn decode(&self) -> Result<&'a str, UnitScanError> {
        let checked = self.bytes.len().min(BINARY_CHECK_BYTES);
        if self.bytes[..checked].contains(&0) {
            return Err(UnitScanError::Binary { checked });
        }

        std::str::from_utf8(self.bytes).map_err(|source| UnitScanError::InvalidUtf8 { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_plain_text() {
        let unit = ContentUnit::new("a.txt", b"hello world");
        assert_eq!(unit.decode().unwrap(), "hello world");
    }

    #[test]
    fn decode_rejects_nul_bytes_as_binary() {
        let unit = ContentUnit::new("a.bin", b"hello\0world");
        assert!(matches!(unit.decode(), Err(UnitScanError::Binary { .. })));
    }

    #[test]
    fn decode_only_sniffs_leading_bytes_for_nul() {
        let mut bytes = vec![b'a'; BINARY_CHECK_BYTES + 10];
        bytes.push(0);
        // The NUL sits past the sniffed prefix; NUL is valid UTF-8, so the
        // unit still decodes as text.
        let unit = ContentUnit::new("late-nul", &bytes);
        assert!(unit.decode().is_ok());
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let unit = ContentUnit::new("a.dat", &[0xff, 0xfe, 0x41]);
        assert!(matches!(unit.decode(), Err(UnitScanError::InvalidUtf8 { .. })));
    }

    #[test]
    fn with_commit_tags_the_unit() {
        let unit = ContentUnit::new("a.txt", b"x").with_commit("deadbeef");
        assert_eq!(unit.commit, Some("deadbeef"));
    }

    #[test]
    fn decode_handles_empty_unit() {
        let unit = ContentUnit::new("empty", b"");
        assert_eq!(unit.decode().unwrap(), "");
    }
}
