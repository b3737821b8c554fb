//! Error types for rule loading and per-unit scanning.

use thiserror::Error;

/// Errors that can occur when loading a rule set or allowlist.
///
/// Load-time errors are fatal to the whole load call: the corpus is
/// all-valid or rejected, never partially loaded.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    /// The rule's regular expression failed to compile.
    #[error("invalid regex in rule '{id}': {source}")]
    InvalidRegex {
        /// Identifier of the rule that failed (e.g. `"aws/access-key-id"`).
        id: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The rule declares an entropy threshold outside `[0, 8]` bits.
    #[error("entropy threshold {value} out of range [0, 8] in rule '{id}'")]
    EntropyOutOfRange {
        /// Identifier of the offending rule.
        id: String,
        /// The out-of-range threshold value.
        value: f64,
    },

    /// An entropy-only rule has no threshold to detect against.
    #[error("entropy rule '{id}' declares no min_entropy threshold")]
    MissingEntropyThreshold {
        /// Identifier of the offending rule.
        id: String,
    },

    /// A literal, regex, or keyword-proximity rule has no pattern.
    #[error("rule '{id}' declares no pattern")]
    MissingPattern {
        /// Identifier of the offending rule.
        id: String,
    },

    /// A keyword-proximity rule has no context keywords or a zero distance.
    #[error("keyword-proximity rule '{id}' needs context keywords and a non-zero max distance")]
    InvalidProximity {
        /// Identifier of the offending rule.
        id: String,
    },

    /// The same rule id appears twice within one document.
    #[error("duplicate rule id '{id}' in rule document")]
    DuplicateRuleId {
        /// The duplicated rule id.
        id: String,
    },

    /// An allowlist path entry is not a valid glob.
    #[error("invalid path glob '{value}' in allowlist: {source}")]
    InvalidAllowlistGlob {
        /// The offending glob pattern.
        value: String,
        /// The underlying glob compilation error.
        #[source]
        source: globset::Error,
    },

    /// An allowlist regex entry failed to compile.
    #[error("invalid regex '{value}' in allowlist: {source}")]
    InvalidAllowlistRegex {
        /// The offending regex source.
        value: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// An allowlist entry has an empty value.
    #[error("empty value in {kind} allowlist entry")]
    EmptyAllowlistValue {
        /// The entry kind (`"path"`, `"regex"`, `"stopword"`, or `"commit"`).
        kind: &'static str,
    },

    /// A TOML rule or allowlist document failed to parse.
    #[error("failed to parse document: {source}")]
    Parse {
        /// The underlying TOML deserialization error.
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Errors that make a single content unit unscannable.
///
/// Recoverable at the orchestrator level: the unit is skipped, the error
/// recorded per unit, and the scan continues.
#[derive(Debug, Error)]
pub enum UnitScanError {
    /// The unit contains a NUL byte within the sniffed prefix, which
    /// strongly indicates binary data.
    #[error("binary content (NUL byte within the first {checked} bytes)")]
    Binary {
        /// Number of bytes that were sniffed.
        checked: usize,
    },

    /// The unit's bytes are not valid UTF-8 text.
    #[error("content is not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// The underlying UTF-8 validation error.
        #[source]
        source: std::str::Utf8Error,
    },
}
