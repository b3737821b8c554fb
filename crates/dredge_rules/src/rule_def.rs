//! Declarative rule definition types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid severity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError {
    invalid_value: Box<str>,
}

impl ParseSeverityError {
    fn new(value: &str) -> Self {
        Self {
            invalid_value: value.into(),
        }
    }

    /// Returns the invalid value that caused the parse failure.
    #[must_use]
    pub fn invalid_value(&self) -> &str {
        &self.invalid_value
    }
}

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid severity '{}': expected one of 'low', 'medium', 'high', 'critical'",
            self.invalid_value
        )
    }
}

impl std::error::Error for ParseSeverityError {}

/// How severe a detected secret exposure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low risk - the secret has limited scope or is unlikely to be exploitable.
    Low,
    /// Medium risk - the secret could grant partial access.
    Medium,
    /// High risk - the secret grants broad access to sensitive resources.
    High,
    /// Critical risk - the secret grants full administrative or billing access.
    Critical,
}

impl Severity {
    /// All severity levels in ascending order.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseSeverityError::new(s)),
        }
    }
}

/// How a rule detects secrets.
///
/// A tagged variant rather than trait dispatch: the engine's single
/// evaluation function switches on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKindDef {
    /// An exact substring match.
    Literal {
        /// The literal text to search for.
        literal: &'static str,
    },
    /// A regular expression match.
    Regex {
        /// The regex source, compiled at load time.
        regex: &'static str,
    },
    /// A regex match that only counts when a context keyword occurs nearby.
    KeywordProximity {
        /// The regex source for the candidate token.
        regex: &'static str,
        /// Context keywords, at least one of which must appear near the match.
        near: &'static [&'static str],
        /// Maximum distance in bytes between match and keyword.
        max_distance: usize,
    },
    /// No explicit pattern; detects high-entropy spans via sliding windows.
    /// Requires a `min_entropy` threshold on the owning rule.
    Entropy,
}

/// A single declarative rule definition.
#[derive(Debug, Clone)]
pub struct RuleDef {
    /// Unique identifier in `"pack/name"` format (e.g. `"aws/access-key-id"`).
    pub id: &'static str,
    /// Description of what this rule detects.
    pub description: &'static str,
    /// How this rule matches content.
    pub kind: RuleKindDef,
    /// Keywords for Aho-Corasick pre-filtering. If non-empty, the rule is
    /// only evaluated against content that contains at least one keyword.
    pub keywords: &'static [&'static str],
    /// Minimum Shannon entropy for a match to survive, in `[0, 8]` bits.
    /// Mandatory for `RuleKindDef::Entropy` rules.
    pub min_entropy: Option<f64>,
    /// Free-form tags carried through to findings (e.g. `"cloud"`).
    pub tags: &'static [&'static str],
    /// Severity assigned to findings from this rule.
    pub severity: Severity,
}

/// Creates a [`RuleDef`] with positional-free field syntax.
#[macro_export]
macro_rules! rule {
    (
        id: $id:expr,
        description: $description:expr,
        kind: $kind:expr,
        keywords: $keywords:expr,
        min_entropy: $entropy:expr,
        tags: $tags:expr,
        severity: $severity:expr $(,)?
    ) => {
        $crate::RuleDef {
            id: $id,
            description: $description,
            kind: $kind,
            keywords: $keywords,
            min_entropy: $entropy,
            tags: $tags,
            severity: $severity,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_medium_high_critical() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_display_formats_as_lowercase_string() {
        assert_eq!(format!("{}", Severity::Low), "low");
        assert_eq!(format!("{}", Severity::Critical), "critical");
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!("medium".parse::<Severity>(), Ok(Severity::Medium));
    }

    #[test]
    fn severity_rejects_unknown_value() {
        let err = "extreme".parse::<Severity>().unwrap_err();
        assert_eq!(err.invalid_value(), "extreme");
        assert!(err.to_string().contains("extreme"));
    }

    #[test]
    fn severity_all_is_sorted_ascending() {
        let mut sorted = Severity::ALL;
        sorted.sort();
        assert_eq!(sorted, Severity::ALL);
    }
}
