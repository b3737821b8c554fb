//! Shared helpers for unit tests.

use std::sync::Arc;

use regex::Regex;

use crate::rules::{Rule, RuleKind};
use dredge_rules::Severity;

/// Builds a regex rule with optional pre-filter keywords.
pub(crate) fn make_rule(id: &str, pattern: &str, keywords: &[&str]) -> Rule {
    Rule {
        id: Arc::from(id),
        description: "test rule".into(),
        kind: RuleKind::Regex {
            regex: Regex::new(pattern).unwrap(),
        },
        keywords: keywords.iter().map(|&k| k.into()).collect(),
        min_entropy: None,
        tags: Box::new([]),
        severity: Severity::Medium,
    }
}

/// Builds a regex rule gated on a minimum entropy threshold.
pub(crate) fn make_rule_with_entropy(id: &str, pattern: &str, keywords: &[&str], min_entropy: f64) -> Rule {
    Rule {
        min_entropy: Some(min_entropy),
        ..make_rule(id, pattern, keywords)
    }
}

/// Builds a sliding-window entropy rule.
pub(crate) fn make_entropy_rule(id: &str, min_entropy: f64) -> Rule {
    Rule {
        id: Arc::from(id),
        description: "test entropy rule".into(),
        kind: RuleKind::Entropy,
        keywords: Box::new([]),
        min_entropy: Some(min_entropy),
        tags: Box::new([]),
        severity: Severity::Low,
    }
}
