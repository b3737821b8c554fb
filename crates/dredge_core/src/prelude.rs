//! Commonly used types, importable in one line.

pub use crate::allowlist::{Allowlist, AllowlistEntry, AllowlistEntryKind};
pub use crate::cancel::CancelToken;
pub use crate::config::{EntropyWindows, ScanConfig};
pub use crate::error::{RuleLoadError, UnitScanError};
pub use crate::finding::{Confidence, Finding, FindingId, Redaction, Secret, Span};
pub use crate::orchestrator::{Engine, ScanReport, ScanStatus};
pub use crate::rules::{Rule, RuleKind, RuleSet};
pub use crate::unit::ContentUnit;
pub use dredge_rules::Severity;
