//! Built-in secret detection rules for dredge.
//!
//! This crate holds the static rule corpus: declarative [`RuleDef`] entries
//! organised into per-service packs. Definitions are data only; compilation
//! into a scannable rule set happens in `dredge_core`.

mod pack;
/// Rule packs organised by service.
pub mod packs;
mod registry;
mod rule_def;

pub use pack::RulePack;
pub use registry::PackRegistry;
pub use rule_def::{ParseSeverityError, RuleDef, RuleKindDef, Severity};
