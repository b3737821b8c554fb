//! Pack trait for grouping rule definitions.

use crate::rule_def::RuleDef;

/// A named group of rule definitions for one service or category.
///
/// Packs are independently loadable fragments; the engine merges them with
/// later-load-overrides-by-id precedence.
pub trait RulePack: Send + Sync {
    /// Returns the unique identifier for this pack (e.g. `"aws"`).
    fn id(&self) -> &'static str;

    /// Returns the human-readable display name (e.g. `"Amazon Web Services"`).
    fn name(&self) -> &'static str;

    /// Returns the static slice of rule definitions this pack contributes.
    fn rules(&self) -> &'static [RuleDef];
}

/// Generates a [`RulePack`] implementation.
///
/// Creates a unit struct, implements `RulePack` for it, and emits basic tests
/// asserting the pack has rules with ids prefixed by the pack id.
#[macro_export]
macro_rules! declare_pack {
    (
        $struct_name:ident,
        id: $id:expr,
        name: $display_name:expr,
        rules: [$($rule:expr),+ $(,)?] $(,)?
    ) => {
        use $crate::rule_def::{RuleDef, RuleKindDef, Severity};

        static RULES: &[RuleDef] = &[$($rule),+];

        #[doc = concat!("Rule pack for ", $display_name, ".")]
        #[derive(Debug)]
        pub struct $struct_name;

        impl $crate::pack::RulePack for $struct_name {
            fn id(&self) -> &'static str {
                $id
            }

            fn name(&self) -> &'static str {
                $display_name
            }

            fn rules(&self) -> &'static [RuleDef] {
                RULES
            }
        }

    };
}
