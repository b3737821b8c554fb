//! Registry for accessing all builtin rule packs.

use crate::pack::RulePack;
use crate::packs::builtin_packs;
use crate::rule_def::RuleDef;

/// Central registry of all builtin rule packs.
///
/// Iteration order is the pack declaration order, which fixes the load order
/// of the rule corpus and keeps scan output deterministic.
pub struct PackRegistry {
    packs: Vec<&'static dyn RulePack>,
}

impl PackRegistry {
    /// Creates a registry pre-loaded with all builtin packs.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            packs: builtin_packs(),
        }
    }

    /// Returns an iterator over every rule definition across all packs,
    /// in load order.
    pub fn all_rules(&self) -> impl Iterator<Item = &'static RuleDef> {
        self.packs.iter().flat_map(|p| p.rules().iter())
    }

    /// Returns the total number of rules across all packs.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.packs.iter().map(|p| p.rules().len()).sum()
    }

    /// Looks up a pack by its id (e.g. `"aws"`).
    #[must_use]
    pub fn get(&self, pack_id: &str) -> Option<&'static dyn RulePack> {
        self.packs.iter().find(|p| p.id() == pack_id).copied()
    }

    /// Returns the underlying slice of registered packs.
    #[must_use]
    pub fn packs(&self) -> &[&'static dyn RulePack] {
        &self.packs
    }
}

impl std::fmt::Debug for PackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackRegistry")
            .field("pack_count", &self.packs.len())
            .field("rule_count", &self.rule_count())
            .finish_non_exhaustive()
    }
}

impl Default for PackRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_registry_has_packs_and_rules() {
        let registry = PackRegistry::builtin();
        assert!(!registry.packs().is_empty());
        assert!(registry.rule_count() > 0);
    }

    #[test]
    fn all_rules_matches_rule_count() {
        let registry = PackRegistry::builtin();
        assert_eq!(registry.all_rules().count(), registry.rule_count());
    }

    #[test]
    fn builtin_rule_ids_are_unique() {
        let registry = PackRegistry::builtin();
        let mut seen = HashSet::new();
        for rule in registry.all_rules() {
            assert!(seen.insert(rule.id), "duplicate rule id '{}'", rule.id);
        }
    }

    #[test]
    fn get_finds_pack_by_id() {
        let registry = PackRegistry::builtin();
        assert!(registry.get("aws").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn default_is_equivalent_to_builtin() {
        assert_eq!(PackRegistry::default().rule_count(), PackRegistry::builtin().rule_count());
    }

    #[test]
    fn all_entropy_thresholds_are_in_valid_range() {
        let registry = PackRegistry::builtin();
        for rule in registry.all_rules() {
            if let Some(threshold) = rule.min_entropy {
                assert!(
                    (0.0..=8.0).contains(&threshold),
                    "rule '{}' threshold {} out of range",
                    rule.id,
                    threshold
                );
            }
        }
    }
}
