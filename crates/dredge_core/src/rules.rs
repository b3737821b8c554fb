//! Compiled rules and the keyword-indexed rule set.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::Deserialize;

use crate::error::RuleLoadError;

pub use dredge_rules::{RuleDef, RuleKindDef, Severity};

/// Maximum theoretical Shannon entropy for byte data, in bits.
const MAX_ENTROPY_BITS: f64 = 8.0;

/// How a compiled rule matches content.
///
/// A tagged variant over rule kinds; the matcher's single evaluation
/// function switches on this instead of dispatching through a trait.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// An exact substring match.
    Literal {
        /// The literal text to search for.
        literal: Box<str>,
    },
    /// A compiled regular expression match.
    Regex {
        /// The compiled regex. Capture group 1, when present, delimits the
        /// secret; otherwise the whole match does.
        regex: Regex,
    },
    /// A regex match that only counts near a context keyword.
    KeywordProximity {
        /// The compiled candidate-token regex.
        regex: Regex,
        /// Lowercased context keywords, at least one of which must appear
        /// within `max_distance` bytes of the match.
        near: Box<[Box<str>]>,
        /// Maximum byte distance between match and keyword.
        max_distance: usize,
    },
    /// No explicit pattern; the matcher runs sliding entropy windows over
    /// content not covered by any other rule's match.
    Entropy,
}

/// A compiled secret detection rule ready for scanning.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier in `"pack/name"` format (e.g. `"aws/access-key-id"`).
    pub id: Arc<str>,
    /// Description of what the rule detects.
    pub description: Box<str>,
    /// How this rule matches content.
    pub kind: RuleKind,
    /// Case-insensitive keywords for Aho-Corasick pre-filtering. If
    /// non-empty, the rule is only evaluated against content that contains
    /// at least one keyword.
    pub keywords: Box<[Box<str>]>,
    /// Minimum Shannon entropy for a match to survive, in `[0, 8]` bits.
    pub min_entropy: Option<f64>,
    /// Free-form tags carried through to findings.
    pub tags: Box<[Box<str>]>,
    /// Severity assigned to findings from this rule.
    pub severity: Severity,
}

impl Rule {
    /// Compiles a static definition into a scannable rule.
    pub fn from_def(def: &RuleDef) -> Result<Self, RuleLoadError> {
        let kind = match def.kind {
            RuleKindDef::Literal { literal } => RuleKind::Literal { literal: literal.into() },
            RuleKindDef::Regex { regex } => RuleKind::Regex {
                regex: compile_regex(def.id, regex)?,
            },
            RuleKindDef::KeywordProximity {
                regex,
                near,
                max_distance,
            } => build_proximity(def.id, regex, near.iter().map(|&k| k.to_string()), max_distance)?,
            RuleKindDef::Entropy => RuleKind::Entropy,
        };

        let rule = Self {
            id: Arc::from(def.id),
            description: def.description.into(),
            kind,
            keywords: def.keywords.iter().map(|&k| k.into()).collect(),
            min_entropy: def.min_entropy,
            tags: def.tags.iter().map(|&t| t.into()).collect(),
            severity: def.severity,
        };
        rule.validate()?;
        Ok(rule)
    }

    fn validate(&self) -> Result<(), RuleLoadError> {
        if let Some(threshold) = self.min_entropy
            && !(0.0..=MAX_ENTROPY_BITS).contains(&threshold)
        {
            return Err(RuleLoadError::EntropyOutOfRange {
                id: self.id.to_string(),
                value: threshold,
            });
        }

        if matches!(self.kind, RuleKind::Entropy) && self.min_entropy.is_none() {
            return Err(RuleLoadError::MissingEntropyThreshold {
                id: self.id.to_string(),
            });
        }

        Ok(())
    }
}

fn compile_regex(id: &str, source: &str) -> Result<Regex, RuleLoadError> {
    Regex::new(source).map_err(|source| RuleLoadError::InvalidRegex {
        id: id.to_string(),
        source,
    })
}

fn build_proximity(
    id: &str,
    regex: &str,
    near: impl Iterator<Item = String>,
    max_distance: usize,
) -> Result<RuleKind, RuleLoadError> {
    let near: Box<[Box<str>]> = near.map(|k| k.to_lowercase().into()).collect();
    if near.is_empty() || max_distance == 0 {
        return Err(RuleLoadError::InvalidProximity { id: id.to_string() });
    }
    Ok(RuleKind::KeywordProximity {
        regex: compile_regex(id, regex)?,
        near,
        max_distance,
    })
}

/// A declarative rule parsed from a TOML document.
///
/// Mirrors the static [`RuleDef`] shape for user-supplied corpora. The
/// document is handed to the engine as a string; the engine never reads
/// files itself.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// Unique rule identifier.
    pub id: String,
    /// Description of what the rule detects.
    #[serde(default)]
    pub description: String,
    /// Rule kind; defaults to `regex`.
    #[serde(default)]
    pub kind: RuleSpecKind,
    /// Regex source or literal text, depending on `kind`. Not used by
    /// entropy rules.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Pre-filter keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Minimum Shannon entropy in `[0, 8]` bits.
    #[serde(default)]
    pub min_entropy: Option<f64>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Severity assigned to findings from this rule.
    pub severity: Severity,
    /// Context keywords for `keyword-proximity` rules.
    #[serde(default)]
    pub near: Vec<String>,
    /// Maximum byte distance for `keyword-proximity` rules.
    #[serde(default)]
    pub max_distance: Option<usize>,
}

/// Rule kinds recognized in TOML documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSpecKind {
    /// An exact substring match.
    Literal,
    /// A regular expression match (the default).
    #[default]
    Regex,
    /// A regex match near a context keyword.
    KeywordProximity,
    /// Sliding-window entropy detection.
    Entropy,
}

impl RuleSpec {
    /// Compiles this parsed definition into a scannable rule.
    pub fn compile(&self) -> Result<Rule, RuleLoadError> {
        let pattern = || {
            self.pattern.as_deref().ok_or_else(|| RuleLoadError::MissingPattern {
                id: self.id.clone(),
            })
        };

        let kind = match self.kind {
            RuleSpecKind::Literal => RuleKind::Literal {
                literal: pattern()?.into(),
            },
            RuleSpecKind::Regex => RuleKind::Regex {
                regex: compile_regex(&self.id, pattern()?)?,
            },
            RuleSpecKind::KeywordProximity => build_proximity(
                &self.id,
                pattern()?,
                self.near.iter().cloned(),
                self.max_distance.unwrap_or(0),
            )?,
            RuleSpecKind::Entropy => RuleKind::Entropy,
        };

        let rule = Rule {
            id: self.id.as_str().into(),
            description: self.description.as_str().into(),
            kind,
            keywords: self.keywords.iter().map(|k| k.as_str().into()).collect(),
            min_entropy: self.min_entropy,
            tags: self.tags.iter().map(|t| t.as_str().into()).collect(),
            severity: self.severity,
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[derive(Debug, Deserialize)]
struct RulesDoc {
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

/// Immutable, load-order-stable collection of rules with an Aho-Corasick
/// keyword pre-filter index.
///
/// The index is built once at construction so the matcher can cheaply
/// determine which rules to evaluate for a given piece of content. The set
/// is read-only for its whole lifetime; reloading means building a new set
/// and swapping the handle.
pub struct RuleSet {
    rules: Vec<Rule>,
    keyword_automaton: Option<AhoCorasick>,
    keyword_to_rules: Vec<Vec<usize>>,
    rules_without_keywords: Vec<usize>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules.len())
            .field("rules_without_keywords", &self.rules_without_keywords.len())
            .finish_non_exhaustive()
    }
}

impl RuleSet {
    /// Creates a rule set containing all builtin pack rules.
    pub fn builtin() -> Result<Self, RuleLoadError> {
        let registry = dredge_rules::PackRegistry::builtin();
        let rules = registry.all_rules().map(Rule::from_def).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rules(rules))
    }

    /// Compiles a sequence of static definitions into a rule set.
    ///
    /// Fails fast on the first invalid definition or duplicate id; no
    /// partial sets are ever produced.
    pub fn from_defs<'d>(defs: impl IntoIterator<Item = &'d RuleDef>) -> Result<Self, RuleLoadError> {
        let rules = defs
            .into_iter()
            .map(Rule::from_def)
            .collect::<Result<Vec<_>, _>>()?;
        Self::reject_duplicates(&rules)?;
        Ok(Self::from_rules(rules))
    }

    /// Parses and compiles a TOML rule document (a `[[rules]]` array).
    pub fn from_toml(doc: &str) -> Result<Self, RuleLoadError> {
        let doc: RulesDoc = toml::from_str(doc).map_err(|source| RuleLoadError::Parse {
            source: Box::new(source),
        })?;
        let rules = doc
            .rules
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Self::reject_duplicates(&rules)?;
        Ok(Self::from_rules(rules))
    }

    /// Creates a rule set from already-compiled rules, building the
    /// keyword index.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let keyword_index = build_keyword_index(&rules);
        let keyword_automaton = build_automaton(&keyword_index.keywords);

        Self {
            rules,
            keyword_automaton,
            keyword_to_rules: keyword_index.keyword_to_rules,
            rules_without_keywords: keyword_index.rules_without_keywords,
        }
    }

    /// Merges another fragment into this set, the later load overriding by
    /// rule id. Rules new to `other` append in their own load order, so
    /// the combined order stays deterministic.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let mut rules = self.rules;
        let mut by_id: HashMap<Arc<str>, usize> = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (Arc::clone(&r.id), i))
            .collect();

        for rule in other.rules {
            if let Some(&existing) = by_id.get(&rule.id) {
                rules[existing] = rule;
            } else {
                by_id.insert(Arc::clone(&rule.id), rules.len());
                rules.push(rule);
            }
        }

        Self::from_rules(rules)
    }

    fn reject_duplicates(rules: &[Rule]) -> Result<(), RuleLoadError> {
        let mut seen = HashMap::new();
        for rule in rules {
            if seen.insert(rule.id.as_ref(), ()).is_some() {
                return Err(RuleLoadError::DuplicateRuleId {
                    id: rule.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns all rules in load order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule by its id string.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id.as_ref() == id)
    }

    /// Looks up a rule by its positional index in the set.
    #[must_use]
    pub fn get_by_index(&self, idx: usize) -> Option<&Rule> {
        self.rules.get(idx)
    }

    /// Returns the total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the Aho-Corasick automaton built from rule keywords, if any
    /// keywords were registered.
    #[must_use]
    pub(crate) fn keyword_automaton(&self) -> Option<&AhoCorasick> {
        self.keyword_automaton.as_ref()
    }

    /// Maps each keyword index to the rule indices that declared it.
    #[must_use]
    pub(crate) fn keyword_to_rules(&self) -> &[Vec<usize>] {
        &self.keyword_to_rules
    }

    /// Returns indices of rules that have no keywords and must be evaluated
    /// against all content unconditionally.
    #[must_use]
    pub(crate) fn rules_without_keywords(&self) -> &[usize] {
        &self.rules_without_keywords
    }
}

struct KeywordIndex {
    keywords: Vec<String>,
    keyword_to_rules: Vec<Vec<usize>>,
    rules_without_keywords: Vec<usize>,
}

fn build_keyword_index(rules: &[Rule]) -> KeywordIndex {
    let mut keywords = Vec::new();
    let mut keyword_to_rules: Vec<Vec<usize>> = Vec::new();
    let mut rules_without_keywords = Vec::new();
    let mut keyword_positions: HashMap<String, usize> = HashMap::new();

    for (rule_idx, rule) in rules.iter().enumerate() {
        if rule.keywords.is_empty() {
            rules_without_keywords.push(rule_idx);
            continue;
        }

        for keyword in &rule.keywords {
            let keyword_str = keyword.to_string();

            if let Some(&existing_idx) = keyword_positions.get(&keyword_str) {
                keyword_to_rules[existing_idx].push(rule_idx);
            } else {
                let new_idx = keywords.len();
                keyword_positions.insert(keyword_str.clone(), new_idx);
                keywords.push(keyword_str);
                keyword_to_rules.push(vec![rule_idx]);
            }
        }
    }

    KeywordIndex {
        keywords,
        keyword_to_rules,
        rules_without_keywords,
    }
}

fn build_automaton(keywords: &[String]) -> Option<AhoCorasick> {
    if keywords.is_empty() {
        return None;
    }

    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(aho_corasick::MatchKind::LeftmostLongest)
        .build(keywords)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_rule;

    const TEST_REGEX: &str = r"TEST_[A-Z]{8}";

    #[test]
    fn builtin_loads_every_pack_rule_precompiled() {
        let set = RuleSet::builtin().unwrap();
        assert_eq!(set.len(), dredge_rules::PackRegistry::builtin().rule_count());
        for rule in set.rules() {
            assert!(!rule.id.is_empty());
            assert!(!rule.description.is_empty());
        }
    }

    #[test]
    fn builtin_preserves_pack_load_order() {
        let set = RuleSet::builtin().unwrap();
        let registry = dredge_rules::PackRegistry::builtin();
        let def_ids: Vec<_> = registry.all_rules().map(|d| d.id).collect();
        let set_ids: Vec<_> = set.rules().iter().map(|r| r.id.as_ref()).collect();
        assert_eq!(set_ids, def_ids);
    }

    #[test]
    fn from_rules_with_empty_vec_is_empty() {
        let set = RuleSet::from_rules(vec![]);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn get_finds_rule_by_exact_id() {
        let set = RuleSet::builtin().unwrap();
        let rule = set.get("aws/access-key-id");
        assert!(rule.is_some());
        assert_eq!(rule.unwrap().severity, Severity::High);
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let set = RuleSet::builtin().unwrap();
        assert!(set.get("nonexistent/rule").is_none());
    }

    #[test]
    fn get_by_index_returns_rules_in_order() {
        let r1 = make_rule("test/first", TEST_REGEX, &[]);
        let r2 = make_rule("test/second", TEST_REGEX, &[]);
        let set = RuleSet::from_rules(vec![r1, r2]);

        assert_eq!(set.get_by_index(0).unwrap().id.as_ref(), "test/first");
        assert_eq!(set.get_by_index(1).unwrap().id.as_ref(), "test/second");
    }

    #[test]
    fn keyword_automaton_built_for_rules_with_keywords() {
        let with_kw = make_rule("test/with-kw", TEST_REGEX, &["ghp_", "github"]);
        let no_kw = make_rule("test/no-kw", TEST_REGEX, &[]);
        let set = RuleSet::from_rules(vec![with_kw, no_kw]);

        assert!(set.keyword_automaton().is_some());
        assert_eq!(set.rules_without_keywords().len(), 1);
    }

    #[test]
    fn shared_keywords_map_to_multiple_rules() {
        let r1 = make_rule("test/github", TEST_REGEX, &["ghp_"]);
        let r2 = make_rule("test/also-github", TEST_REGEX, &["ghp_"]);
        let set = RuleSet::from_rules(vec![r1, r2]);

        let mapping = set.keyword_to_rules();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping[0].len(), 2);
    }

    #[test]
    fn from_toml_parses_and_compiles_a_regex_rule() {
        let set = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/my-token"
            description = "A custom token"
            pattern = 'MY_TOKEN_[A-Z0-9]{32}'
            keywords = ["MY_TOKEN_"]
            severity = "high"
        "#,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        let rule = set.get("custom/my-token").unwrap();
        assert_eq!(rule.severity, Severity::High);
        match &rule.kind {
            RuleKind::Regex { regex } => assert!(regex.is_match("MY_TOKEN_ABCDEFGH0123456789ABCDEFGH0123")),
            other => panic!("expected regex kind, got {other:?}"),
        }
    }

    #[test]
    fn from_toml_parses_keyword_proximity_rule() {
        let set = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/near-password"
            kind = "keyword-proximity"
            pattern = '[A-Za-z0-9]{16,}'
            near = ["password"]
            max_distance = 40
            severity = "medium"
        "#,
        )
        .unwrap();

        assert!(matches!(
            set.get("custom/near-password").unwrap().kind,
            RuleKind::KeywordProximity { max_distance: 40, .. }
        ));
    }

    #[test]
    fn from_toml_rejects_invalid_regex_naming_the_rule() {
        let err = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/broken"
            pattern = '[unclosed'
            severity = "low"
        "#,
        )
        .unwrap_err();

        match err {
            RuleLoadError::InvalidRegex { id, .. } => assert_eq!(id, "custom/broken"),
            other => panic!("expected InvalidRegex, got {other:?}"),
        }
    }

    #[test]
    fn from_toml_rejects_out_of_range_entropy_threshold() {
        let err = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/too-entropic"
            pattern = 'X+'
            min_entropy = 9.1
            severity = "low"
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, RuleLoadError::EntropyOutOfRange { .. }));
    }

    #[test]
    fn from_toml_rejects_entropy_rule_without_threshold() {
        let err = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/windows"
            kind = "entropy"
            severity = "low"
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, RuleLoadError::MissingEntropyThreshold { .. }));
    }

    #[test]
    fn from_toml_rejects_pattern_rule_without_pattern() {
        let err = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/empty"
            severity = "low"
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, RuleLoadError::MissingPattern { .. }));
    }

    #[test]
    fn from_toml_rejects_duplicate_rule_ids() {
        let err = RuleSet::from_toml(
            r#"
            [[rules]]
            id = "custom/same"
            pattern = 'A'
            severity = "low"

            [[rules]]
            id = "custom/same"
            pattern = 'B'
            severity = "low"
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, RuleLoadError::DuplicateRuleId { .. }));
    }

    #[test]
    fn from_toml_rejects_malformed_document() {
        let err = RuleSet::from_toml("this is { not valid toml").unwrap_err();
        assert!(matches!(err, RuleLoadError::Parse { .. }));
    }

    #[test]
    fn from_toml_of_empty_document_is_an_empty_set() {
        let set = RuleSet::from_toml("").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn merge_later_fragment_overrides_by_rule_id() {
        let base = RuleSet::from_rules(vec![
            make_rule("test/shared", r"OLD_[A-Z]{4}", &[]),
            make_rule("test/only-base", TEST_REGEX, &[]),
        ]);
        let overlay = RuleSet::from_rules(vec![
            make_rule("test/shared", r"NEW_[A-Z]{4}", &[]),
            make_rule("test/only-overlay", TEST_REGEX, &[]),
        ]);

        let merged = base.merge(overlay);

        assert_eq!(merged.len(), 3);
        // The overridden rule keeps its original position.
        assert_eq!(merged.get_by_index(0).unwrap().id.as_ref(), "test/shared");
        match &merged.get("test/shared").unwrap().kind {
            RuleKind::Regex { regex } => assert!(regex.is_match("NEW_ABCD")),
            other => panic!("expected regex kind, got {other:?}"),
        }
        assert_eq!(merged.get_by_index(2).unwrap().id.as_ref(), "test/only-overlay");
    }

    #[test]
    fn proximity_rule_rejects_zero_distance() {
        let spec = RuleSpec {
            id: "custom/prox".into(),
            description: String::new(),
            kind: RuleSpecKind::KeywordProximity,
            pattern: Some("[a-z]+".into()),
            keywords: vec![],
            min_entropy: None,
            tags: vec![],
            severity: Severity::Low,
            near: vec!["password".into()],
            max_distance: None,
        };
        assert!(matches!(spec.compile(), Err(RuleLoadError::InvalidProximity { .. })));
    }

    #[test]
    fn debug_impl_shows_rule_count() {
        let set = RuleSet::from_rules(vec![]);
        let debug = format!("{set:?}");
        assert!(debug.contains("RuleSet"));
        assert!(debug.contains("rules"));
    }
}
