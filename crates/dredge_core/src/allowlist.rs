//! Suppression of known-acceptable matches.

use std::collections::HashMap;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::Deserialize;

use crate::error::RuleLoadError;
use crate::matcher::Match;
use crate::rules::RuleSet;
use crate::unit::ContentUnit;

/// The kinds of allowlist entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowlistEntryKind {
    /// A glob matched against the unit identifier.
    Path,
    /// A regex matched against the matched secret text.
    Regex,
    /// A case-insensitive substring of the matched secret text.
    Stopword,
    /// An exact commit identifier.
    Commit,
}

/// A declarative allowlist entry, as parsed from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowlistEntry {
    /// What this entry matches against.
    pub kind: AllowlistEntryKind,
    /// The glob, regex source, stopword, or commit id.
    pub value: String,
    /// Restricts the entry to matches from one rule. Global when absent.
    #[serde(default)]
    pub rule_id: Option<String>,
}

impl AllowlistEntry {
    /// Creates a global entry.
    #[must_use]
    pub fn new(kind: AllowlistEntryKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            rule_id: None,
        }
    }

    /// Scopes the entry to a single rule.
    #[must_use]
    pub fn for_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct AllowlistDoc {
    #[serde(default)]
    entries: Vec<AllowlistEntry>,
}

#[derive(Debug)]
struct ScopedRegex {
    regex: Regex,
    rule_id: Option<Box<str>>,
}

#[derive(Debug)]
struct ScopedValue {
    value: Box<str>,
    rule_id: Option<Box<str>>,
}

/// A compiled allowlist: globs, regexes, stopwords and commits, each either
/// global or scoped to a single rule.
///
/// All entries are validated and compiled at load time, so suppression
/// checks during scanning never fail.
#[derive(Debug)]
pub struct Allowlist {
    global_paths: GlobSet,
    scoped_paths: HashMap<Box<str>, GlobSet>,
    regexes: Vec<ScopedRegex>,
    stopwords: Vec<ScopedValue>,
    commits: Vec<ScopedValue>,
    empty: bool,
}

impl Allowlist {
    /// Creates an allowlist that suppresses nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            global_paths: GlobSet::empty(),
            scoped_paths: HashMap::new(),
            regexes: Vec::new(),
            stopwords: Vec::new(),
            commits: Vec::new(),
            empty: true,
        }
    }

    /// Compiles a collection of entries, failing on the first invalid one.
    pub fn from_entries(entries: impl IntoIterator<Item = AllowlistEntry>) -> Result<Self, RuleLoadError> {
        let mut global_paths = GlobSetBuilder::new();
        let mut scoped_builders: HashMap<Box<str>, GlobSetBuilder> = HashMap::new();
        let mut regexes = Vec::new();
        let mut stopwords = Vec::new();
        let mut commits = Vec::new();
        let mut empty = true;

        for entry in entries {
            empty = false;
            if entry.value.is_empty() {
                return Err(RuleLoadError::EmptyAllowlistValue {
                    kind: kind_name(entry.kind),
                });
            }
            let rule_id: Option<Box<str>> = entry.rule_id.map(Into::into);

            match entry.kind {
                AllowlistEntryKind::Path => {
                    let glob = Glob::new(&entry.value).map_err(|source| {
                        RuleLoadError::InvalidAllowlistGlob {
                            value: entry.value.clone(),
                            source,
                        }
                    })?;
                    match rule_id {
                        Some(id) => {
                            scoped_builders.entry(id).or_insert_with(GlobSetBuilder::new).add(glob);
                        }
                        None => {
                            global_paths.add(glob);
                        }
                    }
                }
                AllowlistEntryKind::Regex => {
                    let regex = Regex::new(&entry.value).map_err(|source| {
                        RuleLoadError::InvalidAllowlistRegex {
                            value: entry.value.clone(),
                            source,
                        }
                    })?;
                    regexes.push(ScopedRegex { regex, rule_id });
                }
                AllowlistEntryKind::Stopword => {
                    stopwords.push(ScopedValue {
                        value: entry.value.to_lowercase().into(),
                        rule_id,
                    });
                }
                AllowlistEntryKind::Commit => {
                    commits.push(ScopedValue {
                        value: entry.value.into(),
                        rule_id,
                    });
                }
            }
        }

        let global_paths = global_paths.build().map_err(|source| {
            RuleLoadError::InvalidAllowlistGlob {
                value: String::new(),
                source,
            }
        })?;
        let mut scoped_paths = HashMap::new();
        for (id, builder) in scoped_builders {
            let set = builder.build().map_err(|source| RuleLoadError::InvalidAllowlistGlob {
                value: String::new(),
                source,
            })?;
            scoped_paths.insert(id, set);
        }

        Ok(Self {
            global_paths,
            scoped_paths,
            regexes,
            stopwords,
            commits,
            empty,
        })
    }

    /// Parses and compiles a TOML allowlist document (an `[[entries]]`
    /// array).
    pub fn from_toml(doc: &str) -> Result<Self, RuleLoadError> {
        let doc: AllowlistDoc = toml::from_str(doc).map_err(|source| RuleLoadError::Parse {
            source: Box::new(source),
        })?;
        Self::from_entries(doc.entries)
    }

    /// Returns `true` if the allowlist has no entries at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns `true` if a global path or commit entry suppresses the whole
    /// unit, letting the scanner skip it without matching.
    #[must_use]
    pub fn suppresses_unit(&self, unit: &ContentUnit<'_>) -> bool {
        if self.global_paths.is_match(unit.id) {
            return true;
        }
        if let Some(commit) = unit.commit {
            return self
                .commits
                .iter()
                .any(|c| c.rule_id.is_none() && c.value.as_ref() == commit);
        }
        false
    }

    /// Returns `true` if any entry suppresses this particular match.
    #[must_use]
    pub fn suppresses(&self, unit: &ContentUnit<'_>, rule_id: &str, text: &str) -> bool {
        if self.empty {
            return false;
        }

        if self.global_paths.is_match(unit.id) {
            return true;
        }
        if let Some(set) = self.scoped_paths.get(rule_id)
            && set.is_match(unit.id)
        {
            return true;
        }

        for scoped in &self.regexes {
            if scope_applies(scoped.rule_id.as_deref(), rule_id) && scoped.regex.is_match(text) {
                return true;
            }
        }

        if !self.stopwords.is_empty() {
            let lowered = text.to_lowercase();
            for stopword in &self.stopwords {
                if scope_applies(stopword.rule_id.as_deref(), rule_id)
                    && lowered.contains(stopword.value.as_ref())
                {
                    return true;
                }
            }
        }

        if let Some(commit) = unit.commit {
            for entry in &self.commits {
                if scope_applies(entry.rule_id.as_deref(), rule_id) && entry.value.as_ref() == commit {
                    return true;
                }
            }
        }

        false
    }

    /// Drops suppressed matches, preserving the order of the survivors.
    #[must_use]
    pub fn filter<'a>(
        &self,
        matches: Vec<Match<'a>>,
        unit: &ContentUnit<'_>,
        rules: &RuleSet,
    ) -> Vec<Match<'a>> {
        if self.empty {
            return matches;
        }
        matches
            .into_iter()
            .filter(|m| {
                rules
                    .get_by_index(m.rule_index)
                    .is_some_and(|rule| !self.suppresses(unit, &rule.id, m.text))
            })
            .collect()
    }
}

const fn kind_name(kind: AllowlistEntryKind) -> &'static str {
    match kind {
        AllowlistEntryKind::Path => "path",
        AllowlistEntryKind::Regex => "regex",
        AllowlistEntryKind::Stopword => "stopword",
        AllowlistEntryKind::Commit => "commit",
    }
}

fn scope_applies(scope: Option<&str>, rule_id: &str) -> bool {
    scope.is_none_or(|s| s == rule_id)
}
