//! Section-to-key-prefix mapping.
//!
//! An ordered list of `(section title, prefixes)` rules supplied by the caller.
//! The longest matching prefix wins; equally long matches from different
//! sections are ambiguous and never guessed.

use crate::core::error::AmbiguousMappingError;
use serde::{Deserialize, Serialize};

/// Title of the proposed section for keys that match no prefix rule.
pub const UNCATEGORIZED_SECTION: &str = "Uncategorized";

/// One section and the key prefixes it claims.
///
/// A trailing `*` in a prefix is accepted and ignored (`redis*` == `redis`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    pub title: String,
    pub prefixes: Vec<String>,
}

impl SectionRule {
    pub fn new(title: impl Into<String>, prefixes: &[&str]) -> Self {
        Self {
            title: title.into(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Length of the longest prefix of this rule that `key` starts with.
    fn match_len(&self, key: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .map(|p| p.trim().trim_end_matches('*'))
            .filter(|p| key.starts_with(p))
            .map(str::len)
            .max()
    }
}

/// Where a key belongs according to the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionAssignment {
    /// Exactly one section claims the key
    Section(String),
    /// No rule matches the key
    Uncategorized,
    /// Several sections claim the key with equal specificity
    Ambiguous(AmbiguousMappingError),
}

/// Ordered section rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMapping {
    rules: Vec<SectionRule>,
}

impl SectionMapping {
    pub fn new(rules: Vec<SectionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SectionRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Assign a key to a section using longest-prefix-wins.
    pub fn assign(&self, key: &str) -> SectionAssignment {
        let matches: Vec<(usize, &str)> = self
            .rules
            .iter()
            .filter_map(|rule| rule.match_len(key).map(|len| (len, rule.title.as_str())))
            .collect();

        let Some(best) = matches.iter().map(|(len, _)| *len).max() else {
            return SectionAssignment::Uncategorized;
        };

        let mut winners: Vec<String> = Vec::new();
        for (len, title) in matches {
            if len == best && !winners.iter().any(|w| titles_match(w, title)) {
                winners.push(title.to_string());
            }
        }

        if winners.len() == 1 {
            SectionAssignment::Section(winners.remove(0))
        } else {
            SectionAssignment::Ambiguous(AmbiguousMappingError {
                key: key.to_string(),
                sections: winners,
            })
        }
    }

    /// Position of a section title in the rule list (case-insensitive).
    pub fn position(&self, title: &str) -> Option<usize> {
        self.rules.iter().position(|r| titles_match(&r.title, title))
    }
}

/// Section titles compare case-insensitively, ignoring surrounding whitespace.
pub fn titles_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
