//! Section mapping entries from TOML (`[[sections]]` array)

use docsync_domain::SectionRule;
use serde::{Deserialize, Serialize};

/// A documentation section and the key prefixes it claims
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSectionConfig {
    pub title: String,
    pub prefixes: Vec<String>,
}

impl FileSectionConfig {
    /// Parse the CLI form `Title=prefix1,prefix2`.
    pub fn parse_flag(value: &str) -> Option<Self> {
        let (title, prefixes) = value.split_once('=')?;
        Some(Self {
            title: title.trim().to_string(),
            prefixes: prefixes
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn to_rule(&self) -> SectionRule {
        SectionRule {
            title: self.title.trim().to_string(),
            prefixes: self.prefixes.clone(),
        }
    }
}
