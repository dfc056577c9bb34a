//! Policy knobs shared by the classification, reconciliation and render stages.

use serde::{Deserialize, Serialize};

/// Options that steer a synchronization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Sort added rows alphabetically instead of discovery order
    pub sort_added: bool,
    /// Description marker that protects documentation-only rows from removal
    pub doc_only_marker: String,
    /// Case-insensitive name substrings that make a key secret-like
    pub secret_patterns: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            sort_added: false,
            doc_only_marker: "documentation-only".to_string(),
            secret_patterns: ["password", "secret", "token", "key"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SyncOptions {
    /// Whether a key name implies credential data.
    pub fn is_secret_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.secret_patterns
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| lower.contains(&p.to_lowercase()))
    }

    /// Whether a documented description carries the documentation-only marker.
    pub fn is_doc_only(&self, description: &str) -> bool {
        !self.doc_only_marker.is_empty()
            && description
                .to_lowercase()
                .contains(&self.doc_only_marker.to_lowercase())
    }
}
