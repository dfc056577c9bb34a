//! Reconciliation policy from TOML (`[reconcile]` section)

use docsync_domain::SyncOptions;
use serde::{Deserialize, Serialize};

/// Raw reconcile configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReconcileConfig {
    /// Sort added rows alphabetically instead of discovery order
    pub sort_added: bool,
    /// Description marker for rows that are documented on purpose without a key
    pub doc_only_marker: String,
    /// Name substrings that mark a key as secret-like
    pub secret_patterns: Vec<String>,
}

impl Default for FileReconcileConfig {
    fn default() -> Self {
        let options = SyncOptions::default();
        Self {
            sort_added: options.sort_added,
            doc_only_marker: options.doc_only_marker,
            secret_patterns: options.secret_patterns,
        }
    }
}

impl FileReconcileConfig {
    pub fn to_options(&self) -> SyncOptions {
        SyncOptions {
            sort_added: self.sort_added,
            doc_only_marker: self.doc_only_marker.clone(),
            secret_patterns: self.secret_patterns.clone(),
        }
    }
}
