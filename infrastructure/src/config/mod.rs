//! Configuration file loading for docsync
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOCSYNC_*` environment variables (`__` separates nesting, e.g. `DOCSYNC_OUTPUT__FORMAT`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./docsync.toml` or `./.docsync.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/docsync/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDocumentConfig, FileOutputConfig, FileOutputFormat,
    FileReconcileConfig, FileSectionConfig, FileSourceConfig,
};
pub use loader::ConfigLoader;
