//! Local filesystem adapters for the source and document reader ports.

mod document;
mod source;

pub use document::LocalDocumentStore;
pub use source::LocalSourceReader;

use std::path::{Path, PathBuf};

/// Resolve `path` against an optional root directory.
fn resolve(root: Option<&Path>, path: &Path) -> PathBuf {
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}
