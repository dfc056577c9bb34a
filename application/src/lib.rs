//! Application layer for docsync
//!
//! This crate contains the sync use case and the ports it reads through.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    document_reader::{DocumentReadError, DocumentReaderPort},
    progress::{NoProgress, ProgressNotifier, SyncStage},
    source_reader::{SourceReadError, SourceReaderPort},
};
pub use use_cases::sync_docs::{
    SourceSpec, SyncDocsError, SyncDocsInput, SyncDocsOutput, SyncDocsUseCase,
};
