//! Use cases (application services)

pub mod sync_docs;
