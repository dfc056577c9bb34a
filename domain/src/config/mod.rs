//! Configuration value objects for the domain layer
//!
//! These are caller-supplied settings that steer the pipeline: how keys are
//! assigned to documentation sections and the policy knobs of reconciliation.

mod mapping;
mod options;
mod output_format;

pub use mapping::{SectionAssignment, SectionMapping, SectionRule, UNCATEGORIZED_SECTION, titles_match};
pub use options::SyncOptions;
pub use output_format::OutputFormat;
