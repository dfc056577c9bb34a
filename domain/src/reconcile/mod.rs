//! Reconciler: the ChangeSet between configuration keys and documentation.
//!
//! - [`change_set`] - additions, removals, field-level updates per section
//! - [`reconciler`] - the pure matching function producing a [`ChangeSet`]

pub mod change_set;
pub mod reconciler;

pub use change_set::{
    ChangeSet, ChangeSummary, EntryAddition, EntryRemoval, EntryUpdate, EnvironmentViewChange,
    Field, FieldDiff, RowRef, SectionChanges, SectionTarget, required_cell,
};
pub use reconciler::reconcile;
