//! Progress notification port
//!
//! Defines the interface for reporting progress through the sync pipeline.

use std::fmt;

/// Pipeline stages, in the order they complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    LoadSources,
    ParseDocument,
    Classify,
    Reconcile,
    Render,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStage::LoadSources => "load sources",
            SyncStage::ParseDocument => "parse document",
            SyncStage::Classify => "classify",
            SyncStage::Reconcile => "reconcile",
            SyncStage::Render => "render",
        }
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during a sync run
///
/// Implementations live in the presentation layer. Source loading and
/// document parsing run concurrently, so their callbacks may interleave.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts; `total_items` is the number of work items
    fn on_stage_start(&self, stage: &SyncStage, total_items: usize);

    /// Called when one item (e.g. a source file) of a stage is done
    fn on_item_complete(&self, _stage: &SyncStage, _item: &str, _success: bool) {}

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: &SyncStage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: &SyncStage, _total_items: usize) {}
    fn on_stage_complete(&self, _stage: &SyncStage) {}
}
