//! Progress reporting for sync runs

use colored::Colorize;
use docsync_application::{ProgressNotifier, SyncStage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one bar per pipeline stage
///
/// Source loading and document parsing overlap, so bars are tracked by stage
/// rather than as a single current bar.
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<SyncStage, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_display_name(stage: &SyncStage) -> &'static str {
        match stage {
            SyncStage::LoadSources => "Loading sources",
            SyncStage::ParseDocument => "Parsing document",
            SyncStage::Classify => "Classifying keys",
            SyncStage::Reconcile => "Reconciling",
            SyncStage::Render => "Rendering",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: &SyncStage, total_items: usize) {
        let pb = self.multi.add(ProgressBar::new(total_items as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_display_name(stage));
        pb.set_message("Starting...");

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(*stage, pb);
        }
    }

    fn on_item_complete(&self, stage: &SyncStage, item: &str, success: bool) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(stage)
        {
            let status = if success {
                format!("{} {}", "v".green(), item)
            } else {
                format!("{} {}", "x".red(), item)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: &SyncStage) {
        let pb = self.bars.lock().ok().and_then(|mut bars| bars.remove(stage));
        if let Some(pb) = pb {
            if let Some(length) = pb.length() {
                pb.set_position(length);
            }
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }
}
