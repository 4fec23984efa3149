//! Progress bars for long simulation runs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>10} [{bar:40.cyan/blue}] {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One bar per simulation stage, stacked in a shared display
pub struct ProgressReporter {
    multi_progress: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            bars: Vec::new(),
        }
    }

    /// Add a bar and return its stage index
    pub fn add_stage(&mut self, label: &str, total: usize) -> usize {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(label.to_string());
        self.bars.push(self.multi_progress.add(bar));
        self.bars.len() - 1
    }

    /// Move a stage's bar to `position`
    pub fn update(&self, stage: usize, position: usize) {
        if let Some(bar) = self.bars.get(stage) {
            bar.set_position(position as u64);
        }
    }

    /// Mark a stage as done
    pub fn complete(&self, stage: usize) {
        if let Some(bar) = self.bars.get(stage) {
            bar.finish();
        }
    }

    /// Remove all bars from the terminal
    pub fn finish(&self) {
        let _ = self.multi_progress.clear();
    }
}
