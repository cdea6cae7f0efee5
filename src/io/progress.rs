//! Terminal progress display for a single generation run

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Progress bar that tracks filled cells out of the target region
pub struct GenerationProgress {
    bar: ProgressBar,
}

impl GenerationProgress {
    /// Create a bar for `path` with `total_cells` cells to fill
    pub fn new(path: &Path, total_cells: usize) -> Self {
        let bar = ProgressBar::new(total_cells as u64);
        bar.set_style(Self::style());
        bar.set_prefix(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        Self { bar }
    }

    /// Bar that never draws, for quiet runs and tests
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Report filled cells and backtracks so far
    pub fn update(&self, filled: usize, backtracks: usize) {
        self.bar.set_position(filled as u64);
        self.bar.set_message(format!("{backtracks} undone"));
    }

    /// Cells reported as filled
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish the bar with a summary message
    pub fn finish(&self, unfilled: usize) {
        let message = if unfilled == 0 {
            "complete".to_string()
        } else {
            format!("{unfilled} unfilled")
        };
        self.bar.finish_with_message(message);
    }

    fn style() -> ProgressStyle {
        let template =
            format!("{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}");
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ")
    }
}
