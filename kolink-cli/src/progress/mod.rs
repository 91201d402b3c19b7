//! Progress display for multi-file scans

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} documents {msg}";

/// Shows how many documents have been scanned
///
/// Safe to share across rayon workers; a single document or `--quiet` shows
/// nothing.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Reporter that stays silent when `quiet` is set
    pub fn new(quiet: bool) -> Self {
        Self { bar: None, quiet }
    }

    /// Start a bar for `documents` inputs
    pub fn init_files(&mut self, documents: u64) {
        if self.quiet || documents < 2 {
            return;
        }

        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(documents).with_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        self.bar = Some(bar);
    }

    /// Count one scanned document
    pub fn file_completed(&self, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(name.to_string());
            bar.inc(1);
        }
    }

    /// Clear the bar once every document is done
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
