use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

const BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA {eta})";

/// Global count of processed lines against the pre-scanned total.
///
/// Every line advances the counter exactly once: structural lines when they
/// are copied, translatable lines when their unit finishes, successful or not.
pub struct Progress {
    bar: ProgressBar,
    processed: AtomicU64,
}

impl Progress {
    /// Visible bar on stderr
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(description.to_string());
        Self {
            bar,
            processed: AtomicU64::new(0),
        }
    }

    /// Counter without any terminal output
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
        Self {
            bar,
            processed: AtomicU64::new(0),
        }
    }

    pub fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    pub fn advance(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

/// Aggregate counters read once all work is done
#[derive(Debug, Default)]
pub struct BatchStats {
    files_completed: AtomicUsize,
    lines_translated: AtomicUsize,
}

impl BatchStats {
    pub fn file_completed(&self) {
        self.files_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn line_translated(&self) {
        self.lines_translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn files_completed(&self) -> usize {
        self.files_completed.load(Ordering::Relaxed)
    }

    pub fn lines_translated(&self) -> usize {
        self.lines_translated.load(Ordering::Relaxed)
    }
}
