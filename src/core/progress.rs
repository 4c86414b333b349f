//! Progress reporting for the parse phase using indicatif.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

fn file_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// A thread-safe progress tracker shared by the rayon workers.
#[derive(Clone)]
pub struct ProgressTracker {
    bar: ProgressBar,
    counter: Arc<AtomicUsize>,
}

impl ProgressTracker {
    /// Create a visible tracker with the given total count.
    pub fn new(total: usize, message: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(file_style());
        bar.set_message(message.to_string());

        Self {
            bar,
            counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a hidden tracker (for non-TTY output and tests).
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);

        Self {
            bar,
            counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Visible when stderr is a terminal, hidden otherwise.
    pub fn for_terminal(total: usize, message: &str) -> Self {
        if is_tty() {
            Self::new(total, message)
        } else {
            Self::hidden(total)
        }
    }

    /// Increment the progress counter by one.
    pub fn inc(&self) {
        self.counter.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
    }

    /// Finish and clear the progress bar.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Check if stderr is a TTY.
pub fn is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}
