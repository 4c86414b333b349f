//! Shared inputs for one analysis run.

use std::path::Path;

use super::FileSet;
use crate::churn::ChurnIndex;
use crate::config::Config;

/// Context handed to the analyzer: what to scan and how.
pub struct AnalysisContext<'a> {
    /// Root directory being analyzed.
    pub root: &'a Path,
    /// Set of files to analyze.
    pub files: &'a FileSet,
    /// Configuration.
    pub config: &'a Config,
    /// Loaded churn export, if any.
    pub churn: Option<&'a ChurnIndex>,
    /// Progress callback.
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync + 'a>>,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context.
    pub fn new(files: &'a FileSet, config: &'a Config) -> Self {
        Self {
            root: files.root(),
            files,
            config,
            churn: None,
            on_progress: None,
        }
    }

    /// Attach churn data.
    pub fn with_churn(mut self, churn: &'a ChurnIndex) -> Self {
        self.churn = Some(churn);
        self
    }

    /// Add progress callback.
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'a,
    {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Report progress if callback is set.
    pub fn report_progress(&self, current: usize, total: usize) {
        if let Some(ref f) = self.on_progress {
            f(current, total);
        }
    }

    /// Churn data is used only when loaded and not switched off.
    pub fn has_churn_data(&self) -> bool {
        self.churn.is_some() && !self.config.analysis.skip_churn
    }

    /// The churn index to consult, honoring `skip_churn`.
    pub fn active_churn(&self) -> Option<&'a ChurnIndex> {
        if self.has_churn_data() {
            self.churn
        } else {
            None
        }
    }
}
