//! Churn data loaded from an external history export.
//!
//! Commit history is not mined here. A separate git tool writes a JSON
//! document and the index below answers per-file and per-function lookups:
//!
//! ```json
//! {
//!   "files": {
//!     "pkg/api/handler.go": {
//!       "total_commits": 14,
//!       "total_changes": 380,
//!       "functions": { "Handle": { "total_commits": 9, "total_changes": 120 } }
//!     }
//!   }
//! }
//! ```
//!
//! Entries that do not match that shape are skipped with a warning so one bad
//! record does not discard the whole export.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Error, Result};
use crate::model::ChurnMetrics;

/// History for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChurn {
    pub total_commits: u32,
    pub total_changes: u32,
    pub functions: BTreeMap<String, ChurnMetrics>,
}

impl FileChurn {
    pub fn metrics(&self) -> ChurnMetrics {
        ChurnMetrics {
            total_commits: self.total_commits,
            total_changes: self.total_changes,
        }
    }
}

/// Churn lookups keyed by repository-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnIndex {
    #[serde(default)]
    files: BTreeMap<String, FileChurn>,
}

impl ChurnIndex {
    /// Load an index from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let index = Self::from_json(&content).map_err(|e| match e {
            Error::Churn { message, .. } => Error::churn(path, message),
            other => other,
        })?;
        tracing::debug!("Loaded churn for {} files from {}", index.len(), path.display());
        Ok(index)
    }

    /// Parse an index from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let root: serde_json::Value =
            serde_json::from_str(content).map_err(|e| Error::churn("<inline>", e.to_string()))?;

        let files = match root.get("files") {
            Some(serde_json::Value::Object(files)) => files,
            Some(_) => return Err(Error::churn("<inline>", "\"files\" must be an object")),
            None => return Ok(Self::default()),
        };

        let mut index = Self::default();
        for (path, entry) in files {
            match serde_json::from_value::<FileChurn>(entry.clone()) {
                Ok(churn) => {
                    index.files.insert(normalize_path(path), churn);
                }
                Err(e) => warn!("Skipping churn entry for {}: {}", path, e),
            }
        }
        Ok(index)
    }

    pub fn insert(&mut self, path: &str, churn: FileChurn) {
        self.files.insert(normalize_path(path), churn);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File-level history.
    pub fn file(&self, path: &str) -> Option<ChurnMetrics> {
        self.files.get(&normalize_path(path)).map(FileChurn::metrics)
    }

    /// Function-level history. Falls back to `None` when the file is known but
    /// the function is not.
    pub fn function(&self, path: &str, name: &str) -> Option<ChurnMetrics> {
        self.files
            .get(&normalize_path(path))
            .and_then(|file| file.functions.get(name).copied())
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}
