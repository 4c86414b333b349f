//! File discovery for analysis.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use super::{Error, Language, Result};
use crate::config::Config;

/// The source files to analyze, respecting .gitignore.
#[derive(Debug, Clone)]
pub struct FileSet {
    /// Root directory.
    root: PathBuf,
    /// Files in the set, sorted.
    files: Vec<PathBuf>,
}

impl FileSet {
    /// Collect files under `path` using the config's exclude globs and
    /// language filter.
    pub fn from_path(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let languages = config.analysis.resolved_languages()?;
        Self::collect(path, &config.exclude_patterns, &languages)
    }

    /// Collect every supported file under `path`.
    pub fn from_path_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::collect(path, &[], &[])
    }

    fn collect(
        path: impl AsRef<Path>,
        exclude_patterns: &[String],
        languages: &[Language],
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let root = path.canonicalize()?;
        let excludes = build_glob_set(exclude_patterns)?;

        let walker = WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let Some(language) = Language::detect(path) else {
                continue;
            };
            if !languages.is_empty() && !languages.contains(&language) {
                continue;
            }

            let relative = path.strip_prefix(&root).unwrap_or(path);
            if excludes.is_match(relative) {
                tracing::debug!("Excluded {}", relative.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        // Sort for deterministic ordering
        files.sort();

        Ok(Self { root, files })
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get all files in the set.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the file set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path relative to the root, with `/` separators, as used in reports.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("invalid exclude patterns: {e}")))
}
