//! Source file representation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Error, Language, Result};

/// A source file with its content loaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file.
    pub path: PathBuf,
    /// Detected language.
    pub language: Language,
    /// File content as bytes.
    pub content: Vec<u8>,
}

/// Physical line breakdown of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub total: u32,
    pub code: u32,
    pub comment: u32,
    pub blank: u32,
}

impl SourceFile {
    /// Load a source file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let language = Language::detect(path).ok_or_else(|| Error::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            language,
            content,
        })
    }

    /// Create from existing content.
    pub fn from_content(path: impl Into<PathBuf>, language: Language, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            language,
            content,
        }
    }

    /// Get content as string (lossy conversion).
    pub fn content_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Split lines into code, comment and blank.
    ///
    /// Comment detection is a prefix heuristic; a line with code followed by a
    /// trailing comment counts as code.
    pub fn line_counts(&self) -> LineCounts {
        let prefixes = self.language.comment_prefixes();
        let mut counts = LineCounts::default();

        for line in self.content_str().lines() {
            counts.total += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                counts.blank += 1;
            } else if prefixes.iter().any(|p| trimmed.starts_with(p)) {
                counts.comment += 1;
            } else {
                counts.code += 1;
            }
        }

        counts
    }
}
