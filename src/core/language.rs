//! Language detection and enumeration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages with a front-end adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Rust,
    Python,
    TypeScript,
    JavaScript,
    Tsx,
    Jsx,
    Java,
}

impl Language {
    /// Detect language from file path based on extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::from_extension(extension)
    }

    /// Get language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "tsx" => Some(Self::Tsx),
            "jsx" => Some(Self::Jsx),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Resolve a language from a user-facing name, as written in the
    /// `analysis.languages` config list.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "go" | "golang" => Some(Self::Go),
            "rust" => Some(Self::Rust),
            "python" => Some(Self::Python),
            "typescript" | "ts" => Some(Self::TypeScript),
            "javascript" | "js" => Some(Self::JavaScript),
            "tsx" => Some(Self::Tsx),
            "jsx" => Some(Self::Jsx),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Get the display name for the language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Python => "Python",
            Self::TypeScript => "TypeScript",
            Self::JavaScript => "JavaScript",
            Self::Tsx => "TSX",
            Self::Jsx => "JSX",
            Self::Java => "Java",
        }
    }

    /// Whether this language belongs to the JavaScript grammar family.
    pub fn is_ecmascript(&self) -> bool {
        matches!(
            self,
            Self::TypeScript | Self::JavaScript | Self::Tsx | Self::Jsx
        )
    }

    /// Line comment prefixes used when splitting code from comment lines.
    pub fn comment_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["#", "\"\"\"", "'''"],
            _ => &["//", "/*", "*"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
