//! Error types for the healthscan library.
//!
//! The metrics engine itself is total and never fails; these errors come from
//! the collaborator layers around it (configuration, file discovery, parsing,
//! churn loading and the CLI).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using healthscan's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting input for the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported language for the given file.
    #[error("Unsupported language for file: {path}")]
    UnsupportedLanguage { path: PathBuf },

    /// Parse error from tree-sitter.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration error, including threshold ordering violations.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Churn data could not be loaded.
    #[error("Churn data error in {path}: {message}")]
    Churn { path: PathBuf, message: String },

    /// Analysis-specific error.
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Overall score below the configured bar (for CI gating).
    #[error("Threshold violation: {message}")]
    ThresholdViolation { message: String, score: f64 },
}

impl Error {
    /// Create a new analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new churn data error.
    pub fn churn(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Churn {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a threshold violation error.
    pub fn threshold_violation(message: impl Into<String>, score: f64) -> Self {
        Self::ThresholdViolation {
            message: message.into(),
            score,
        }
    }
}
