//! Core types shared by the collaborator layers.

mod analyzer;
mod error;
mod file_set;
mod language;
pub mod progress;
mod source_file;

pub use analyzer::AnalysisContext;
pub use error::{Error, Result};
pub use file_set::FileSet;
pub use language::Language;
pub use source_file::{LineCounts, SourceFile};
