//! healthscan - code health metrics and scoring for multi-language source trees.
//!
//! healthscan parses source files with tree-sitter, computes per-function
//! complexity metrics (cyclomatic, cognitive, nesting, Halstead and the
//! maintainability index), rolls them up per folder and owner, scores the
//! codebase on a 0-100 scale and reports prioritized concerns.
//!
//! # Supported Languages
//!
//! Go, Rust, Python, TypeScript, JavaScript, TSX/JSX, Java
//!
//! # Example
//!
//! ```no_run
//! use healthscan::analysis::Analyzer;
//! use healthscan::config::Config;
//! use healthscan::core::{AnalysisContext, FileSet};
//!
//! let config = Config::default();
//! let files = FileSet::from_path(".", &config).unwrap();
//! let ctx = AnalysisContext::new(&files, &config);
//! let result = Analyzer::new().analyze(&ctx).unwrap();
//! println!(
//!     "{} functions, score {:.1} ({})",
//!     result.summary.total_functions,
//!     result.score_report.overall_score,
//!     result.score_report.overall_grade
//! );
//! ```

pub mod aggregate;
pub mod analysis;
pub mod callgraph;
pub mod churn;
pub mod cli;
pub mod concerns;
pub mod config;
pub mod core;
pub mod diff;
pub mod metrics;
pub mod model;
pub mod output;
pub mod parser;
pub mod score;

pub use analysis::Analyzer;
pub use crate::core::{AnalysisContext, Error, Result};
pub use model::AnalysisResult;
