//! Report data model.
//!
//! Every record serializes to JSON with snake_case field names. Maps that
//! reach output are `BTreeMap`s so repeated runs produce identical bytes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Language;

/// Change history for a file or function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnMetrics {
    pub total_commits: u32,
    pub total_changes: u32,
}

/// Halstead software science measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    /// n1
    pub distinct_operators: u32,
    /// n2
    pub distinct_operands: u32,
    /// N1
    pub total_operators: u32,
    /// N2
    pub total_operands: u32,
    pub vocabulary: u32,
    pub length: u32,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    /// Seconds.
    pub time_to_understand: f64,
    pub bugs_delivered: f64,
}

/// Metrics for a single function, method or named closure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,

    pub length: u32,
    pub logical_lines: u32,
    pub parameter_count: u32,
    pub return_count: u32,

    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    pub nesting_depth: u32,
    pub halstead: HalsteadMetrics,
    pub maintainability_index: f64,

    pub fan_in: u32,
    pub fan_out: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn: Option<ChurnMetrics>,
    #[serde(default)]
    pub is_hotspot: bool,
}

/// A class, struct, interface or trait declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetrics {
    pub name: String,
    pub kind: String,
    pub start_line: u32,
    pub end_line: u32,
    pub method_count: u32,
}

/// Per-file results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub path: String,
    pub language: Language,
    pub total_lines: u32,
    pub code_lines: u32,
    pub comment_lines: u32,
    pub blank_lines: u32,
    pub functions: Vec<FunctionMetrics>,
    pub types: Vec<TypeMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn: Option<ChurnMetrics>,
}

/// Rollup of every file whose parent directory is `path`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderMetrics {
    pub path: String,
    pub total_files: u32,
    pub total_functions: u32,
    pub total_lines: u32,
    pub total_code_lines: u32,
    pub total_churn: u64,
    pub hotspot_count: u32,

    pub average_complexity: f64,
    pub average_cognitive: f64,
    pub average_length: f64,
    pub average_maintainability: f64,
    pub average_churn: f64,

    /// Percentile among folders; higher means more complex.
    pub complexity_score: f64,
    pub churn_score: f64,
    pub length_score: f64,
    /// Inverted percentile; higher means less maintainable.
    pub maintainability_score: f64,
    pub hotspot_score: f64,
}

/// Codebase-wide totals and averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_files: u32,
    pub total_functions: u32,
    pub total_types: u32,
    pub total_lines: u32,
    pub total_code_lines: u32,
    pub average_cyclomatic_complexity: f64,
    pub average_cognitive_complexity: f64,
    pub average_function_length: f64,
    pub average_maintainability_index: f64,
    pub hotspot_count: u32,
    pub high_complexity_count: u32,
    pub very_high_complexity_count: u32,
    pub long_function_count: u32,
    pub very_long_function_count: u32,
}

/// Rollup for one owner across every file they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerMetrics {
    pub owner: String,
    pub file_count: u32,
    pub function_count: u32,
    pub total_lines: u32,
    pub avg_cyclomatic_complexity: f64,
    pub avg_cognitive_complexity: f64,
    pub avg_maintainability_index: f64,
    pub hotspot_count: u32,
    pub high_complexity_function_count: u32,
    pub overall_health_score: f64,
}

/// Concern severity, ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of concern the detectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcernType {
    ChurnComplexityHotspot,
    HighChurnLongFunction,
    LowMaintainability,
    DeepNesting,
    TooManyParameters,
    GodFunction,
    BlastRadius,
    EmptyCodebase,
}

impl ConcernType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChurnComplexityHotspot => "churn_complexity_hotspot",
            Self::HighChurnLongFunction => "high_churn_long_function",
            Self::LowMaintainability => "low_maintainability",
            Self::DeepNesting => "deep_nesting",
            Self::TooManyParameters => "too_many_parameters",
            Self::GodFunction => "god_function",
            Self::BlastRadius => "blast_radius",
            Self::EmptyCodebase => "empty_codebase",
        }
    }
}

impl fmt::Display for ConcernType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The metrics that justify flagging one function, typed per concern.
///
/// Serialized untagged, so each variant is written as a plain
/// `{name: value}` object. Variants whose field set is a superset of
/// another's come first so deserialization picks the right one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemMetrics {
    Hotspot {
        complexity: u32,
        churn: u32,
    },
    ChurnLength {
        length: u32,
        churn: u32,
    },
    Maintainability {
        maintainability_index: f64,
        cyclomatic_complexity: u32,
        length: u32,
        halstead_volume: f64,
    },
    GodFunction {
        parameter_count: u32,
        fan_in: u32,
    },
    BlastRadius {
        fan_in: u32,
        approximate: bool,
    },
    Nesting {
        nesting_depth: u32,
    },
    Parameters {
        parameter_count: u32,
    },
}

impl ItemMetrics {
    /// Name/value pairs in declaration order, for text renderers.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Hotspot { complexity, churn } => vec![
                ("complexity", complexity.to_string()),
                ("churn", churn.to_string()),
            ],
            Self::ChurnLength { length, churn } => vec![
                ("length", length.to_string()),
                ("churn", churn.to_string()),
            ],
            Self::Maintainability {
                maintainability_index,
                cyclomatic_complexity,
                length,
                halstead_volume,
            } => vec![
                ("maintainability_index", format!("{maintainability_index:.1}")),
                ("cyclomatic_complexity", cyclomatic_complexity.to_string()),
                ("length", length.to_string()),
                ("halstead_volume", format!("{halstead_volume:.1}")),
            ],
            Self::GodFunction {
                parameter_count,
                fan_in,
            } => vec![
                ("parameter_count", parameter_count.to_string()),
                ("fan_in", fan_in.to_string()),
            ],
            Self::BlastRadius {
                fan_in,
                approximate,
            } => vec![
                ("fan_in", fan_in.to_string()),
                ("approximate", approximate.to_string()),
            ],
            Self::Nesting { nesting_depth } => {
                vec![("nesting_depth", nesting_depth.to_string())]
            }
            Self::Parameters { parameter_count } => {
                vec![("parameter_count", parameter_count.to_string())]
            }
        }
    }
}

/// One function named by a concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedItem {
    pub file_path: String,
    pub function_name: String,
    pub line: u32,
    pub metrics: ItemMetrics,
}

/// An actionable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    #[serde(rename = "type")]
    pub kind: ConcernType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_items: Vec<AffectedItem>,
}

/// Letter grade for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// One weighted component of the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub weight: f64,
    pub category: String,
}

/// The five scored components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub complexity: CategoryScore,
    pub maintainability: CategoryScore,
    pub churn: CategoryScore,
    pub function_size: CategoryScore,
    pub code_structure: CategoryScore,
}

impl ComponentScores {
    /// Components in report order, with their display names.
    pub fn entries(&self) -> [(&'static str, &CategoryScore); 5] {
        [
            ("complexity", &self.complexity),
            ("maintainability", &self.maintainability),
            ("churn", &self.churn),
            ("function_size", &self.function_size),
            ("code_structure", &self.code_structure),
        ]
    }
}

/// Overall score, grade, component breakdown and concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall_score: f64,
    pub overall_grade: Grade,
    pub component_scores: ComponentScores,
    pub concerns: Vec<Concern>,
    pub has_churn_data: bool,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repository: String,
    pub analyzed_at: DateTime<Utc>,
    pub files: Vec<FileMetrics>,
    pub folder_stats: BTreeMap<String, FolderMetrics>,
    pub summary: SummaryMetrics,
    pub owners: Vec<OwnerMetrics>,
    pub score_report: ScoreReport,
}

impl AnalysisResult {
    /// Iterate over every function in file order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionMetrics> {
        self.files.iter().flat_map(|f| f.functions.iter())
    }
}
