//! Composite health score.
//!
//! Five component scores (complexity, maintainability, churn, function
//! size, code structure), each 0-100 with higher meaning healthier, are
//! combined into a weighted overall score and a letter grade.

use serde::{Deserialize, Serialize};

use crate::concerns::detect_concerns;
use crate::config::ThresholdConfig;
use crate::model::{
    CategoryScore, ComponentScores, Concern, ConcernType, FileMetrics, Grade, ScoreReport,
    Severity, SummaryMetrics,
};

/// Churn score used when there is nothing to measure.
pub const NEUTRAL_CHURN_SCORE: f64 = 70.0;

/// Component weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub complexity: f64,
    pub maintainability: f64,
    pub churn: f64,
    pub function_size: f64,
    pub code_structure: f64,
}

impl ScoreWeights {
    pub const WITH_CHURN: Self = Self {
        complexity: 0.25,
        maintainability: 0.25,
        churn: 0.20,
        function_size: 0.15,
        code_structure: 0.15,
    };

    /// Churn's share is redistributed to the other four components.
    pub const WITHOUT_CHURN: Self = Self {
        complexity: 0.30,
        maintainability: 0.30,
        churn: 0.0,
        function_size: 0.20,
        code_structure: 0.20,
    };

    pub fn for_churn(has_churn_data: bool) -> Self {
        if has_churn_data {
            Self::WITH_CHURN
        } else {
            Self::WITHOUT_CHURN
        }
    }

    pub fn total(&self) -> f64 {
        self.complexity + self.maintainability + self.churn + self.function_size + self.code_structure
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::WITH_CHURN
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Letter grade: A >= 90, B >= 75, C >= 60, D >= 40, else F.
pub fn score_to_grade(score: f64) -> Grade {
    if score >= 90.0 {
        Grade::A
    } else if score >= 75.0 {
        Grade::B
    } else if score >= 60.0 {
        Grade::C
    } else if score >= 40.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// Category label using the same cut-offs as the grade.
pub fn score_category(score: f64) -> &'static str {
    if score >= 90.0 {
        "excellent"
    } else if score >= 75.0 {
        "good"
    } else if score >= 60.0 {
        "moderate"
    } else if score >= 40.0 {
        "poor"
    } else {
        "critical"
    }
}

fn category_score(score: f64, weight: f64) -> CategoryScore {
    CategoryScore {
        score,
        weight,
        category: score_category(score).to_string(),
    }
}

pub fn complexity_score(summary: &SummaryMetrics) -> f64 {
    100.0 - clamp(summary.average_cyclomatic_complexity * 5.0, 0.0, 100.0)
}

pub fn maintainability_score(summary: &SummaryMetrics) -> f64 {
    clamp(summary.average_maintainability_index, 0.0, 100.0)
}

/// Average commits per function, over functions that carry churn.
pub fn churn_score(files: &[FileMetrics], has_churn_data: bool) -> f64 {
    if !has_churn_data {
        return NEUTRAL_CHURN_SCORE;
    }

    let commits: Vec<u32> = files
        .iter()
        .flat_map(|f| f.functions.iter())
        .filter_map(|f| f.churn.map(|c| c.total_commits))
        .collect();
    if commits.is_empty() {
        return NEUTRAL_CHURN_SCORE;
    }

    let avg = commits.iter().map(|c| *c as f64).sum::<f64>() / commits.len() as f64;
    100.0 - clamp(avg * 2.0, 0.0, 100.0)
}

pub fn function_size_score(summary: &SummaryMetrics) -> f64 {
    if summary.total_functions == 0 {
        return 100.0;
    }
    let total = summary.total_functions as f64;
    let long_pct = summary.long_function_count as f64 / total;
    let very_long_pct = summary.very_long_function_count as f64 / total;
    100.0 - clamp(long_pct * 50.0 + very_long_pct * 50.0, 0.0, 100.0)
}

pub fn code_structure_score(
    files: &[FileMetrics],
    summary: &SummaryMetrics,
    thresholds: &ThresholdConfig,
) -> f64 {
    if summary.total_functions == 0 {
        return 100.0;
    }

    let mut high_nesting = 0u32;
    let mut high_params = 0u32;
    for function in files.iter().flat_map(|f| f.functions.iter()) {
        if function.nesting_depth > thresholds.nesting_depth.warning {
            high_nesting += 1;
        }
        if function.parameter_count > thresholds.parameter_count.warning {
            high_params += 1;
        }
    }

    let total = summary.total_functions as f64;
    let penalty = high_nesting as f64 / total * 40.0
        + high_params as f64 / total * 30.0
        + summary.very_high_complexity_count as f64 / total * 30.0;
    100.0 - clamp(penalty, 0.0, 100.0)
}

/// Weighted mean of the component scores, clamped to `[0, 100]`.
pub fn overall_score(scores: &ComponentScores) -> f64 {
    let (weighted, total) = scores
        .entries()
        .iter()
        .fold((0.0, 0.0), |(sum, weight), (_, c)| {
            (sum + c.score * c.weight, weight + c.weight)
        });
    if total <= 0.0 {
        return 100.0;
    }
    clamp(weighted / total, 0.0, 100.0)
}

/// The fixed report for a codebase with no functions.
pub fn empty_codebase_report() -> ScoreReport {
    let weights = ScoreWeights::WITH_CHURN;
    ScoreReport {
        overall_score: 100.0,
        overall_grade: Grade::A,
        component_scores: ComponentScores {
            complexity: category_score(100.0, weights.complexity),
            maintainability: category_score(100.0, weights.maintainability),
            churn: category_score(100.0, weights.churn),
            function_size: category_score(100.0, weights.function_size),
            code_structure: category_score(100.0, weights.code_structure),
        },
        concerns: vec![Concern {
            kind: ConcernType::EmptyCodebase,
            severity: Severity::Info,
            title: "No Functions Found".to_string(),
            description: "No functions found to analyze".to_string(),
            affected_items: Vec::new(),
        }],
        has_churn_data: false,
    }
}

/// Score the codebase and attach its concerns.
pub fn generate_report(
    files: &[FileMetrics],
    summary: &SummaryMetrics,
    has_churn_data: bool,
    thresholds: &ThresholdConfig,
) -> ScoreReport {
    if summary.total_functions == 0 {
        return empty_codebase_report();
    }

    let weights = ScoreWeights::for_churn(has_churn_data);
    let component_scores = ComponentScores {
        complexity: category_score(complexity_score(summary), weights.complexity),
        maintainability: category_score(maintainability_score(summary), weights.maintainability),
        churn: category_score(churn_score(files, has_churn_data), weights.churn),
        function_size: category_score(function_size_score(summary), weights.function_size),
        code_structure: category_score(
            code_structure_score(files, summary, thresholds),
            weights.code_structure,
        ),
    };

    let overall = overall_score(&component_scores);
    tracing::debug!("Overall score {:.1}", overall);

    ScoreReport {
        overall_score: overall,
        overall_grade: score_to_grade(overall),
        component_scores,
        concerns: detect_concerns(files, has_churn_data, thresholds),
        has_churn_data,
    }
}
