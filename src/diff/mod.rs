//! Comparison of two saved analysis runs.
//!
//! Both sides are `AnalysisResult` records as written by `analyze -f json`.
//! Deltas are always `current - previous`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{Error, Result};
use crate::model::{AnalysisResult, OwnerMetrics};

/// Codebase-wide changes between two runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricDeltas {
    pub score: f64,
    pub average_complexity: f64,
    pub average_maintainability: f64,
    pub churn: i64,
    pub hotspot_count: i64,
    pub function_count: i64,
    pub file_count: i64,
}

/// Whether an owner appears in one run or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerStatus {
    Added,
    Removed,
    Changed,
}

impl OwnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

/// Changes for one owner. Counts treat a missing side as zero; averages and
/// health are only compared when the owner exists in both runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerDelta {
    pub owner: String,
    pub status: OwnerStatus,
    pub file_count: i64,
    pub function_count: i64,
    pub hotspot_count: i64,
    pub avg_cyclomatic_complexity: Option<f64>,
    pub avg_maintainability_index: Option<f64>,
    pub previous_health_score: Option<f64>,
    pub current_health_score: Option<f64>,
    pub health_score: Option<f64>,
}

/// Hotspot functions keyed `path:name`, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotspotChanges {
    pub new: Vec<String>,
    pub fixed: Vec<String>,
    pub persistent: Vec<String>,
}

/// Everything `diff` reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDiff {
    pub previous_analyzed_at: DateTime<Utc>,
    pub current_analyzed_at: DateTime<Utc>,
    pub previous_score: f64,
    pub current_score: f64,
    pub metrics: MetricDeltas,
    pub owners: Vec<OwnerDelta>,
    pub hotspots: HotspotChanges,
}

/// Read a saved analysis from disk.
pub fn load_result(path: impl AsRef<Path>) -> Result<AnalysisResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        Error::InvalidArgument(format!(
            "{} is not a saved analysis (run `analyze -f json`): {e}",
            path.display()
        ))
    })
}

/// Compare two runs.
pub fn compare(previous: &AnalysisResult, current: &AnalysisResult) -> AnalysisDiff {
    AnalysisDiff {
        previous_analyzed_at: previous.analyzed_at,
        current_analyzed_at: current.analyzed_at,
        previous_score: previous.score_report.overall_score,
        current_score: current.score_report.overall_score,
        metrics: metric_deltas(previous, current),
        owners: owner_deltas(&previous.owners, &current.owners),
        hotspots: hotspot_changes(previous, current),
    }
}

fn metric_deltas(previous: &AnalysisResult, current: &AnalysisResult) -> MetricDeltas {
    let (before, after) = (&previous.summary, &current.summary);
    let mut deltas = MetricDeltas {
        score: current.score_report.overall_score - previous.score_report.overall_score,
        churn: total_churn(current) - total_churn(previous),
        hotspot_count: i64::from(after.hotspot_count) - i64::from(before.hotspot_count),
        function_count: i64::from(after.total_functions) - i64::from(before.total_functions),
        file_count: i64::from(after.total_files) - i64::from(before.total_files),
        ..Default::default()
    };
    // An empty baseline has no meaningful averages.
    if before.total_files > 0 {
        deltas.average_complexity =
            after.average_cyclomatic_complexity - before.average_cyclomatic_complexity;
        deltas.average_maintainability =
            after.average_maintainability_index - before.average_maintainability_index;
    }
    deltas
}

fn total_churn(result: &AnalysisResult) -> i64 {
    let total: u64 = result.folder_stats.values().map(|f| f.total_churn).sum();
    i64::try_from(total).unwrap_or(i64::MAX)
}

fn owner_deltas(previous: &[OwnerMetrics], current: &[OwnerMetrics]) -> Vec<OwnerDelta> {
    let before: BTreeMap<&str, &OwnerMetrics> =
        previous.iter().map(|o| (o.owner.as_str(), o)).collect();
    let after: BTreeMap<&str, &OwnerMetrics> =
        current.iter().map(|o| (o.owner.as_str(), o)).collect();
    let names: BTreeSet<&str> = before.keys().chain(after.keys()).copied().collect();

    names
        .into_iter()
        .map(|name| owner_delta(name, before.get(name).copied(), after.get(name).copied()))
        .collect()
}

fn owner_delta(name: &str, before: Option<&OwnerMetrics>, after: Option<&OwnerMetrics>) -> OwnerDelta {
    let count = |pick: fn(&OwnerMetrics) -> u32| {
        i64::from(after.map_or(0, pick)) - i64::from(before.map_or(0, pick))
    };
    let both = before.zip(after);
    let status = match (before, after) {
        (None, _) => OwnerStatus::Added,
        (_, None) => OwnerStatus::Removed,
        _ => OwnerStatus::Changed,
    };

    OwnerDelta {
        owner: name.to_string(),
        status,
        file_count: count(|o| o.file_count),
        function_count: count(|o| o.function_count),
        hotspot_count: count(|o| o.hotspot_count),
        avg_cyclomatic_complexity: both
            .map(|(b, a)| a.avg_cyclomatic_complexity - b.avg_cyclomatic_complexity),
        avg_maintainability_index: both
            .map(|(b, a)| a.avg_maintainability_index - b.avg_maintainability_index),
        previous_health_score: before.map(|o| o.overall_health_score),
        current_health_score: after.map(|o| o.overall_health_score),
        health_score: both.map(|(b, a)| a.overall_health_score - b.overall_health_score),
    }
}

fn hotspot_keys(result: &AnalysisResult) -> BTreeSet<String> {
    result
        .functions()
        .filter(|f| f.is_hotspot)
        .map(|f| format!("{}:{}", f.file_path, f.name))
        .collect()
}

fn hotspot_changes(previous: &AnalysisResult, current: &AnalysisResult) -> HotspotChanges {
    let before = hotspot_keys(previous);
    let after = hotspot_keys(current);
    HotspotChanges {
        new: after.difference(&before).cloned().collect(),
        fixed: before.difference(&after).cloned().collect(),
        persistent: after.intersection(&before).cloned().collect(),
    }
}
