//! Rollups over per-function metrics: folders, the whole codebase and
//! owners, plus the percentile ranking used to normalize them.

mod folder;
mod owners;
mod summary;

pub use folder::{aggregate_by_folder, calculate_scores, folder_path, folder_stats};
pub use owners::{aggregate_by_owner, owner_health_score, OwnershipMap};

use crate::model::FileMetrics;

/// Share of `values` that are `<= value`, as a percentage in `[0, 100]`.
///
/// A non-finite `value` or an empty set ranks 0.
pub fn percentile_rank(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() || !value.is_finite() {
        return 0.0;
    }
    let at_or_below = values.iter().filter(|v| **v <= value).count();
    clamp_percent(100.0 * at_or_below as f64 / values.len() as f64)
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Percentile ranks against a fixed population, answering each query with a
/// binary search. Matches [`percentile_rank`] exactly.
#[derive(Debug, Clone)]
pub struct PercentileIndex {
    sorted: Vec<f64>,
    population: usize,
}

impl PercentileIndex {
    pub fn new(values: &[f64]) -> Self {
        // NaN is never <= anything, so it only contributes to the population.
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        Self {
            sorted,
            population: values.len(),
        }
    }

    pub fn rank(&self, value: f64) -> f64 {
        if self.population == 0 || !value.is_finite() {
            return 0.0;
        }
        let at_or_below = self.sorted.partition_point(|v| *v <= value);
        clamp_percent(100.0 * at_or_below as f64 / self.population as f64)
    }
}

/// Percentile both metrics must exceed for a function to be a hotspot.
pub const HOTSPOT_PERCENTILE: f64 = 70.0;

/// Flag functions that rank in the top churn and complexity percentiles.
///
/// Only functions that carry churn data take part, and only they can be
/// hotspots. Complexity is cyclomatic; churn is total commits.
pub fn mark_hotspots(files: &mut [FileMetrics]) {
    let mut complexities = Vec::new();
    let mut commits = Vec::new();
    for function in files.iter().flat_map(|f| f.functions.iter()) {
        if let Some(churn) = function.churn {
            complexities.push(function.cyclomatic_complexity as f64);
            commits.push(churn.total_commits as f64);
        }
    }

    let complexity_index = PercentileIndex::new(&complexities);
    let churn_index = PercentileIndex::new(&commits);

    for function in files.iter_mut().flat_map(|f| f.functions.iter_mut()) {
        function.is_hotspot = match function.churn {
            Some(churn) => {
                churn_index.rank(churn.total_commits as f64) > HOTSPOT_PERCENTILE
                    && complexity_index.rank(function.cyclomatic_complexity as f64)
                        > HOTSPOT_PERCENTILE
            }
            None => false,
        };
    }

    let count = files
        .iter()
        .flat_map(|f| f.functions.iter())
        .filter(|f| f.is_hotspot)
        .count();
    tracing::debug!("Marked {} hotspot functions", count);
}
