//! Folder rollup and percentile normalization.

use std::collections::BTreeMap;

use crate::model::{FileMetrics, FolderMetrics};

use super::PercentileIndex;

/// Parent directory of a `/`-separated path; root files map to `"."`.
pub fn folder_path(file_path: &str) -> String {
    match file_path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => ".".to_string(),
    }
}

/// Group files by parent directory and compute sums and raw averages.
///
/// Scores are left at zero; see [`calculate_scores`].
pub fn aggregate_by_folder(files: &[FileMetrics]) -> BTreeMap<String, FolderMetrics> {
    let mut folders: BTreeMap<String, FolderMetrics> = BTreeMap::new();

    for file in files {
        let path = folder_path(&file.path);
        let folder = folders.entry(path.clone()).or_insert_with(|| FolderMetrics {
            path,
            ..Default::default()
        });

        folder.total_files += 1;
        folder.total_lines += file.total_lines;
        folder.total_code_lines += file.code_lines;
        folder.total_functions += file.functions.len() as u32;

        for function in &file.functions {
            folder.average_complexity += function.cyclomatic_complexity as f64;
            folder.average_cognitive += function.cognitive_complexity as f64;
            folder.average_length += function.length as f64;
            folder.average_maintainability += function.maintainability_index;

            if let Some(churn) = function.churn {
                folder.total_churn += churn.total_changes as u64;
                folder.average_churn += churn.total_changes as f64;
            }
            if function.is_hotspot {
                folder.hotspot_count += 1;
            }
        }
    }

    for folder in folders.values_mut() {
        if folder.total_functions > 0 {
            let count = folder.total_functions as f64;
            folder.average_complexity /= count;
            folder.average_cognitive /= count;
            folder.average_length /= count;
            folder.average_maintainability /= count;
            folder.average_churn /= count;
        }
    }

    folders
}

/// Rank each folder's averages against every folder's, in place.
///
/// Maintainability is inverted so that higher always means worse.
pub fn calculate_scores(folders: &mut BTreeMap<String, FolderMetrics>) {
    let collect = |f: fn(&FolderMetrics) -> f64| -> PercentileIndex {
        let values: Vec<f64> = folders.values().map(f).collect();
        PercentileIndex::new(&values)
    };
    let complexity = collect(|f| f.average_complexity);
    let churn = collect(|f| f.average_churn);
    let length = collect(|f| f.average_length);
    let maintainability = collect(|f| f.average_maintainability);

    for folder in folders.values_mut() {
        folder.complexity_score = complexity.rank(folder.average_complexity);
        folder.churn_score = churn.rank(folder.average_churn);
        folder.length_score = length.rank(folder.average_length);
        folder.maintainability_score = 100.0 - maintainability.rank(folder.average_maintainability);
        folder.hotspot_score = (folder.complexity_score + folder.churn_score) / 2.0;
    }
}

/// Rollup followed by normalization.
pub fn folder_stats(files: &[FileMetrics]) -> BTreeMap<String, FolderMetrics> {
    let mut folders = aggregate_by_folder(files);
    calculate_scores(&mut folders);
    folders
}
