//! Codebase-wide summary.

use crate::config::ThresholdConfig;
use crate::model::{FileMetrics, SummaryMetrics};

impl SummaryMetrics {
    /// Totals and averages over every file and function.
    ///
    /// The high/long counters use strict `>` against the warning and
    /// critical thresholds.
    pub fn from_files(files: &[FileMetrics], thresholds: &ThresholdConfig) -> Self {
        let mut summary = Self {
            total_files: files.len() as u32,
            ..Default::default()
        };

        let mut sum_cc = 0.0;
        let mut sum_cognitive = 0.0;
        let mut sum_length = 0.0;
        let mut sum_mi = 0.0;

        for file in files {
            summary.total_lines += file.total_lines;
            summary.total_code_lines += file.code_lines;
            summary.total_types += file.types.len() as u32;

            for function in &file.functions {
                summary.total_functions += 1;
                sum_cc += function.cyclomatic_complexity as f64;
                sum_cognitive += function.cognitive_complexity as f64;
                sum_length += function.length as f64;
                sum_mi += function.maintainability_index;

                if function.is_hotspot {
                    summary.hotspot_count += 1;
                }
                if function.cyclomatic_complexity > thresholds.complexity.warning {
                    summary.high_complexity_count += 1;
                }
                if function.cyclomatic_complexity > thresholds.complexity.critical {
                    summary.very_high_complexity_count += 1;
                }
                if function.length > thresholds.function_length.warning {
                    summary.long_function_count += 1;
                }
                if function.length > thresholds.function_length.critical {
                    summary.very_long_function_count += 1;
                }
            }
        }

        if summary.total_functions > 0 {
            let count = summary.total_functions as f64;
            summary.average_cyclomatic_complexity = sum_cc / count;
            summary.average_cognitive_complexity = sum_cognitive / count;
            summary.average_function_length = sum_length / count;
            summary.average_maintainability_index = sum_mi / count;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = SummaryMetrics::from_files(&[], &ThresholdConfig::default());
        assert_eq!(summary, SummaryMetrics::default());
    }

    #[test]
    fn test_summary_counts() {
        let mut long = function("long", "a.go", 25);
        long.length = 120;
        let mut medium = function("medium", "a.go", 12);
        medium.length = 60;
        medium.is_hotspot = true;
        let files = vec![
            file("a.go", 200, vec![long, medium]),
            file("b.go", 10, vec![function("tiny", "b.go", 1)]),
        ];

        let summary = SummaryMetrics::from_files(&files, &ThresholdConfig::default());
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_functions, 3);
        assert_eq!(summary.total_lines, 210);
        assert_eq!(summary.hotspot_count, 1);
        assert_eq!(summary.high_complexity_count, 2);
        assert_eq!(summary.very_high_complexity_count, 1);
        assert_eq!(summary.long_function_count, 2);
        assert_eq!(summary.very_long_function_count, 1);
        assert!((summary.average_cyclomatic_complexity - 38.0 / 3.0).abs() < 1e-9);
        assert!((summary.average_function_length - 190.0 / 3.0).abs() < 1e-9);
    }
}
