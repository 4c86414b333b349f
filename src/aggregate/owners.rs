//! Per-owner rollup driven by glob ownership rules.

use std::collections::{BTreeMap, BTreeSet};

use globset::{Glob, GlobMatcher};

use crate::config::{OwnerRule, ThresholdConfig};
use crate::core::{Error, Result};
use crate::model::{FileMetrics, FunctionMetrics, OwnerMetrics};

/// Compiled ownership rules. Later rules override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct OwnershipMap {
    rules: Vec<(GlobMatcher, Vec<String>)>,
}

impl OwnershipMap {
    pub fn new(rules: &[OwnerRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let matcher = Glob::new(&rule.pattern)
                    .map_err(|e| {
                        Error::config(format!("invalid owner pattern {:?}: {e}", rule.pattern))
                    })?
                    .compile_matcher();
                Ok((matcher, rule.owners.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Owners of a path, from the last matching rule.
    pub fn owners_of(&self, path: &str) -> &[String] {
        self.rules
            .iter()
            .rev()
            .find(|(matcher, _)| matcher.is_match(path))
            .map(|(_, owners)| owners.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Default)]
struct OwnerAccumulator<'a> {
    files: BTreeSet<&'a str>,
    functions: Vec<&'a FunctionMetrics>,
    code_lines: u32,
}

/// Roll metrics up per owner. A file with several owners counts for each.
///
/// Sorted by health score descending, then owner name.
pub fn aggregate_by_owner(
    files: &[FileMetrics],
    ownership: &OwnershipMap,
    thresholds: &ThresholdConfig,
) -> Vec<OwnerMetrics> {
    let mut accumulators: BTreeMap<&str, OwnerAccumulator<'_>> = BTreeMap::new();

    for file in files {
        for owner in ownership.owners_of(&file.path) {
            let acc = accumulators.entry(owner.as_str()).or_default();
            if acc.files.insert(file.path.as_str()) {
                acc.code_lines += file.code_lines;
                acc.functions.extend(file.functions.iter());
            }
        }
    }

    let mut owners: Vec<OwnerMetrics> = accumulators
        .into_iter()
        .map(|(owner, acc)| owner_metrics(owner, &acc, thresholds))
        .collect();

    owners.sort_by(|a, b| {
        b.overall_health_score
            .total_cmp(&a.overall_health_score)
            .then_with(|| a.owner.cmp(&b.owner))
    });
    owners
}

fn owner_metrics(owner: &str, acc: &OwnerAccumulator<'_>, thresholds: &ThresholdConfig) -> OwnerMetrics {
    let mut metrics = OwnerMetrics {
        owner: owner.to_string(),
        file_count: acc.files.len() as u32,
        function_count: acc.functions.len() as u32,
        total_lines: acc.code_lines,
        avg_cyclomatic_complexity: 0.0,
        avg_cognitive_complexity: 0.0,
        avg_maintainability_index: 0.0,
        hotspot_count: 0,
        high_complexity_function_count: 0,
        overall_health_score: 100.0,
    };

    if !acc.functions.is_empty() {
        let count = acc.functions.len() as f64;
        let mut sum_cc = 0.0;
        let mut sum_cognitive = 0.0;
        let mut sum_mi = 0.0;
        for function in &acc.functions {
            sum_cc += function.cyclomatic_complexity as f64;
            sum_cognitive += function.cognitive_complexity as f64;
            sum_mi += function.maintainability_index;
            if function.is_hotspot {
                metrics.hotspot_count += 1;
            }
            if function.cyclomatic_complexity > thresholds.complexity.warning {
                metrics.high_complexity_function_count += 1;
            }
        }
        metrics.avg_cyclomatic_complexity = sum_cc / count;
        metrics.avg_cognitive_complexity = sum_cognitive / count;
        metrics.avg_maintainability_index = sum_mi / count;
    }

    metrics.overall_health_score = owner_health_score(&metrics);
    metrics
}

/// Health in `[0, 100]` from four capped penalties.
pub fn owner_health_score(metrics: &OwnerMetrics) -> f64 {
    if metrics.function_count == 0 {
        return 100.0;
    }

    let complexity_penalty = (metrics.avg_cyclomatic_complexity / 10.0 * 20.0).min(20.0);
    let maintainability_penalty =
        ((100.0 - metrics.avg_maintainability_index) / 100.0 * 20.0).min(20.0);
    let hotspot_penalty = (metrics.hotspot_count as f64 * 2.0).min(20.0);
    let high_complexity_penalty = (metrics.high_complexity_function_count as f64 * 1.5).min(15.0);

    (100.0
        - complexity_penalty
        - maintainability_penalty
        - hotspot_penalty
        - high_complexity_penalty)
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn rule(pattern: &str, owners: &[&str]) -> OwnerRule {
        OwnerRule {
            pattern: pattern.to_string(),
            owners: owners.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn test_last_matching_rule_wins() {
        let map = OwnershipMap::new(&[rule("**", &["@core"]), rule("api/**", &["@api"])])
        .unwrap();
        assert_eq!(map.owners_of("api/handler.go"), ["@api".to_string()]);
        assert_eq!(map.owners_of("lib/util.go"), ["@core".to_string()]);
    }

    #[test]
    fn test_unowned_path() {
        let map = OwnershipMap::new(&[rule("api/**", &["@api"])]).unwrap();
        assert!(map.owners_of("lib/util.go").is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = OwnershipMap::new(&[rule("a/[", &["@x"])]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_health_score_penalties() {
        let metrics = OwnerMetrics {
            owner: "@x".into(),
            file_count: 1,
            function_count: 4,
            total_lines: 100,
            avg_cyclomatic_complexity: 5.0,
            avg_cognitive_complexity: 3.0,
            avg_maintainability_index: 70.0,
            hotspot_count: 2,
            high_complexity_function_count: 2,
            overall_health_score: 0.0,
        };
        // 100 - 10 - 6 - 4 - 3
        assert!((owner_health_score(&metrics) - 77.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_score_penalties_are_capped() {
        let metrics = OwnerMetrics {
            owner: "@x".into(),
            file_count: 1,
            function_count: 40,
            total_lines: 100,
            avg_cyclomatic_complexity: 50.0,
            avg_cognitive_complexity: 30.0,
            avg_maintainability_index: -50.0,
            hotspot_count: 40,
            high_complexity_function_count: 40,
            overall_health_score: 0.0,
        };
        // Penalties cap at 20 + 20 + 20 + 15.
        assert!((owner_health_score(&metrics) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_by_owner_sorted_by_health() {
        let map = OwnershipMap::new(&[
            rule("good/**", &["@good", "@shared"]),
            rule("bad/**", &["@bad", "@shared"]),
        ])
        .unwrap();
        let mut tidy = function("f", "good/a.go", 1);
        tidy.maintainability_index = 100.0;
        let files = vec![
            file("good/a.go", 10, vec![tidy]),
            file("bad/a.go", 10, vec![function("g", "bad/a.go", 30)]),
            file("none.go", 10, vec![function("h", "none.go", 1)]),
        ];

        let owners = aggregate_by_owner(&files, &map, &ThresholdConfig::default());
        let names: Vec<&str> = owners.iter().map(|o| o.owner.as_str()).collect();
        assert_eq!(names, vec!["@good", "@shared", "@bad"]);

        let shared = &owners[1];
        assert_eq!(shared.file_count, 2);
        assert_eq!(shared.function_count, 2);
        assert_eq!(shared.high_complexity_function_count, 1);
    }

    #[test]
    fn test_owner_without_functions_is_healthy() {
        let map = OwnershipMap::new(&[rule("**", &["@docs"])]).unwrap();
        let files = vec![file("empty.go", 3, vec![])];
        let owners = aggregate_by_owner(&files, &map, &ThresholdConfig::default());
        assert_eq!(owners[0].overall_health_score, 100.0);
    }
}
