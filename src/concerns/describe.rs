//! Human-readable explanations attached to each concern.

use std::fmt::Write as _;

use crate::model::{AffectedItem, ItemMetrics};

use super::Tier;

fn average<F>(items: &[AffectedItem], pick: F) -> f64
where
    F: Fn(&ItemMetrics) -> Option<f64>,
{
    let values: Vec<f64> = items.iter().filter_map(|i| pick(&i.metrics)).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(super) fn hotspot(items: &[AffectedItem]) -> String {
    if items.is_empty() {
        return "High complexity functions that change frequently are risky to modify.".into();
    }
    let complexity = average(items, |m| match m {
        ItemMetrics::Hotspot { complexity, .. } => Some(*complexity as f64),
        _ => None,
    });
    let churn = average(items, |m| match m {
        ItemMetrics::Hotspot { churn, .. } => Some(*churn as f64),
        _ => None,
    });
    format!(
        "These functions average CC:{complexity:.0} with {churn:.0} commits each. High complexity makes changes error-prone, and frequent changes multiply that risk. Consider refactoring to reduce complexity before the next change."
    )
}

pub(super) fn churn_length(items: &[AffectedItem], tier: Tier) -> String {
    if items.is_empty() {
        return "Long functions that change frequently are hard to maintain.".into();
    }
    let length = average(items, |m| match m {
        ItemMetrics::ChurnLength { length, .. } => Some(*length as f64),
        _ => None,
    });
    let churn = average(items, |m| match m {
        ItemMetrics::ChurnLength { churn, .. } => Some(*churn as f64),
        _ => None,
    });
    match tier {
        Tier::Upper => format!(
            "Averaging {length:.0} lines and {churn:.0} commits. Large functions are hard to understand and test. Each change risks unintended side effects. Split into smaller, single-purpose functions."
        ),
        Tier::Lower => format!(
            "These functions average {length:.0} lines with {churn:.0} changes. Consider extracting logical sections into separate functions to improve readability and reduce change risk."
        ),
    }
}

/// Explains a low maintainability index by its dominant contributors.
pub(super) fn maintainability(items: &[AffectedItem], threshold: f64) -> String {
    if items.is_empty() {
        return format!("Functions with maintainability index below {threshold:.0}");
    }

    let mut total_length = 0.0;
    let mut total_complexity = 0.0;
    let mut long_count = 0usize;
    let mut complex_count = 0usize;
    let mut dense_count = 0usize;

    for item in items {
        if let ItemMetrics::Maintainability {
            cyclomatic_complexity,
            length,
            halstead_volume,
            ..
        } = item.metrics
        {
            total_length += length as f64;
            total_complexity += cyclomatic_complexity as f64;
            if length > 50 {
                long_count += 1;
            }
            if cyclomatic_complexity > 10 {
                complex_count += 1;
            }
            if halstead_volume > 1000.0 {
                dense_count += 1;
            }
        }
    }

    let count = items.len();
    let avg_length = total_length / count as f64;
    let avg_complexity = total_complexity / count as f64;

    let mut factors = Vec::new();
    if long_count > count / 2 || avg_length > 40.0 {
        factors.push(format!("long functions (avg {avg_length:.0} lines)"));
    }
    if complex_count > count / 2 || avg_complexity > 8.0 {
        factors.push(format!("high complexity (avg CC: {avg_complexity:.1})"));
    }
    if dense_count > count / 2 {
        factors.push("dense code with many operators/operands".to_string());
    }

    if factors.is_empty() {
        return format!(
            "MI below {threshold:.0} indicates code that is harder to understand and modify. Consider simplifying logic or breaking into smaller functions."
        );
    }

    format!(
        "Low scores driven by {}. Break into smaller, focused functions to improve readability.",
        join_factors(&factors)
    )
}

/// "a", "a and b", "a, b and c".
fn join_factors(factors: &[String]) -> String {
    match factors {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

pub(super) fn nesting(items: &[AffectedItem], tier: Tier) -> String {
    if items.is_empty() {
        return "Deeply nested code is hard to follow and test.".into();
    }
    let depth = average(items, |m| match m {
        ItemMetrics::Nesting { nesting_depth } => Some(*nesting_depth as f64),
        _ => None,
    });
    match tier {
        Tier::Upper => format!(
            "These functions have {depth:.0}+ levels of nesting. Deep nesting forces readers to track multiple conditions mentally. Use guard clauses (early returns), extract nested blocks into helper functions, or consider the strategy pattern."
        ),
        Tier::Lower => format!(
            "Averaging {depth:.0} nesting levels. Use early returns to handle edge cases first, reducing the main logic's nesting depth."
        ),
    }
}

pub(super) fn parameters(items: &[AffectedItem], tier: Tier) -> String {
    if items.is_empty() {
        return "Functions with many parameters are harder to call correctly.".into();
    }
    let params = average(items, |m| match m {
        ItemMetrics::Parameters { parameter_count } => Some(*parameter_count as f64),
        _ => None,
    });
    match tier {
        Tier::Upper => format!(
            "These functions average {params:.0} parameters. Many parameters increase cognitive load, make testing harder, and often indicate the function is doing too much. Group related parameters into structs or split the function."
        ),
        Tier::Lower => format!(
            "Averaging {params:.0} parameters per function. Consider grouping related parameters into a config struct or options pattern to improve readability."
        ),
    }
}

pub(super) fn god_function(items: &[AffectedItem]) -> String {
    if items.is_empty() {
        return "Functions with many parameters and high fan-in may be doing too much.".into();
    }
    let params = average(items, |m| match m {
        ItemMetrics::GodFunction {
            parameter_count, ..
        } => Some(*parameter_count as f64),
        _ => None,
    });
    let fan_in = average(items, |m| match m {
        ItemMetrics::GodFunction { fan_in, .. } => Some(*fan_in as f64),
        _ => None,
    });
    format!(
        "These functions average {params:.0} parameters and are called from {fan_in:.0} places. High fan-in with many parameters suggests these are 'god functions' trying to do everything. Break them into focused, single-responsibility functions."
    )
}

/// Lists each shown function with its caller count.
pub(super) fn blast_radius(items: &[AffectedItem], tier: Tier, approximate: bool) -> String {
    let mut out = String::new();
    match tier {
        Tier::Upper => out.push_str(
            "Changed functions are called by many other functions (high fan-in). Changes here may propagate widely across the codebase.\n\n",
        ),
        Tier::Lower => out.push_str(
            "Changed functions have moderate fan-in. Changes may affect multiple call sites.\n\n",
        ),
    }

    out.push_str("Affected functions:\n");
    for (i, item) in items.iter().enumerate() {
        let fan_in = match item.metrics {
            ItemMetrics::BlastRadius { fan_in, .. } => fan_in,
            _ => 0,
        };
        let _ = writeln!(
            out,
            "{}. {} (line {}) - called by {} function(s)",
            i + 1,
            item.function_name,
            item.line,
            fan_in
        );
    }

    if approximate {
        out.push_str("\nNote: fan-in is approximate (callers are matched by name).");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, metrics: ItemMetrics) -> AffectedItem {
        AffectedItem {
            file_path: "a.go".into(),
            function_name: name.into(),
            line: 3,
            metrics,
        }
    }

    #[test]
    fn test_join_factors() {
        fn f(v: &[&str]) -> String {
            join_factors(&v.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        }
        assert_eq!(f(&["a"]), "a");
        assert_eq!(f(&["a", "b"]), "a and b");
        assert_eq!(f(&["a", "b", "c"]), "a, b and c");
    }

    #[test]
    fn test_hotspot_description_averages() {
        let items = vec![
            item("a", ItemMetrics::Hotspot { complexity: 12, churn: 20 }),
            item("b", ItemMetrics::Hotspot { complexity: 18, churn: 30 }),
        ];
        let text = hotspot(&items);
        assert!(text.starts_with("These functions average CC:15 with 25 commits each."));
    }

    #[test]
    fn test_maintainability_names_factors() {
        let items = vec![item(
            "a",
            ItemMetrics::Maintainability {
                maintainability_index: 12.0,
                cyclomatic_complexity: 25,
                length: 180,
                halstead_volume: 5000.0,
            },
        )];
        let text = maintainability(&items, 20.0);
        assert_eq!(
            text,
            "Low scores driven by long functions (avg 180 lines), high complexity (avg CC: 25.0) and dense code with many operators/operands. Break into smaller, focused functions to improve readability."
        );
    }

    #[test]
    fn test_maintainability_without_dominant_factor() {
        let items = vec![item(
            "a",
            ItemMetrics::Maintainability {
                maintainability_index: 35.0,
                cyclomatic_complexity: 3,
                length: 20,
                halstead_volume: 100.0,
            },
        )];
        assert!(maintainability(&items, 40.0).starts_with("MI below 40 indicates"));
    }

    #[test]
    fn test_nesting_text_follows_tier() {
        let items = vec![item("a", ItemMetrics::Nesting { nesting_depth: 9 })];
        assert!(nesting(&items, Tier::Upper).starts_with("These functions have 9+ levels"));
        assert!(nesting(&items, Tier::Lower).starts_with("Averaging 9 nesting levels"));
    }

    #[test]
    fn test_blast_radius_lists_items() {
        let items = vec![
            item("Parse", ItemMetrics::BlastRadius { fan_in: 20, approximate: true }),
            item("Load", ItemMetrics::BlastRadius { fan_in: 16, approximate: true }),
        ];
        let text = blast_radius(&items, Tier::Upper, true);
        assert!(text.contains("1. Parse (line 3) - called by 20 function(s)\n"));
        assert!(text.contains("2. Load (line 3) - called by 16 function(s)\n"));
        assert!(text.ends_with("(callers are matched by name)."));
    }
}
