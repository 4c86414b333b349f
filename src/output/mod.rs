//! Output formatters for analysis results.
//!
//! JSON is the serialized record as-is. Markdown and text are per-report
//! layouts built from the same records.

use std::collections::BTreeMap;
use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::Result;
use crate::diff::{AnalysisDiff, OwnerDelta};
use crate::model::{
    AnalysisResult, Concern, FolderMetrics, Grade, OwnerMetrics, ScoreReport, Severity,
    SummaryMetrics,
};
use crate::score::score_category;

/// Output format enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

impl Format {
    pub fn render<R: Report, W: Write>(&self, report: &R, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => format_json(report, writer),
            Format::Markdown => report.write_markdown(writer),
            Format::Text => report.write_text(writer),
        }
    }
}

/// A record that knows how to lay itself out for humans.
pub trait Report: Serialize {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()>;
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()>;
}

fn format_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Concerns as a standalone report.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConcernList<'a>(pub &'a [Concern]);

/// Folder rollups keyed by path.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FolderTable<'a>(pub &'a BTreeMap<String, FolderMetrics>);

/// Owner rollups, best health first.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct OwnerTable<'a>(pub &'a [OwnerMetrics]);

const COMPONENT_HEADERS: [&str; 4] = ["Component", "Score", "Weight", "Category"];

fn component_rows(report: &ScoreReport) -> Vec<Vec<String>> {
    report
        .component_scores
        .entries()
        .iter()
        .map(|(name, component)| {
            vec![
                format_key(name),
                format!("{:.1}", component.score),
                format!("{:.0}%", component.weight * 100.0),
                component.category.clone(),
            ]
        })
        .collect()
}

impl Report for ScoreReport {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Health Score\n")?;
        writeln!(
            writer,
            "**Score**: {:.1} ({}, {})\n",
            self.overall_score,
            self.overall_grade,
            score_category(self.overall_score)
        )?;
        if !self.has_churn_data {
            writeln!(writer, "_No churn data; churn scored as neutral._\n")?;
        }

        writeln!(writer, "## Components\n")?;
        write_markdown_table(writer, &COMPONENT_HEADERS, &component_rows(self))?;

        writeln!(writer, "## Concerns\n")?;
        ConcernList(&self.concerns).write_markdown(writer)
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} {} {}",
            "Health score:".bold(),
            format!("{:.1}", self.overall_score).bold(),
            paint_grade(self.overall_grade, &format!("({})", self.overall_grade))
        )?;
        if !self.has_churn_data {
            writeln!(writer, "{}", "no churn data, churn scored as neutral".dimmed())?;
        }
        writeln!(writer)?;

        write_text_table(writer, &COMPONENT_HEADERS, &component_rows(self))?;
        writeln!(writer)?;

        ConcernList(&self.concerns).write_text(writer)
    }
}

impl Report for ConcernList<'_> {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.0.is_empty() {
            writeln!(writer, "_No concerns_\n")?;
            return Ok(());
        }
        for concern in self.0 {
            writeln!(
                writer,
                "### [{}] {}\n",
                concern.severity.as_str().to_uppercase(),
                concern.title
            )?;
            writeln!(writer, "{}\n", concern.description)?;

            let rows: Vec<Vec<String>> = concern
                .affected_items
                .iter()
                .map(|item| {
                    vec![
                        item.file_path.clone(),
                        format!("`{}`", item.function_name),
                        item.line.to_string(),
                        join_metrics(&item.metrics.entries()),
                    ]
                })
                .collect();
            if !rows.is_empty() {
                write_markdown_table(writer, &["File", "Function", "Line", "Metrics"], &rows)?;
            }
        }
        Ok(())
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.0.is_empty() {
            writeln!(writer, "{}", "No concerns".green())?;
            return Ok(());
        }
        for concern in self.0 {
            writeln!(
                writer,
                "{} {}",
                paint_severity(concern.severity),
                concern.title.bold()
            )?;
            writeln!(writer, "  {}", concern.description)?;
            for item in &concern.affected_items {
                writeln!(
                    writer,
                    "    {}:{} {} ({})",
                    item.file_path,
                    item.line,
                    item.function_name.cyan(),
                    join_metrics(&item.metrics.entries())
                )?;
            }
        }
        Ok(())
    }
}

fn folder_rows(folders: &BTreeMap<String, FolderMetrics>) -> Vec<Vec<String>> {
    folders
        .values()
        .map(|folder| {
            vec![
                folder.path.clone(),
                folder.total_files.to_string(),
                folder.total_functions.to_string(),
                folder.total_lines.to_string(),
                format!("{:.1}", folder.average_complexity),
                format!("{:.1}", folder.average_maintainability),
                folder.total_churn.to_string(),
                folder.hotspot_count.to_string(),
                format!("{:.0}", folder.complexity_score),
            ]
        })
        .collect()
}

const FOLDER_HEADERS: [&str; 9] = [
    "Folder",
    "Files",
    "Functions",
    "Lines",
    "Avg CC",
    "Avg MI",
    "Churn",
    "Hotspots",
    "Complexity Pct",
];

impl Report for FolderTable<'_> {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Folders\n")?;
        if self.0.is_empty() {
            writeln!(writer, "_No items_\n")?;
            return Ok(());
        }
        write_markdown_table(writer, &FOLDER_HEADERS, &folder_rows(self.0))
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.0.is_empty() {
            writeln!(writer, "No folders")?;
            return Ok(());
        }
        write_text_table(writer, &FOLDER_HEADERS, &folder_rows(self.0))
    }
}

fn owner_rows(owners: &[OwnerMetrics]) -> Vec<Vec<String>> {
    owners
        .iter()
        .map(|owner| {
            vec![
                owner.owner.clone(),
                owner.file_count.to_string(),
                owner.function_count.to_string(),
                format!("{:.1}", owner.avg_cyclomatic_complexity),
                format!("{:.1}", owner.avg_maintainability_index),
                owner.hotspot_count.to_string(),
                owner.high_complexity_function_count.to_string(),
                format!("{:.1}", owner.overall_health_score),
            ]
        })
        .collect()
}

const OWNER_HEADERS: [&str; 8] = [
    "Owner",
    "Files",
    "Functions",
    "Avg CC",
    "Avg MI",
    "Hotspots",
    "High CC",
    "Health",
];

impl Report for OwnerTable<'_> {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Owners\n")?;
        if self.0.is_empty() {
            writeln!(writer, "_No owners configured_\n")?;
            return Ok(());
        }
        write_markdown_table(writer, &OWNER_HEADERS, &owner_rows(self.0))
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.0.is_empty() {
            writeln!(writer, "No owners configured")?;
            return Ok(());
        }
        write_text_table(writer, &OWNER_HEADERS, &owner_rows(self.0))
    }
}

fn summary_rows(summary: &SummaryMetrics) -> Vec<Vec<String>> {
    [
        ("Files", summary.total_files.to_string()),
        ("Functions", summary.total_functions.to_string()),
        ("Types", summary.total_types.to_string()),
        ("Lines", summary.total_lines.to_string()),
        ("Code lines", summary.total_code_lines.to_string()),
        (
            "Avg cyclomatic",
            format!("{:.2}", summary.average_cyclomatic_complexity),
        ),
        (
            "Avg cognitive",
            format!("{:.2}", summary.average_cognitive_complexity),
        ),
        (
            "Avg function length",
            format!("{:.1}", summary.average_function_length),
        ),
        (
            "Avg maintainability",
            format!("{:.1}", summary.average_maintainability_index),
        ),
        ("Hotspots", summary.hotspot_count.to_string()),
        ("High complexity", summary.high_complexity_count.to_string()),
        ("Long functions", summary.long_function_count.to_string()),
    ]
    .into_iter()
    .map(|(name, value)| vec![name.to_string(), value])
    .collect()
}

impl Report for AnalysisResult {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Code Health: {}\n", self.repository)?;
        writeln!(
            writer,
            "_Analyzed at {}_\n",
            self.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(writer, "## Summary\n")?;
        write_markdown_table(writer, &["Metric", "Value"], &summary_rows(&self.summary))?;
        self.score_report.write_markdown(writer)
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{} {}", "Code health:".bold(), self.repository)?;
        writeln!(writer)?;
        write_text_table(writer, &["Metric", "Value"], &summary_rows(&self.summary))?;
        writeln!(writer)?;
        self.score_report.write_text(writer)
    }
}

fn signed(delta: f64, precision: usize) -> String {
    format!("{delta:+.precision$}")
}

fn signed_count(delta: i64) -> String {
    format!("{delta:+}")
}

/// Lower is better for complexity, churn and hotspots.
fn trend(delta: f64, higher_is_better: bool) -> &'static str {
    let better = if higher_is_better { delta > 0.0 } else { delta < 0.0 };
    if delta == 0.0 {
        "unchanged"
    } else if better {
        "improved"
    } else {
        "worsened"
    }
}

const DIFF_HEADERS: [&str; 3] = ["Metric", "Change", "Trend"];

fn diff_rows(diff: &AnalysisDiff) -> Vec<Vec<String>> {
    let m = &diff.metrics;
    [
        ("Health score", signed(m.score, 1), trend(m.score, true)),
        (
            "Avg cyclomatic",
            signed(m.average_complexity, 2),
            trend(m.average_complexity, false),
        ),
        (
            "Avg maintainability",
            signed(m.average_maintainability, 1),
            trend(m.average_maintainability, true),
        ),
        ("Churn", signed_count(m.churn), trend(m.churn as f64, false)),
        (
            "Hotspots",
            signed_count(m.hotspot_count),
            trend(m.hotspot_count as f64, false),
        ),
        ("Functions", signed_count(m.function_count), ""),
        ("Files", signed_count(m.file_count), ""),
    ]
    .into_iter()
    .map(|(name, change, trend)| vec![name.to_string(), change, trend.to_string()])
    .collect()
}

const OWNER_DIFF_HEADERS: [&str; 7] = [
    "Owner", "Status", "Files", "Functions", "Avg CC", "Hotspots", "Health",
];

fn owner_diff_rows(owners: &[OwnerDelta]) -> Vec<Vec<String>> {
    let optional = |value: Option<f64>, precision| value.map_or("-".to_string(), |v| signed(v, precision));
    owners
        .iter()
        .map(|owner| {
            let health = match (owner.previous_health_score, owner.current_health_score) {
                (Some(before), Some(after)) => {
                    format!("{before:.1} -> {after:.1} ({})", signed(after - before, 1))
                }
                (None, Some(after)) => format!("{after:.1}"),
                (Some(before), None) => format!("{before:.1}"),
                (None, None) => "-".to_string(),
            };
            vec![
                owner.owner.clone(),
                owner.status.as_str().to_string(),
                signed_count(owner.file_count),
                signed_count(owner.function_count),
                optional(owner.avg_cyclomatic_complexity, 2),
                signed_count(owner.hotspot_count),
                health,
            ]
        })
        .collect()
}

/// Persistent hotspots are listed up to this many.
const PERSISTENT_HOTSPOT_LIMIT: usize = 10;

fn hotspot_sections(diff: &AnalysisDiff) -> [(&'static str, &[String], usize); 3] {
    [
        ("New hotspots", diff.hotspots.new.as_slice(), usize::MAX),
        ("Fixed hotspots", diff.hotspots.fixed.as_slice(), usize::MAX),
        (
            "Persistent hotspots",
            diff.hotspots.persistent.as_slice(),
            PERSISTENT_HOTSPOT_LIMIT,
        ),
    ]
}

impl Report for AnalysisDiff {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Health Diff
")?;
        writeln!(
            writer,
            "_{} -> {}_
",
            self.previous_analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.current_analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            writer,
            "**Score**: {:.1} -> {:.1} ({})
",
            self.previous_score,
            self.current_score,
            signed(self.metrics.score, 1)
        )?;
        write_markdown_table(writer, &DIFF_HEADERS, &diff_rows(self))?;

        if !self.owners.is_empty() {
            writeln!(writer, "## Owners
")?;
            write_markdown_table(writer, &OWNER_DIFF_HEADERS, &owner_diff_rows(&self.owners))?;
        }

        for (title, keys, limit) in hotspot_sections(self) {
            if keys.is_empty() {
                continue;
            }
            writeln!(writer, "## {title} ({})
", keys.len())?;
            for key in keys.iter().take(limit) {
                writeln!(writer, "- `{key}`")?;
            }
            if keys.len() > limit {
                writeln!(writer, "- ... and {} more", keys.len() - limit)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} {:.1} -> {:.1} ({})",
            "Health score:".bold(),
            self.previous_score,
            self.current_score,
            signed(self.metrics.score, 1)
        )?;
        writeln!(writer)?;
        write_text_table(writer, &DIFF_HEADERS, &diff_rows(self))?;

        if !self.owners.is_empty() {
            writeln!(writer)?;
            write_text_table(writer, &OWNER_DIFF_HEADERS, &owner_diff_rows(&self.owners))?;
        }

        for (title, keys, limit) in hotspot_sections(self) {
            if keys.is_empty() {
                continue;
            }
            writeln!(writer)?;
            writeln!(writer, "{}", format!("{title} ({}):", keys.len()).bold())?;
            for key in keys.iter().take(limit) {
                writeln!(writer, "    {key}")?;
            }
            if keys.len() > limit {
                writeln!(writer, "    ... and {} more", keys.len() - limit)?;
            }
        }
        Ok(())
    }
}

fn write_markdown_table<W: Write>(
    writer: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    writeln!(writer, "| {} |", headers.join(" | "))?;
    writeln!(writer, "|{}", " --- |".repeat(headers.len()))?;
    for row in rows {
        writeln!(writer, "| {} |", row.join(" | "))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_text_table<W: Write>(writer: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:<width$}"))
        .collect();
    writeln!(writer, "{}", header_line.join("  ").trim_end().bold())?;

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        writeln!(writer, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

/// `function_size` -> `Function Size`.
fn format_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_metrics(entries: &[(&str, String)]) -> String {
    entries
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn paint_grade(grade: Grade, text: &str) -> ColoredString {
    match grade {
        Grade::A | Grade::B => text.green().bold(),
        Grade::C => text.yellow().bold(),
        Grade::D | Grade::F => text.red().bold(),
    }
}

fn paint_severity(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::Warning => label.yellow(),
        Severity::Info => label.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::{file, function};
    use crate::config::ThresholdConfig;
    use crate::model::{AffectedItem, ConcernType, ItemMetrics};
    use crate::score::{empty_codebase_report, generate_report};

    fn render<R: Report>(format: Format, report: &R) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        format.render(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn nesting_concern() -> Concern {
        Concern {
            kind: ConcernType::DeepNesting,
            severity: Severity::Warning,
            title: "Very Deep Nesting".into(),
            description: "1 function nests deeper than 7 levels.".into(),
            affected_items: vec![AffectedItem {
                file_path: "src/engine.go".into(),
                function_name: "Run".into(),
                line: 12,
                metrics: ItemMetrics::Nesting { nesting_depth: 9 },
            }],
        }
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key("function_size"), "Function Size");
        assert_eq!(format_key("churn"), "Churn");
    }

    #[test]
    fn test_json_concerns_is_plain_array() {
        let concerns = vec![nesting_concern()];
        let out = render(Format::Json, &ConcernList(&concerns));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        insta::assert_json_snapshot!(value, @r#"
        [
          {
            "affected_items": [
              {
                "file_path": "src/engine.go",
                "function_name": "Run",
                "line": 12,
                "metrics": {
                  "nesting_depth": 9
                }
              }
            ],
            "description": "1 function nests deeper than 7 levels.",
            "severity": "warning",
            "title": "Very Deep Nesting",
            "type": "deep_nesting"
          }
        ]
        "#);
    }

    #[test]
    fn test_markdown_concerns() {
        let concerns = vec![nesting_concern()];
        let out = render(Format::Markdown, &ConcernList(&concerns));
        assert!(out.contains("### [WARNING] Very Deep Nesting"));
        assert!(out.contains("| File | Function | Line | Metrics |"));
        assert!(out.contains("| src/engine.go | `Run` | 12 | nesting_depth=9 |"));
    }

    #[test]
    fn test_text_concerns() {
        let concerns = vec![nesting_concern()];
        let out = render(Format::Text, &ConcernList(&concerns));
        assert!(out.starts_with("[WARNING] Very Deep Nesting"));
        assert!(out.contains("    src/engine.go:12 Run (nesting_depth=9)"));
    }

    #[test]
    fn test_empty_concerns() {
        assert_eq!(render(Format::Markdown, &ConcernList(&[])), "_No concerns_\n\n");
        assert_eq!(render(Format::Text, &ConcernList(&[])), "No concerns\n");
    }

    #[test]
    fn test_score_markdown_lists_components() {
        let out = render(Format::Markdown, &empty_codebase_report());
        assert!(out.contains("# Health Score"));
        assert!(out.contains("**Score**: 100.0 (A, excellent)"));
        assert!(out.contains("| Function Size | 100.0 | 15% | excellent |"));
        assert!(out.contains("_No churn data; churn scored as neutral._"));
        assert!(out.contains("### [INFO] No Functions Found"));
    }

    #[test]
    fn test_score_text() {
        let thresholds = ThresholdConfig::default();
        let files = vec![file("a.go", 10, vec![function("f", "a.go", 2)])];
        let summary = SummaryMetrics::from_files(&files, &thresholds);
        let report = generate_report(&files, &summary, false, &thresholds);

        let out = render(Format::Text, &report);
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("Health score: "));
        assert!(first.ends_with(&format!("({})", report.overall_grade)));
        assert!(out.contains("Component"));
        assert!(out.contains("Code Structure"));
    }

    #[test]
    fn test_text_table_aligns_columns() {
        let mut out = Vec::new();
        colored::control::set_override(false);
        write_text_table(
            &mut out,
            &["Owner", "Files"],
            &[
                vec!["@core".into(), "12".into()],
                vec!["@platform-team".into(), "3".into()],
            ],
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Owner           Files\n@core           12\n@platform-team  3\n"
        );
    }

    #[test]
    fn test_folders_markdown() {
        let files = vec![
            file("api/a.go", 10, vec![function("f", "api/a.go", 4)]),
            file("main.go", 5, vec![function("main", "main.go", 1)]),
        ];
        let folders = crate::aggregate::folder_stats(&files);
        let out = render(Format::Markdown, &FolderTable(&folders));
        assert!(out.contains("| Folder | Files | Functions |"));
        assert!(out.contains("| . | 1 | 1 | 5 |"));
        assert!(out.contains("| api | 1 | 1 | 10 |"));
    }

    fn sample_diff(persistent: usize) -> AnalysisDiff {
        use crate::diff::{HotspotChanges, MetricDeltas, OwnerStatus};
        let at = chrono::DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        AnalysisDiff {
            previous_analyzed_at: at,
            current_analyzed_at: at,
            previous_score: 70.0,
            current_score: 72.5,
            metrics: MetricDeltas {
                score: 2.5,
                average_complexity: -0.25,
                average_maintainability: 0.0,
                churn: 40,
                hotspot_count: 1,
                function_count: 3,
                file_count: 0,
            },
            owners: vec![OwnerDelta {
                owner: "@api-team".into(),
                status: OwnerStatus::Changed,
                file_count: 0,
                function_count: 2,
                hotspot_count: -1,
                avg_cyclomatic_complexity: Some(0.5),
                avg_maintainability_index: Some(-1.0),
                previous_health_score: Some(80.0),
                current_health_score: Some(78.0),
                health_score: Some(-2.0),
            }],
            hotspots: HotspotChanges {
                new: vec!["api/a.go:Handle".into()],
                fixed: Vec::new(),
                persistent: (0..persistent).map(|i| format!("a.go:f{i:02}")).collect(),
            },
        }
    }

    #[test]
    fn test_diff_markdown() {
        let out = render(Format::Markdown, &sample_diff(12));
        assert!(out.contains("# Health Diff"));
        assert!(out.contains("**Score**: 70.0 -> 72.5 (+2.5)"));
        assert!(out.contains("| Health score | +2.5 | improved |"));
        assert!(out.contains("| Avg cyclomatic | -0.25 | improved |"));
        assert!(out.contains("| Avg maintainability | +0.0 | unchanged |"));
        assert!(out.contains("| Churn | +40 | worsened |"));
        assert!(out.contains("| @api-team | changed | +0 | +2 | +0.50 | -1 | 80.0 -> 78.0 (-2.0) |"));
        assert!(out.contains("## New hotspots (1)"));
        assert!(!out.contains("Fixed hotspots"));
        assert!(out.contains("## Persistent hotspots (12)"));
        assert!(out.contains("- `a.go:f09`"));
        assert!(!out.contains("a.go:f10"));
        assert!(out.contains("- ... and 2 more"));
    }

    #[test]
    fn test_diff_text() {
        let out = render(Format::Text, &sample_diff(0));
        assert!(out.starts_with("Health score: 70.0 -> 72.5 (+2.5)"));
        assert!(out.contains("New hotspots (1):\n    api/a.go:Handle"));
        assert!(!out.contains("Persistent"));
    }

    #[test]
    fn test_diff_json_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&render(Format::Json, &sample_diff(0))).unwrap();
        assert_eq!(value["metrics"]["churn"], 40);
        assert_eq!(value["owners"][0]["status"], "changed");
        assert_eq!(value["hotspots"]["new"][0], "api/a.go:Handle");
    }

    #[test]
    fn test_owners_empty() {
        assert!(render(Format::Markdown, &OwnerTable(&[])).contains("_No owners configured_"));
        assert_eq!(render(Format::Json, &OwnerTable(&[])).trim(), "[]");
    }
}
