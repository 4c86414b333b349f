//! End-to-end analysis: parse files in parallel, then run the engine.
//!
//! Files are parsed on a rayon pool. Everything after that needs the whole
//! codebase (fan-in, hotspot percentiles, rollups, scoring) and runs once
//! all files are in.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregate::{self, aggregate_by_owner, OwnershipMap};
use crate::callgraph::{assign_fan_in, CallGraph};
use crate::churn::ChurnIndex;
use crate::concerns::detect_blast_radius;
use crate::config::ThresholdConfig;
use crate::core::{AnalysisContext, Error, Result, SourceFile};
use crate::metrics::{build_function_metrics, ComplexityCalculator, FunctionFacts};
use crate::model::{AnalysisResult, Concern, FileMetrics, FunctionMetrics, SummaryMetrics};
use crate::parser::{extract_functions, extract_types, walk_body, Parser};
use crate::score::generate_report;

/// One parsed file, with the callee names of each function in order.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub metrics: FileMetrics,
    pub callees: Vec<BTreeSet<String>>,
}

/// Runs the whole pipeline over an [`AnalysisContext`].
#[derive(Debug, Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<AnalysisResult> {
        let start = Instant::now();
        let config = ctx.config;
        let thresholds = &config.thresholds;
        let has_churn_data = ctx.has_churn_data();
        let churn = ctx.active_churn();

        let parsed = self.parse_files(ctx, churn)?;
        let parse_elapsed = start.elapsed();

        let (mut files, callees): (Vec<FileMetrics>, Vec<Vec<BTreeSet<String>>>) = parsed
            .into_iter()
            .map(|p| (p.metrics, p.callees))
            .unzip();

        let mut graph = CallGraph::new();
        for (file, file_callees) in files.iter().zip(&callees) {
            for (function, names) in file.functions.iter().zip(file_callees) {
                graph.add_function(&file.path, &function.name, names);
            }
        }
        assign_fan_in(&mut files, &graph);
        aggregate::mark_hotspots(&mut files);

        let folder_stats = aggregate::folder_stats(&files);
        let summary = SummaryMetrics::from_files(&files, thresholds);
        let ownership = OwnershipMap::new(&config.owners)?;
        let owners = aggregate_by_owner(&files, &ownership, thresholds);
        let score_report = generate_report(&files, &summary, has_churn_data, thresholds);

        info!(
            "Analysis completed in {:?} (parse {:?}): {} files, {} functions, score {:.1}",
            start.elapsed(),
            parse_elapsed,
            summary.total_files,
            summary.total_functions,
            score_report.overall_score
        );

        Ok(AnalysisResult {
            repository: ctx.root.display().to_string(),
            analyzed_at: Utc::now(),
            files,
            folder_stats,
            summary,
            owners,
            score_report,
        })
    }

    /// Parse every file, skipping the ones that fail.
    fn parse_files(
        &self,
        ctx: &AnalysisContext<'_>,
        churn: Option<&ChurnIndex>,
    ) -> Result<Vec<ParsedFile>> {
        let total_files = ctx.files.len();
        let counter = AtomicUsize::new(0);

        let parse = || -> Vec<ParsedFile> {
            ctx.files
                .files()
                .par_iter()
                .map_init(Parser::new, |parser, path| {
                    let shown_path = ctx.files.display_path(path);
                    let result = SourceFile::load(path)
                        .and_then(|source| analyze_source(parser, &source, &shown_path, churn));

                    let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    ctx.report_progress(current, total_files);

                    match result {
                        Ok(parsed) => Some(parsed),
                        Err(e) => {
                            warn!("Skipping {}: {}", shown_path, e);
                            None
                        }
                    }
                })
                .flatten()
                .collect()
        };

        let workers = ctx.config.analysis.max_workers;
        if workers == 0 {
            return Ok(parse());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::analysis(format!("failed to start worker pool: {e}")))?;
        Ok(pool.install(parse))
    }
}

/// Parse one file and compute metrics for each of its functions.
///
/// `fan_in` and `is_hotspot` are left unset; they depend on other files.
pub fn analyze_source(
    parser: &Parser,
    source: &SourceFile,
    display_path: &str,
    churn: Option<&ChurnIndex>,
) -> Result<ParsedFile> {
    let result = parser.parse_source(source)?;
    if result.has_errors() {
        debug!("{} has syntax errors, analyzing the recovered tree", display_path);
    }

    let mut functions = Vec::new();
    let mut callees = Vec::new();
    for node in extract_functions(&result) {
        let mut calculator = ComplexityCalculator::new();
        let body = walk_body(node.body, result.language, &result.source, &mut calculator);

        let function_churn = churn.and_then(|index| index.function(display_path, &node.name));
        let facts = FunctionFacts {
            name: node.name,
            file_path: display_path.to_string(),
            start_line: node.start_line,
            end_line: node.end_line,
            logical_lines: body.logical_lines,
            parameter_count: node.parameter_count,
            return_count: body.return_count,
            fan_in: 0,
            fan_out: body.callees.len() as u32,
            churn: function_churn,
        };
        functions.push(build_function_metrics(facts, calculator.finish()));
        callees.push(body.callees);
    }

    let lines = source.line_counts();
    debug!("{}: {} functions", display_path, functions.len());

    Ok(ParsedFile {
        metrics: FileMetrics {
            path: display_path.to_string(),
            language: source.language,
            total_lines: lines.total,
            code_lines: lines.code,
            comment_lines: lines.comment,
            blank_lines: lines.blank,
            functions,
            types: extract_types(&result),
            churn: churn.and_then(|index| index.file(display_path)),
        },
        callees,
    })
}

/// Functions named in `names`, or every function when `names` is empty.
pub fn select_functions<'a>(result: &'a AnalysisResult, names: &[String]) -> Vec<&'a FunctionMetrics> {
    result
        .functions()
        .filter(|f| names.is_empty() || names.iter().any(|n| n == &f.name))
        .collect()
}

/// Blast-radius concerns for the named functions. Fan-in is name-based and
/// therefore always reported as approximate.
pub fn blast_radius(
    result: &AnalysisResult,
    names: &[String],
    thresholds: &ThresholdConfig,
) -> Vec<Concern> {
    let selected = select_functions(result, names);
    detect_blast_radius(&selected, &thresholds.blast_radius, CallGraph::APPROXIMATE)
}
