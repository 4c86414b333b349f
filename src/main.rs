//! healthscan CLI - code health metrics, scoring and concerns.

use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use healthscan::analysis::{blast_radius, Analyzer};
use healthscan::churn::ChurnIndex;
use healthscan::cli::{Cli, Command};
use healthscan::config::Config;
use healthscan::core::progress::ProgressTracker;
use healthscan::core::{AnalysisContext, Error, FileSet, Result};
use healthscan::diff;
use healthscan::model::AnalysisResult;
use healthscan::output::{ConcernList, FolderTable, Format, OwnerTable};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "healthscan=info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Init => {
            print!("{}", Config::default_toml());
            return Ok(());
        }
        Command::Diff(args) => {
            let previous = diff::load_result(&args.previous)?;
            let current = diff::load_result(&args.current)?;
            let report = diff::compare(&previous, &current);
            return Format::from(cli.format).render(&report, &mut stdout().lock());
        }
        _ => {}
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(&cli.path)?,
    };
    if let Some(jobs) = cli.jobs {
        config.analysis.max_workers = jobs;
    }

    let churn = load_churn(&cli, &config)?;
    let result = analyze(&cli.path, &config, churn.as_ref())?;

    let format = Format::from(cli.format);
    let mut out = stdout().lock();
    match &cli.command {
        Command::Analyze => format.render(&result, &mut out)?,
        Command::Score(args) => {
            format.render(&result.score_report, &mut out)?;
            out.flush()?;
            if let Some(bar) = args.fail_under.or(config.score.fail_under) {
                check_fail_under(result.score_report.overall_score, bar)?;
            }
        }
        Command::Concerns => format.render(&ConcernList(&result.score_report.concerns), &mut out)?,
        Command::Folders => format.render(&FolderTable(&result.folder_stats), &mut out)?,
        Command::Owners => format.render(&OwnerTable(&result.owners), &mut out)?,
        Command::BlastRadius(args) => {
            let concerns = blast_radius(&result, &args.functions, &config.thresholds);
            format.render(&ConcernList(&concerns), &mut out)?;
        }
        // Handled before any analysis.
        Command::Init | Command::Diff(_) => {}
    }
    Ok(())
}

/// `--churn` wins over `analysis.churn_file`; the latter is relative to the root.
fn churn_path(cli: &Cli, config: &Config) -> Option<PathBuf> {
    if let Some(path) = &cli.churn {
        return Some(path.clone());
    }
    config.analysis.churn_file.as_ref().map(|path| {
        if path.is_absolute() {
            path.clone()
        } else {
            cli.path.join(path)
        }
    })
}

fn load_churn(cli: &Cli, config: &Config) -> Result<Option<ChurnIndex>> {
    if config.analysis.skip_churn {
        return Ok(None);
    }
    let Some(path) = churn_path(cli, config) else {
        return Ok(None);
    };
    ChurnIndex::load(&path).map(Some)
}

fn analyze(path: &Path, config: &Config, churn: Option<&ChurnIndex>) -> Result<AnalysisResult> {
    let file_set = FileSet::from_path(path, config)?;
    let progress = ProgressTracker::for_terminal(file_set.len(), "Analyzing files");

    let mut ctx = AnalysisContext::new(&file_set, config).with_progress(|_, _| progress.inc());
    if let Some(churn) = churn {
        ctx = ctx.with_churn(churn);
    }
    let result = Analyzer::new().analyze(&ctx);
    progress.finish_and_clear();
    result
}

fn check_fail_under(score: f64, bar: f64) -> Result<()> {
    if score < bar {
        return Err(Error::threshold_violation(
            format!("score {score:.1} is below the required {bar:.1}"),
            score,
        ));
    }
    Ok(())
}
