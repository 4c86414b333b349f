//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::output::Format;

/// healthscan - Code health metrics, scores and concerns for a source tree.
#[derive(Parser)]
#[command(name = "healthscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the source tree to analyze
    #[arg(short, long, default_value = ".", global = true)]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown", global = true)]
    pub format: OutputFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short = 'j', long, global = true)]
    pub jobs: Option<usize>,

    /// Churn data file (JSON) exported from version control
    #[arg(long, env = "HEALTHSCAN_CHURN_FILE", global = true)]
    pub churn: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Full analysis: per-file metrics, rollups, score and concerns
    Analyze,

    /// Overall health score and grade
    Score(ScoreArgs),

    /// Actionable concerns, most severe first
    #[command(alias = "smells")]
    Concerns,

    /// Per-folder rollups with percentile scores
    Folders,

    /// Per-owner rollups from configured ownership rules
    Owners,

    /// How widely functions are called (name-based fan-in)
    #[command(alias = "blast")]
    BlastRadius(BlastRadiusArgs),

    /// Compare two saved `analyze -f json` runs
    Diff(DiffArgs),

    /// Print the default configuration file
    Init,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Exit with an error when the overall score is below this value
    #[arg(long)]
    pub fail_under: Option<f64>,
}

#[derive(Args)]
pub struct BlastRadiusArgs {
    /// Function names to check (repeatable; default: every function)
    #[arg(long = "function", short = 'n')]
    pub functions: Vec<String>,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Baseline analysis (JSON)
    pub previous: PathBuf,

    /// Analysis to compare against the baseline (JSON)
    pub current: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
