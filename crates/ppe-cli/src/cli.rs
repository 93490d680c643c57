//! Command line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Phase planning and context budgeting
#[derive(Parser, Debug)]
#[command(
    name = "ppe",
    version,
    about = "Plan build phases for an application concept and budget code context between them"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a phase plan from a concept JSON file
    Plan(PlanArgs),

    /// Build the context window for generated output
    Context(ContextArgs),

    /// Report files, exports, API contracts and patterns in generated output
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Concept JSON file
    #[arg(value_name = "CONCEPT")]
    pub concept: PathBuf,

    /// TOML settings with `[planner]` and `[context]` tables
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty-print the plan
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// Generated output in the `===FILE:path===` format
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// TOML settings with `[planner]` and `[context]` tables
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the context ceiling in bytes
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Print the existing-code summary before the context
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Generated output in the `===FILE:path===` format
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,
}
