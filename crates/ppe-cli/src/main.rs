//! `ppe` binary

use clap::Parser;
use ppe_cli::commands::{handle_analyze, handle_context, handle_plan};
use ppe_cli::{CliArgs, Commands, VERSION};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    tracing::debug!(version = VERSION, ?args, "ppe starting");

    let result = match &args.command {
        Commands::Plan(plan) => handle_plan(plan).await,
        Commands::Context(context) => handle_context(context).await,
        Commands::Analyze(analyze) => handle_analyze(analyze).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(args: &CliArgs) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if args.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
