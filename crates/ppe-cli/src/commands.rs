//! Subcommand handlers
//!
//! Each handler reads its inputs, delegates to a pure `render_*` function and
//! prints the result to stdout. Logs go to stderr.

use crate::cli::{AnalyzeArgs, ContextArgs, PlanArgs};
use crate::settings::Settings;
use anyhow::{Context, Result};
use ppe_context::{
    analyze_generated_files, parse_generated_output, CodeContextTracker, FileAnalysis,
};
use ppe_core::AppConcept;
use ppe_planner::PhasePlanGenerator;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

async fn read_input(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = read_input(path).await?;
    Settings::from_toml_str(&text)
        .with_context(|| format!("invalid settings in {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialize output")
}

/// Rendered plan and whether planning succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutput {
    pub json: String,
    pub success: bool,
}

/// Plan a concept given as JSON
///
/// # Errors
/// Fails if the concept is not valid JSON; planning failures are reported in
/// the output instead
pub fn render_plan(concept_json: &str, settings: &Settings, pretty: bool) -> Result<PlanOutput> {
    let concept: AppConcept =
        serde_json::from_str(concept_json).context("concept is not valid JSON")?;
    let result = PhasePlanGenerator::new(settings.planner.clone()).generate(&concept);
    Ok(PlanOutput {
        json: to_json(&result, pretty)?,
        success: result.success,
    })
}

/// Context text for generated output, optionally preceded by the summary
///
/// # Errors
/// Fails if the output does not follow the delimited format
pub fn render_context(raw: &str, settings: &Settings, summary: bool) -> Result<String> {
    let mut tracker = CodeContextTracker::new(settings.context);
    tracker.record_raw(1, raw).context("malformed generated output")?;

    let window = tracker.build_context();
    if summary {
        Ok(format!("{}\n{}", tracker.prompt_summary(), window.text))
    } else {
        Ok(window.text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport<'a> {
    #[serde(flatten)]
    analysis: FileAnalysis,
    guidelines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<&'a serde_json::Value>,
    complete: bool,
}

/// JSON report of generated output
///
/// # Errors
/// Fails if the output does not follow the delimited format
pub fn render_analysis(raw: &str, pretty: bool) -> Result<String> {
    let output = parse_generated_output(raw).context("malformed generated output")?;
    let analysis = analyze_generated_files(&output.files);
    let report = AnalyzeReport {
        guidelines: analysis.patterns.guidelines(),
        analysis,
        dependencies: output.dependencies.as_ref(),
        complete: output.complete,
    };
    to_json(&report, pretty)
}

/// `ppe plan`
///
/// # Errors
/// Fails on unreadable input or invalid settings
pub async fn handle_plan(args: &PlanArgs) -> Result<ExitCode> {
    let settings = load_settings(args.config.as_deref()).await?;
    let concept = read_input(&args.concept).await?;

    let output = render_plan(&concept, &settings, args.pretty)?;
    println!("{}", output.json);

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(concept = %args.concept.display(), "planning failed");
        Ok(ExitCode::FAILURE)
    }
}

/// `ppe context`
///
/// # Errors
/// Fails on unreadable input, invalid settings or malformed output
pub async fn handle_context(args: &ContextArgs) -> Result<ExitCode> {
    let mut settings = load_settings(args.config.as_deref()).await?;
    if let Some(max_chars) = args.max_chars {
        settings.context = settings.context.with_max_chars(max_chars);
        settings.validate()?;
    }
    let raw = read_input(&args.output).await?;

    print!("{}", render_context(&raw, &settings, args.summary)?);
    Ok(ExitCode::SUCCESS)
}

/// `ppe analyze`
///
/// # Errors
/// Fails on unreadable input or malformed output
pub async fn handle_analyze(args: &AnalyzeArgs) -> Result<ExitCode> {
    let raw = read_input(&args.output).await?;
    println!("{}", render_analysis(&raw, args.pretty)?);
    Ok(ExitCode::SUCCESS)
}
