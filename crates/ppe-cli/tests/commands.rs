use ppe_cli::commands::{render_analysis, render_context, render_plan};
use ppe_cli::Settings;
use ppe_test_utils::{empty_concept, login_concept, GENERATED_OUTPUT};
use pretty_assertions::assert_eq;
use serde_json::Value;

#[test]
fn test_plan_renders_successful_result() {
    let concept = serde_json::to_string(&login_concept()).unwrap();
    let output = render_plan(&concept, &Settings::default(), false).unwrap();
    assert!(output.success);

    let value: Value = serde_json::from_str(&output.json).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["plan"]["phases"][0]["name"], "Project Setup");
    assert!(value.get("error").is_none());
}

#[test]
fn test_plan_accepts_minimal_concept_json() {
    let output = render_plan(
        r#"{"name": "Notes", "description": "quick notes"}"#,
        &Settings::default(),
        true,
    )
    .unwrap();
    assert!(output.success);
    assert!(output.json.contains('\n'));
}

#[test]
fn test_plan_failure_is_reported_not_raised() {
    let settings = Settings::from_toml_str("[planner]\nminPhases = 20\n").unwrap();
    let concept = serde_json::to_string(&empty_concept()).unwrap();
    let output = render_plan(&concept, &settings, false).unwrap();
    assert!(!output.success);

    let value: Value = serde_json::from_str(&output.json).unwrap();
    assert!(value["error"].as_str().unwrap().contains("minimum is 20"));
}

#[test]
fn test_plan_rejects_invalid_json() {
    assert!(render_plan("{not json", &Settings::default(), false).is_err());
}

#[test]
fn test_context_with_summary() {
    let text = render_context(GENERATED_OUTPUT, &Settings::default(), true).unwrap();
    assert!(text.starts_with("## Existing files (4)\n"));
    assert!(text.contains("\n// File: src/types/recipe.ts\n"));
}

#[test]
fn test_context_respects_ceiling() {
    let settings = Settings::from_toml_str("[context]\nmaxChars = 150\n").unwrap();
    let text = render_context(GENERATED_OUTPUT, &settings, false).unwrap();
    assert!(text.len() <= 150);
    assert!(text.starts_with("// File: src/types/recipe.ts\n"));
}

#[test]
fn test_analysis_report() {
    let value: Value =
        serde_json::from_str(&render_analysis(GENERATED_OUTPUT, false).unwrap()).unwrap();
    assert_eq!(value["files"].as_array().unwrap().len(), 4);
    assert_eq!(value["files"][0]["fileType"], "type");
    assert_eq!(value["apiContracts"][0]["method"], "GET");
    assert_eq!(value["apiContracts"][0]["requiresAuth"], true);
    assert_eq!(value["dependencies"]["next-auth"], "^4.24.0");
    assert_eq!(value["complete"], true);
    assert!(value["guidelines"]
        .as_array()
        .unwrap()
        .iter()
        .any(|g| g.as_str() == Some("Style components with tailwind")));
}

#[test]
fn test_malformed_output_is_an_error() {
    assert!(render_analysis("===FILE:===\n", false).is_err());
    assert!(render_context("===FILE:===\n", &Settings::default(), false).is_err());
}
