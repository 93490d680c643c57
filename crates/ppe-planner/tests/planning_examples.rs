use ppe_core::{Domain, PhaseStatus, PlanComplexity, PlannerConfig};
use ppe_planner::{execution_order, PhasePlanGenerator, NO_FEATURES_WARNING};
use ppe_test_utils::{empty_concept, login_concept, marketplace_concept};
use pretty_assertions::assert_eq;

#[test]
fn test_login_with_database() {
    let result = PhasePlanGenerator::default().generate(&login_concept());
    assert!(result.success);
    let plan = result.plan.unwrap();

    let position = |name: &str| plan.phases.iter().position(|p| p.name == name).unwrap();
    assert!(position("Database Schema") < position("Authentication System"));
    assert!(position("Authentication System") < position("Polish & Documentation"));
    assert_eq!(plan.phases[0].name, "Project Setup");
    assert!(plan.phases[0].dependencies.is_empty());
    assert_eq!(plan.complexity, PlanComplexity::Moderate);
    assert!(plan.id.starts_with("plan-"));
    assert_eq!(plan.estimated_total_tokens, 11_000);
}

#[test]
fn test_empty_concept_still_plans() {
    let config = PlannerConfig::default();
    let result = PhasePlanGenerator::new(config.clone()).generate(&empty_concept());
    assert!(result.success);
    assert!(result.plan.unwrap().total_phases >= config.min_phases);
    assert_eq!(result.warnings, vec![NO_FEATURES_WARNING]);
}

#[test]
fn test_marketplace_structure() {
    let result = PhasePlanGenerator::default().generate(&marketplace_concept());
    assert!(result.success, "{:?}", result.error);
    let plan = result.plan.unwrap();

    let domains: Vec<Domain> = plan.phases.iter().map(|p| p.domain).collect();
    assert_eq!(
        &domains[..4],
        &[Domain::Setup, Domain::DesignSystem, Domain::Database, Domain::Auth]
    );
    assert_eq!(domains.last(), Some(&Domain::Polish));

    // sign-up feature and the implicit auth feature share one phase
    assert_eq!(plan.phases.iter().filter(|p| p.domain == Domain::Auth).count(), 1);

    let admin = plan.phases.iter().find(|p| p.domain == Domain::Admin).unwrap();
    assert!(admin.dependencies.contains(&4));
    assert!(admin.dependencies.contains(&3));
    assert!(!admin.concept_context.roles.is_empty());

    let database = &plan.phases[2];
    assert_eq!(database.concept_context.data_models.len(), 1);

    let setup = &plan.phases[0];
    assert_eq!(
        setup.concept_context.design_notes.as_deref(),
        Some("Earthy palette, rounded cards")
    );
    assert_eq!(setup.concept_context.purpose, "Let makers sell handmade goods");

    assert!(plan.phases.iter().any(|p| p.concept_context.conversation_extract.is_some()));
    assert!(result.analysis_details.implicit_features >= 4);
}

#[test]
fn test_plan_execution_walkthrough() {
    let mut plan = PhasePlanGenerator::default()
        .generate(&login_concept())
        .plan
        .unwrap();
    let order = execution_order(&plan.phases).unwrap();
    assert_eq!(order.len(), plan.total_phases);

    assert_eq!(plan.next_runnable_phases(), vec![1]);
    assert!(plan.start_phase(3).unwrap_err().is_retryable());

    for number in order {
        plan.start_phase(number).unwrap();
        if number == 3 {
            plan.fail_phase(3, "generation timed out").unwrap();
            assert_eq!(plan.failed_phases, vec![3]);
            assert_eq!(plan.phase(2).unwrap().status, PhaseStatus::Completed);
            plan.reset_phase(3).unwrap();
            plan.start_phase(3).unwrap();
        }
        plan.complete_phase(number, vec![format!("src/phase{number}.ts")]).unwrap();
    }

    assert!(plan.is_complete());
    assert!((plan.progress() - 1.0).abs() < f64::EPSILON);
    assert_eq!(plan.accumulated_files.len(), 4);
    assert!(plan.accumulated_features.contains(&"User Login".to_string()));
    assert!(plan.failed_phases.is_empty());
}

#[test]
fn test_plan_serializes_camel_case() {
    let result = PhasePlanGenerator::default().generate(&login_concept());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["plan"]["phases"][0]["phaseNumber"], 1);
    assert_eq!(json["plan"]["phases"][0]["status"], "pending");
    assert_eq!(json["analysisDetails"]["totalFeatures"], 1);
}
