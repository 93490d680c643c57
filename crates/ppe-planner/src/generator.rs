//! Plan generation entry point
//!
//! [`PhasePlanGenerator::generate`] runs the whole pipeline:
//!
//! ```text
//! classify → group → build → resolve → enrich → validate → plan
//! ```
//!
//! and always returns a [`PlanResult`]; failures never escape as errors.

use crate::builder::PhaseBuilder;
use crate::classifier::FeatureClassifier;
use crate::dependency::resolve_dependencies;
use crate::enrichment::ContextEnricher;
use crate::grouping::group_by_domain;
use crate::validation::PlanValidator;
use indexmap::IndexMap;
use ppe_core::{
    AppConcept, Complexity, Domain, DynamicPhase, DynamicPhasePlan, FeatureClassification,
    PlannerConfig, PlanningError,
};
use serde::{Deserialize, Serialize};

/// Summary of what the planner saw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// User-stated features
    pub total_features: usize,
    /// Features synthesized from technical flags and layout tags
    pub implicit_features: usize,
    /// Classifications per domain, in first-seen order
    pub domain_counts: IndexMap<Domain, usize>,
    pub complex_features: usize,
    pub own_phase_features: usize,
    pub total_phases: usize,
    pub average_tokens_per_phase: u32,
}

impl AnalysisDetails {
    fn record_classifications(&mut self, classifications: &[FeatureClassification]) {
        for classification in classifications {
            *self.domain_counts.entry(classification.domain).or_default() += 1;
        }
        self.complex_features = classifications
            .iter()
            .filter(|c| c.complexity == Complexity::Complex)
            .count();
        self.own_phase_features = classifications.iter().filter(|c| c.requires_own_phase).count();
    }

    fn record_phases(&mut self, phases: &[DynamicPhase]) {
        self.total_phases = phases.len();
        let total: u64 = phases.iter().map(|p| u64::from(p.estimated_tokens)).sum();
        let average = total.checked_div(phases.len() as u64).unwrap_or(0);
        self.average_tokens_per_phase = u32::try_from(average).unwrap_or(u32::MAX);
    }
}

/// Uniform result of a planning call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<DynamicPhasePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub warnings: Vec<String>,
    pub analysis_details: AnalysisDetails,
}

/// Phase plan generator
///
/// Owns only its configuration; every call builds its own state.
#[derive(Debug, Clone, Default)]
pub struct PhasePlanGenerator {
    config: PlannerConfig,
}

impl PhasePlanGenerator {
    /// Create generator with configuration
    #[inline]
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate a plan for a concept
    #[must_use]
    pub fn generate(&self, concept: &AppConcept) -> PlanResult {
        let mut analysis = AnalysisDetails {
            total_features: concept.features.len(),
            ..AnalysisDetails::default()
        };
        let mut warnings = Vec::new();

        match self.try_generate(concept, &mut analysis, &mut warnings) {
            Ok(plan) => {
                tracing::info!(
                    plan = %plan.id,
                    concept = %plan.concept_name,
                    phases = plan.total_phases,
                    tokens = plan.estimated_total_tokens,
                    complexity = ?plan.complexity,
                    "plan created"
                );
                PlanResult {
                    success: true,
                    plan: Some(plan),
                    error: None,
                    warnings,
                    analysis_details: analysis,
                }
            }
            Err(error) => {
                tracing::warn!(concept = %concept.name, %error, "plan generation failed");
                PlanResult {
                    success: false,
                    plan: None,
                    error: Some(error.to_string()),
                    warnings,
                    analysis_details: analysis,
                }
            }
        }
    }

    fn try_generate(
        &self,
        concept: &AppConcept,
        analysis: &mut AnalysisDetails,
        warnings: &mut Vec<String>,
    ) -> Result<DynamicPhasePlan, PlanningError> {
        self.config.validate()?;
        check_concept(concept)?;

        let classifier = FeatureClassifier::new(&self.config);
        let mut classifications = classifier.classify_all(&concept.features);
        let implicit_start = classifications.len();
        classifications.extend(classifier.classify_requirements(&concept.technical));
        if let Some(manifest) = &concept.layout_manifest {
            classifications
                .extend(classifier.classify_detected_features(&manifest.detected_features));
        }
        analysis.implicit_features = classifications.len() - implicit_start;
        analysis.record_classifications(&classifications);

        let grouped = group_by_domain(classifications);
        let mut phases = PhaseBuilder::new(&self.config).build(grouped, concept);
        resolve_dependencies(&mut phases);

        if let Some(transcript) = concept.conversation_context.as_deref() {
            let enricher = ContextEnricher::new(&self.config);
            for phase in &mut phases {
                let extract = enricher.extract(transcript, phase.domain);
                if !extract.is_empty() {
                    phase.concept_context.conversation_extract = Some(extract);
                }
            }
        }

        analysis.record_phases(&phases);

        let report = PlanValidator::new(&self.config).validate(&phases);
        warnings.extend(report.warnings);
        if !report.is_valid {
            return Err(PlanningError::ValidationFailed(report.errors));
        }

        Ok(DynamicPhasePlan::new(concept.name.clone(), phases))
    }
}

fn check_concept(concept: &AppConcept) -> Result<(), PlanningError> {
    if concept.name.trim().is_empty() {
        return Err(PlanningError::InvalidConcept("concept name is empty".into()));
    }
    for (index, feature) in concept.features.iter().enumerate() {
        if feature.name.trim().is_empty() {
            let id = if feature.id.is_empty() {
                format!("#{index}")
            } else {
                feature.id.clone()
            };
            return Err(PlanningError::invalid_feature(id, "feature name is empty"));
        }
    }
    Ok(())
}
