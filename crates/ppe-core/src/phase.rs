//! Phases and phase plans
//!
//! A [`DynamicPhasePlan`] is the planner's output and also the record the
//! execution driver updates while phases run. Execution is strictly
//! sequential: a phase may start only once every phase it depends on has
//! completed.

use crate::error::ExecutionError;
use crate::types::{DataModel, Domain, FeatureClassification, Role, UiPreferences};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Tokens generated per estimated minute of work
const TOKENS_PER_MINUTE: u32 = 2000;

/// Execution status of a phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    /// Not started
    #[default]
    Pending,
    /// Code generation running
    InProgress,
    /// Generated successfully
    Completed,
    /// Generation failed, eligible for reset
    Failed,
}

impl PhaseStatus {
    /// Check whether moving to `to` is allowed
    #[must_use]
    pub fn can_transition_to(self, to: PhaseStatus) -> bool {
        matches!(
            (self, to),
            (PhaseStatus::Pending, PhaseStatus::InProgress)
                | (PhaseStatus::InProgress, PhaseStatus::Completed)
                | (PhaseStatus::InProgress, PhaseStatus::Failed)
                | (PhaseStatus::InProgress, PhaseStatus::Pending)
                | (PhaseStatus::Failed, PhaseStatus::Pending)
        )
    }
}

/// Overall plan complexity, derived from phase count only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanComplexity {
    Simple,
    Moderate,
    Complex,
    Enterprise,
}

impl PlanComplexity {
    /// Tier for a phase count
    #[inline]
    #[must_use]
    pub fn from_phase_count(count: usize) -> Self {
        match count {
            0..=3 => PlanComplexity::Simple,
            4..=6 => PlanComplexity::Moderate,
            7..=12 => PlanComplexity::Complex,
            _ => PlanComplexity::Enterprise,
        }
    }
}

/// Slice of the concept a single phase needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptContext {
    pub purpose: String,
    pub target_users: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_preferences: Option<UiPreferences>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub data_models: Vec<DataModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_notes: Option<String>,
    /// Relevant extract of the requirements conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_extract: Option<String>,
}

/// One unit of planned work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPhase {
    /// 1-based, contiguous
    pub phase_number: u32,
    pub name: String,
    pub description: String,
    pub domain: Domain,
    /// Names of the features implemented here
    pub features: Vec<String>,
    /// Classifications behind `features`
    #[serde(default)]
    pub feature_details: Vec<FeatureClassification>,
    pub estimated_tokens: u32,
    pub estimated_time: String,
    /// Phase numbers, all strictly lower than `phase_number`
    pub dependencies: Vec<u32>,
    pub dependency_names: Vec<String>,
    pub test_criteria: Vec<String>,
    pub concept_context: ConceptContext,
    pub status: PhaseStatus,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub generated_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DynamicPhase {
    /// Create pending phase
    #[must_use]
    pub fn new(
        phase_number: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        domain: Domain,
    ) -> Self {
        Self {
            phase_number,
            name: name.into(),
            description: description.into(),
            domain,
            features: Vec::new(),
            feature_details: Vec::new(),
            estimated_tokens: 0,
            estimated_time: estimate_time(0),
            dependencies: Vec::new(),
            dependency_names: Vec::new(),
            test_criteria: Vec::new(),
            concept_context: ConceptContext::default(),
            status: PhaseStatus::Pending,
            errors: Vec::new(),
            generated_files: Vec::new(),
            started_at: None,
            completed_at: None,
        }
    }

    /// With classified features; token estimate becomes their sum
    #[must_use]
    pub fn with_features(mut self, features: Vec<FeatureClassification>) -> Self {
        self.features = features.iter().map(|f| f.name.clone()).collect();
        self.feature_details = features;
        let tokens = self.feature_details.iter().map(|f| f.token_estimate).sum();
        self.with_tokens(tokens)
    }

    /// With explicit token estimate
    #[inline]
    #[must_use]
    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.estimated_tokens = tokens;
        self.estimated_time = estimate_time(tokens);
        self
    }

    /// With declared dependency
    #[inline]
    #[must_use]
    pub fn depends_on(mut self, phase_number: u32) -> Self {
        self.dependencies.push(phase_number);
        self
    }

    /// With test criteria
    #[inline]
    #[must_use]
    pub fn with_test_criteria(mut self, criteria: Vec<String>) -> Self {
        self.test_criteria = criteria;
        self
    }

    /// With concept context
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: ConceptContext) -> Self {
        self.concept_context = context;
        self
    }

    fn transition(&mut self, to: PhaseStatus) -> Result<(), ExecutionError> {
        if !self.status.can_transition_to(to) {
            return Err(ExecutionError::InvalidTransition {
                phase: self.phase_number,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Human-readable time estimate for a token count
#[must_use]
pub fn estimate_time(tokens: u32) -> String {
    let minutes = tokens.div_ceil(TOKENS_PER_MINUTE).max(1);
    format!("~{minutes} min")
}

/// The full ordered plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPhasePlan {
    pub id: String,
    pub concept_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_phases: usize,
    pub phases: Vec<DynamicPhase>,
    pub estimated_total_tokens: u64,
    pub estimated_total_time: String,
    pub complexity: PlanComplexity,
    pub current_phase: Option<u32>,
    pub completed_phases: Vec<u32>,
    pub failed_phases: Vec<u32>,
    pub accumulated_files: Vec<String>,
    pub accumulated_features: Vec<String>,
}

impl DynamicPhasePlan {
    /// Create plan from ordered phases
    #[must_use]
    pub fn new(concept_name: impl Into<String>, phases: Vec<DynamicPhase>) -> Self {
        let now = Utc::now();
        let estimated_total_tokens: u64 =
            phases.iter().map(|p| u64::from(p.estimated_tokens)).sum();
        let total_minutes: u64 = phases
            .iter()
            .map(|p| u64::from(p.estimated_tokens.div_ceil(TOKENS_PER_MINUTE).max(1)))
            .sum();

        Self {
            id: format!("plan-{}", Ulid::new().to_string().to_lowercase()),
            concept_name: concept_name.into(),
            created_at: now,
            updated_at: now,
            total_phases: phases.len(),
            complexity: PlanComplexity::from_phase_count(phases.len()),
            phases,
            estimated_total_tokens,
            estimated_total_time: format!("~{total_minutes} min"),
            current_phase: None,
            completed_phases: Vec::new(),
            failed_phases: Vec::new(),
            accumulated_files: Vec::new(),
            accumulated_features: Vec::new(),
        }
    }

    /// Get phase by number
    #[must_use]
    pub fn phase(&self, number: u32) -> Option<&DynamicPhase> {
        self.phases.iter().find(|p| p.phase_number == number)
    }

    fn phase_mut(&mut self, number: u32) -> Result<&mut DynamicPhase, ExecutionError> {
        self.phases
            .iter_mut()
            .find(|p| p.phase_number == number)
            .ok_or(ExecutionError::PhaseNotFound(number))
    }

    fn pending_dependencies(&self, phase: &DynamicPhase) -> Vec<u32> {
        phase
            .dependencies
            .iter()
            .copied()
            .filter(|dep| !self.completed_phases.contains(dep))
            .collect()
    }

    /// Phases that are pending and have every dependency completed
    #[must_use]
    pub fn next_runnable_phases(&self) -> Vec<u32> {
        self.phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Pending)
            .filter(|p| self.pending_dependencies(p).is_empty())
            .map(|p| p.phase_number)
            .collect()
    }

    /// Mark phase as running
    ///
    /// # Errors
    /// Fails if the phase is unknown or not pending, if another phase is
    /// still running, or if it has incomplete dependencies
    pub fn start_phase(&mut self, number: u32) -> Result<(), ExecutionError> {
        let phase = self.phase(number).ok_or(ExecutionError::PhaseNotFound(number))?;
        if let Some(running) = self
            .phases
            .iter()
            .find(|p| p.status == PhaseStatus::InProgress && p.phase_number != number)
        {
            return Err(ExecutionError::PhaseAlreadyRunning {
                phase: number,
                running: running.phase_number,
            });
        }

        let pending = self.pending_dependencies(phase);
        if !pending.is_empty() {
            return Err(ExecutionError::DependenciesIncomplete {
                phase: number,
                pending,
            });
        }

        let now = Utc::now();
        let phase = self.phase_mut(number)?;
        phase.transition(PhaseStatus::InProgress)?;
        phase.started_at = Some(now);
        self.current_phase = Some(number);
        self.updated_at = now;
        tracing::info!(phase = number, "phase started");
        Ok(())
    }

    /// Mark running phase as completed, recording the files it produced
    ///
    /// # Errors
    /// Fails if the phase is unknown or not running
    pub fn complete_phase(
        &mut self,
        number: u32,
        generated_files: Vec<String>,
    ) -> Result<(), ExecutionError> {
        let now = Utc::now();
        let phase = self.phase_mut(number)?;
        phase.transition(PhaseStatus::Completed)?;
        phase.completed_at = Some(now);
        phase.generated_files = generated_files.clone();
        let features = phase.features.clone();

        self.completed_phases.push(number);
        for feature in features {
            if !self.accumulated_features.contains(&feature) {
                self.accumulated_features.push(feature);
            }
        }
        for file in generated_files {
            if !self.accumulated_files.contains(&file) {
                self.accumulated_files.push(file);
            }
        }
        if self.current_phase == Some(number) {
            self.current_phase = None;
        }
        self.updated_at = now;
        tracing::info!(phase = number, completed = self.completed_phases.len(), "phase completed");
        Ok(())
    }

    /// Record a failure on a running phase
    ///
    /// Previously completed phases are untouched.
    ///
    /// # Errors
    /// Fails if the phase is unknown or not running
    pub fn fail_phase(
        &mut self,
        number: u32,
        error: impl Into<String>,
    ) -> Result<(), ExecutionError> {
        let error = error.into();
        let phase = self.phase_mut(number)?;
        phase.transition(PhaseStatus::Failed)?;
        phase.errors.push(error.clone());

        if !self.failed_phases.contains(&number) {
            self.failed_phases.push(number);
        }
        if self.current_phase == Some(number) {
            self.current_phase = None;
        }
        self.updated_at = Utc::now();
        tracing::warn!(phase = number, %error, "phase failed");
        Ok(())
    }

    /// Return a failed or running phase to pending so it can be retried
    ///
    /// # Errors
    /// Fails if the phase is unknown, pending or completed
    pub fn reset_phase(&mut self, number: u32) -> Result<(), ExecutionError> {
        let phase = self.phase_mut(number)?;
        phase.transition(PhaseStatus::Pending)?;
        phase.errors.clear();
        phase.started_at = None;

        self.failed_phases.retain(|n| *n != number);
        if self.current_phase == Some(number) {
            self.current_phase = None;
        }
        self.updated_at = Utc::now();
        tracing::debug!(phase = number, "phase reset");
        Ok(())
    }

    /// Fraction of phases completed, in [0, 1]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.phases.is_empty() {
            return 0.0;
        }
        self.completed_phases.len() as f64 / self.phases.len() as f64
    }

    /// Check if every phase completed
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phases.iter().all(|p| p.status == PhaseStatus::Completed)
    }
}
