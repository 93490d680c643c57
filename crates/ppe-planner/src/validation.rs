//! Plan validation
//!
//! Errors make the plan unusable; warnings are surfaced on a successful result.

use crate::dependency::find_cycles;
use ppe_core::{DynamicPhase, PlannerConfig, PlanningError};
use serde::{Deserialize, Serialize};

/// Warning emitted when a plan carries no features at all
pub const NO_FEATURES_WARNING: &str = "No features were included.";

/// Outcome of validating a phase list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Phase list validator
#[derive(Debug, Clone, Copy)]
pub struct PlanValidator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> PlanValidator<'a> {
    /// Create validator over configuration
    #[inline]
    #[must_use]
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Validate phases
    ///
    /// Checks, in order:
    /// 1. Minimum phase count (error)
    /// 2. Dependency cycles (error)
    /// 3. Maximum phase count (warning)
    /// 4. Oversized phases (warning)
    /// 5. Empty feature set (warning)
    #[must_use]
    pub fn validate(&self, phases: &[DynamicPhase]) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if phases.len() < self.config.min_phases {
            errors.push(
                PlanningError::TooFewPhases {
                    actual: phases.len(),
                    minimum: self.config.min_phases,
                }
                .to_string(),
            );
        }

        for phase in find_cycles(phases) {
            errors.push(PlanningError::CycleDetected { phase }.to_string());
        }

        if phases.len() > self.config.max_phases {
            warnings.push(format!(
                "Plan has {} phases, more than the recommended {}",
                phases.len(),
                self.config.max_phases
            ));
        }

        let threshold = self.config.oversized_phase_threshold();
        for phase in phases {
            if f64::from(phase.estimated_tokens) > threshold {
                warnings.push(format!(
                    "Phase {} ({}) is estimated at {} tokens, above the {} token budget",
                    phase.phase_number,
                    phase.name,
                    phase.estimated_tokens,
                    self.config.max_tokens_per_phase
                ));
            }
        }

        if phases.iter().all(|p| p.features.is_empty()) {
            warnings.push(NO_FEATURES_WARNING.to_string());
        }

        for warning in &warnings {
            tracing::warn!(%warning, "plan validation warning");
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
