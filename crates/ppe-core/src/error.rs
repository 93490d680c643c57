//! Error types for PPE
//!
//! Provides error handling for:
//! - Planning failures (invalid input, cycles, phase bounds)
//! - Plan execution tracking (phase transitions)
//! - Configuration loading

use crate::phase::PhaseStatus;
use std::path::PathBuf;

/// Planning errors
///
/// All of these are fatal to plan creation. The generator converts them into
/// an unsuccessful `PlanResult` rather than letting them escape.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// Concept is missing required data
    #[error("invalid concept: {0}")]
    InvalidConcept(String),

    /// A feature is malformed
    #[error("invalid feature '{id}': {reason}")]
    InvalidFeature { id: String, reason: String },

    /// Dependency cycle between phases
    #[error("circular dependency detected involving phase {phase}")]
    CycleDetected { phase: u32 },

    /// Too few phases were produced
    #[error("plan has {actual} phases, minimum is {minimum}")]
    TooFewPhases { actual: usize, minimum: usize },

    /// Validation reported errors
    #[error("plan validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PlanningError {
    /// Create invalid feature error
    #[inline]
    pub fn invalid_feature(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error comes from caller input rather than plan structure
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConcept(_) | Self::InvalidFeature { .. } | Self::Config(_)
        )
    }
}

/// Errors raised while tracking plan execution
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Phase number does not exist in the plan
    #[error("phase {0} not found")]
    PhaseNotFound(u32),

    /// Phase started before its dependencies completed
    #[error("phase {phase} is waiting on phases {pending:?}")]
    DependenciesIncomplete { phase: u32, pending: Vec<u32> },

    /// Phase started while another one is still running
    #[error("phase {phase} cannot start while phase {running} is running")]
    PhaseAlreadyRunning { phase: u32, running: u32 },

    /// Transition not allowed from the current status
    #[error("phase {phase} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        phase: u32,
        from: PhaseStatus,
        to: PhaseStatus,
    },
}

impl ExecutionError {
    /// Check if the caller may retry once other phases progress
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DependenciesIncomplete { .. } | Self::PhaseAlreadyRunning { .. }
        )
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create invalid value error
    #[inline]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_names_phase() {
        let err = PlanningError::CycleDetected { phase: 4 };
        assert_eq!(err.to_string(), "circular dependency detected involving phase 4");
    }

    #[test]
    fn validation_failed_joins_messages() {
        let err = PlanningError::ValidationFailed(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "plan validation failed: a; b");
    }

    #[test]
    fn input_errors_classified() {
        assert!(PlanningError::InvalidConcept("empty".into()).is_input_error());
        assert!(PlanningError::invalid_feature("f1", "no name").is_input_error());
        assert!(!PlanningError::CycleDetected { phase: 2 }.is_input_error());
    }

    #[test]
    fn execution_error_retryable() {
        let waiting = ExecutionError::DependenciesIncomplete {
            phase: 3,
            pending: vec![2],
        };
        assert!(waiting.is_retryable());
        let busy = ExecutionError::PhaseAlreadyRunning {
            phase: 3,
            running: 2,
        };
        assert!(busy.is_retryable());
        assert_eq!(busy.to_string(), "phase 3 cannot start while phase 2 is running");
        assert!(!ExecutionError::PhaseNotFound(9).is_retryable());
    }

    #[test]
    fn config_error_conversion() {
        let err: PlanningError = ConfigError::invalid("minPhases", "too big").into();
        assert!(matches!(err, PlanningError::Config(_)));
    }
}
