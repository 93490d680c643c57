//! Planner configuration
//!
//! The only state shared between planning runs. Every value can be overridden
//! through the `with_*` builders or a `[planner]` TOML table.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base token estimates per work category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseTokenEstimates {
    /// Unmatched (simple) feature
    pub simple_feature: u32,
    /// Project setup phase
    pub setup: u32,
    /// Design system phase
    pub design_system: u32,
    /// Polish phase
    pub polish: u32,
}

impl Default for BaseTokenEstimates {
    fn default() -> Self {
        Self {
            simple_feature: 1500,
            setup: 2000,
            design_system: 2500,
            polish: 2000,
        }
    }
}

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Fewer phases than this is a validation error
    pub min_phases: usize,
    /// More phases than this is a validation warning
    pub max_phases: usize,
    /// Token budget for one phase
    pub max_tokens_per_phase: u32,
    /// Feature budget for one phase
    pub max_features_per_phase: usize,
    /// Base token estimates
    pub base_tokens: BaseTokenEstimates,
    /// Paragraphs kept per phase by the context enricher
    pub enrichment_top_k: usize,
    /// Character ceiling of one enrichment extract
    pub enrichment_max_chars: usize,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With phase count bounds
    #[inline]
    #[must_use]
    pub fn with_phase_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_phases = min;
        self.max_phases = max;
        self
    }

    /// With per-phase token budget
    #[inline]
    #[must_use]
    pub fn with_max_tokens_per_phase(mut self, tokens: u32) -> Self {
        self.max_tokens_per_phase = tokens;
        self
    }

    /// With per-phase feature budget
    #[inline]
    #[must_use]
    pub fn with_max_features_per_phase(mut self, features: usize) -> Self {
        self.max_features_per_phase = features;
        self
    }

    /// With base token estimates
    #[inline]
    #[must_use]
    pub fn with_base_tokens(mut self, base_tokens: BaseTokenEstimates) -> Self {
        self.base_tokens = base_tokens;
        self
    }

    /// Token estimate above which a phase is flagged as oversized
    #[inline]
    #[must_use]
    pub fn oversized_phase_threshold(&self) -> f64 {
        f64::from(self.max_tokens_per_phase) * 1.5
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for zero budgets or inverted bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens_per_phase == 0 {
            return Err(ConfigError::invalid("maxTokensPerPhase", "must be greater than zero"));
        }
        if self.max_features_per_phase == 0 {
            return Err(ConfigError::invalid("maxFeaturesPerPhase", "must be greater than zero"));
        }
        if self.min_phases > self.max_phases {
            return Err(ConfigError::invalid(
                "minPhases",
                format!("{} exceeds maxPhases {}", self.min_phases, self.max_phases),
            ));
        }
        Ok(())
    }

    /// Parse from TOML text
    ///
    /// Accepts either a bare table or one nested under `[planner]`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] on malformed input and
    /// [`ConfigError::InvalidValue`] when validation fails
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Wrapper {
            planner: Option<PlannerConfig>,
        }

        let config = match toml::from_str::<Wrapper>(text)? {
            Wrapper {
                planner: Some(config),
            } => config,
            Wrapper { planner: None } => toml::from_str::<PlannerConfig>(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_phases: 2,
            max_phases: 25,
            max_tokens_per_phase: 8000,
            max_features_per_phase: 4,
            base_tokens: BaseTokenEstimates::default(),
            enrichment_top_k: 5,
            enrichment_max_chars: 3000,
        }
    }
}
