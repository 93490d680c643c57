//! File settings for the command line
//!
//! ```toml
//! [planner]
//! minPhases = 3
//! maxTokensPerPhase = 6000
//!
//! [context]
//! maxChars = 16000
//! ```

use ppe_context::ContextConfig;
use ppe_core::{ConfigError, PlannerConfig};
use serde::Deserialize;

/// Planner and context configuration, both optional in the file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub planner: PlannerConfig,
    pub context: ContextConfig,
}

impl Settings {
    /// Parse and validate TOML settings
    ///
    /// # Errors
    /// Returns [`ConfigError`] on malformed TOML or out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate both sections
    ///
    /// # Errors
    /// Returns the first [`ConfigError::InvalidValue`] found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planner.validate()?;
        self.context.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn both_tables_override_defaults() {
        let settings = Settings::from_toml_str(
            "[planner]\nminPhases = 3\nmaxTokensPerPhase = 6000\n\n[context]\nmaxChars = 16000\n",
        )
        .unwrap();
        assert_eq!(settings.planner.min_phases, 3);
        assert_eq!(settings.planner.max_tokens_per_phase, 6000);
        assert_eq!(settings.planner.max_phases, PlannerConfig::default().max_phases);
        assert_eq!(settings.context.max_chars, 16_000);
        assert_eq!(settings.context.truncation_floor, 500);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let err = Settings::from_toml_str("[context]\nmaxChars = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err =
            Settings::from_toml_str("[planner]\nminPhases = 30\nmaxPhases = 5\n").unwrap_err();
        assert!(err.to_string().contains("minPhases"));

        assert!(matches!(
            Settings::from_toml_str("[planner\n").unwrap_err(),
            ConfigError::Toml(_)
        ));
    }
}
