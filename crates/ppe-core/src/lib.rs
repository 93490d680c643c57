//! PPE Core - shared vocabulary of the phase planning engine
//!
//! Provides:
//! - The planning input ([`AppConcept`]) and feature classification records
//! - Phases, plans and their execution tracking
//! - Planner configuration
//! - Error taxonomy
//!
//! # Example
//!
//! ```rust
//! use ppe_core::{DynamicPhase, DynamicPhasePlan, Domain};
//!
//! let phases = vec![
//!     DynamicPhase::new(1, "Project Setup", "Scaffold", Domain::Setup),
//!     DynamicPhase::new(2, "Polish & Documentation", "Finish", Domain::Polish).depends_on(1),
//! ];
//! let mut plan = DynamicPhasePlan::new("Demo", phases);
//! plan.start_phase(1).unwrap();
//! plan.complete_phase(1, vec!["package.json".into()]).unwrap();
//! assert_eq!(plan.next_runnable_phases(), vec![2]);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod phase;
pub mod types;

pub use config::{BaseTokenEstimates, PlannerConfig};
pub use error::{ConfigError, ExecutionError, PlanningError};
pub use phase::{
    estimate_time, ConceptContext, DynamicPhase, DynamicPhasePlan, PhaseStatus, PlanComplexity,
};
pub use types::{
    AppConcept, Complexity, DataField, DataModel, Domain, Feature, FeatureClassification,
    LayoutDesign, LayoutManifest, Priority, Role, TechnicalRequirements, UiPreferences,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with PPE Core
    pub use crate::{
        AppConcept, Complexity, Domain, DynamicPhase, DynamicPhasePlan, Feature,
        FeatureClassification, PhaseStatus, PlannerConfig, PlanningError, Priority,
        TechnicalRequirements,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
