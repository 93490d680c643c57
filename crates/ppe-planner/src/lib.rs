//! PPE Planner - turns an application concept into an ordered phase plan
//!
//! Pipeline stages, each usable on its own:
//! - [`classifier`]: features and technical flags to classifications
//! - [`grouping`]: classifications into insertion-ordered domain buckets
//! - [`builder`]: buckets into phases under token and feature budgets
//! - [`dependency`]: dependency DAG, cycle detection, execution order
//! - [`enrichment`]: per-phase extracts of the requirements conversation
//! - [`validation`]: errors and warnings for a phase list
//! - [`generator`]: the whole pipeline behind one call
//!
//! # Example
//!
//! ```rust
//! use ppe_core::{AppConcept, Feature, Priority};
//! use ppe_planner::PhasePlanGenerator;
//!
//! let concept = AppConcept::new("Recipes", "recipe book")
//!     .with_feature(Feature::new("f1", "Recipe list", "browse recipes", Priority::High));
//! let result = PhasePlanGenerator::default().generate(&concept);
//! assert!(result.success);
//! assert_eq!(result.plan.unwrap().phases[0].name, "Project Setup");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod builder;
pub mod classifier;
pub mod dependency;
pub mod enrichment;
pub mod generator;
pub mod grouping;
pub mod validation;

pub use builder::{FeatureBatch, PhaseBuilder};
pub use classifier::FeatureClassifier;
pub use dependency::{check_acyclic, execution_order, find_cycles, resolve_dependencies};
pub use enrichment::ContextEnricher;
pub use generator::{AnalysisDetails, PhasePlanGenerator, PlanResult};
pub use grouping::{group_by_domain, DomainGroups};
pub use validation::{PlanValidator, ValidationReport, NO_FEATURES_WARNING};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for planning
    pub use crate::{
        execution_order, ContextEnricher, FeatureClassifier, PhaseBuilder, PhasePlanGenerator,
        PlanResult, PlanValidator, ValidationReport,
    };
    pub use ppe_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
