//! Core types for PPE
//!
//! Defines the planning vocabulary:
//! - Application concept (planning input)
//! - Features and their classifications
//! - Technical requirement flags
//! - Feature domains

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feature priority as stated by the user
///
/// Ordering is significant: `High < Medium < Low`, so ascending sorts put
/// high-priority work first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must ship
    High,
    /// Should ship
    #[default]
    Medium,
    /// Nice to have
    Low,
}

/// Complexity tier of a classified feature
///
/// Ordering is significant: `Simple < Moderate < Complex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Single component or screen
    Simple,
    /// A few cooperating components
    Moderate,
    /// Cross-cutting or infrastructure work
    Complex,
}

/// Coarse category a feature (or phase) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Project scaffolding
    Setup,
    /// Design tokens and base components from a layout design
    DesignSystem,
    /// Schema and persistence
    Database,
    /// Authentication and sessions
    Auth,
    /// Primary business entities
    CoreEntity,
    /// General feature work
    Feature,
    /// Reusable UI pieces
    UiComponent,
    /// Third-party services and APIs
    Integration,
    /// File and media storage
    Storage,
    /// Live updates and collaboration
    RealTime,
    /// Email, push and in-app notifications
    Notification,
    /// Search, filtering and sorting
    Search,
    /// Reporting and dashboards
    Analytics,
    /// Administration tooling
    Admin,
    /// Role-specific screens
    UiRole,
    /// Offline support and sync
    Offline,
    /// Final polish and documentation
    Polish,
}

impl Domain {
    /// Order in which feature domains are turned into phases, after the fixed
    /// setup, design-system, database and auth phases
    pub const PRIORITY_ORDER: [Domain; 12] = [
        Domain::CoreEntity,
        Domain::Feature,
        Domain::UiComponent,
        Domain::Integration,
        Domain::Storage,
        Domain::RealTime,
        Domain::Notification,
        Domain::Search,
        Domain::Analytics,
        Domain::Admin,
        Domain::UiRole,
        Domain::Offline,
    ];

    /// Wire name of the domain
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Setup => "setup",
            Domain::DesignSystem => "design-system",
            Domain::Database => "database",
            Domain::Auth => "auth",
            Domain::CoreEntity => "core-entity",
            Domain::Feature => "feature",
            Domain::UiComponent => "ui-component",
            Domain::Integration => "integration",
            Domain::Storage => "storage",
            Domain::RealTime => "real-time",
            Domain::Notification => "notification",
            Domain::Search => "search",
            Domain::Analytics => "analytics",
            Domain::Admin => "admin",
            Domain::UiRole => "ui-role",
            Domain::Offline => "offline",
            Domain::Polish => "polish",
        }
    }

    /// Label used for phases that bundle several features of this domain
    #[inline]
    #[must_use]
    pub fn phase_label(&self) -> &'static str {
        match self {
            Domain::Setup => "Project Setup",
            Domain::DesignSystem => "Design System",
            Domain::Database => "Database Schema",
            Domain::Auth => "Authentication System",
            Domain::CoreEntity => "Core Data Management",
            Domain::Feature => "Core Features",
            Domain::UiComponent => "UI Components",
            Domain::Integration => "Integrations",
            Domain::Storage => "File Storage",
            Domain::RealTime => "Real-time Features",
            Domain::Notification => "Notifications",
            Domain::Search => "Search & Filtering",
            Domain::Analytics => "Analytics & Reporting",
            Domain::Admin => "Admin Panel",
            Domain::UiRole => "Role-based Views",
            Domain::Offline => "Offline Support",
            Domain::Polish => "Polish & Documentation",
        }
    }

    /// Whether phases of this domain need an authenticated user
    #[inline]
    #[must_use]
    pub fn requires_auth_phase(&self) -> bool {
        matches!(self, Domain::Admin | Domain::UiRole | Domain::Analytics)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let domain = match s {
            "setup" => Domain::Setup,
            "design-system" => Domain::DesignSystem,
            "database" => Domain::Database,
            "auth" => Domain::Auth,
            "core-entity" => Domain::CoreEntity,
            "feature" => Domain::Feature,
            "ui-component" => Domain::UiComponent,
            "integration" => Domain::Integration,
            "storage" => Domain::Storage,
            "real-time" => Domain::RealTime,
            "notification" => Domain::Notification,
            "search" => Domain::Search,
            "analytics" => Domain::Analytics,
            "admin" => Domain::Admin,
            "ui-role" => Domain::UiRole,
            "offline" => Domain::Offline,
            "polish" => Domain::Polish,
            other => return Err(format!("unknown domain: {other}")),
        };
        Ok(domain)
    }
}

/// One user-stated capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Stable identifier
    pub id: String,
    /// Short name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// User priority
    #[serde(default)]
    pub priority: Priority,
}

impl Feature {
    /// Create new feature
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Feature plus derived planning metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureClassification {
    /// Original feature name
    pub name: String,
    /// Original description
    pub description: String,
    /// User priority
    pub priority: Priority,
    /// Single owning domain
    pub domain: Domain,
    /// Complexity tier
    pub complexity: Complexity,
    /// Estimated generation cost
    pub token_estimate: u32,
    /// Must occupy a dedicated phase
    pub requires_own_phase: bool,
    /// Name used when the feature gets its own phase
    pub suggested_phase_name: String,
    /// Names of phases this feature relies on
    pub dependency_names: Vec<String>,
    /// Terms that drove the classification
    pub keywords: Vec<String>,
}

/// Technical requirement flags of a concept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalRequirements {
    pub needs_auth: bool,
    pub needs_database: bool,
    pub needs_realtime: bool,
    pub needs_file_upload: bool,
    pub needs_api: bool,
    pub needs_i18n: bool,
    pub needs_offline: bool,
    pub needs_caching: bool,
    pub needs_state_history: bool,
    pub needs_context_persistence: bool,
}

/// User role and what it may do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Field of a data model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}

/// Named data model with typed fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<DataField>,
}

/// UI preferences captured alongside the concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPreferences {
    pub style: Option<String>,
    pub color_scheme: Option<String>,
    pub layout: Option<String>,
}

/// Layout design artifact (opaque to planning beyond its presence)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutDesign {
    pub name: Option<String>,
    pub notes: Option<String>,
    /// Raw design payload
    pub global_styles: Option<serde_json::Value>,
}

/// Layout manifest with detected feature tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutManifest {
    pub detected_features: Vec<String>,
}

/// Planning input: the application to be generated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConcept {
    pub name: String,
    pub description: String,
    pub purpose: String,
    pub target_users: String,
    pub features: Vec<Feature>,
    pub technical: TechnicalRequirements,
    pub ui_preferences: Option<UiPreferences>,
    pub roles: Option<Vec<Role>>,
    pub data_models: Option<Vec<DataModel>>,
    pub conversation_context: Option<String>,
    pub layout_design: Option<LayoutDesign>,
    pub layout_manifest: Option<LayoutManifest>,
}

impl AppConcept {
    /// Create concept with name and description
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// With feature
    #[inline]
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// With technical requirements
    #[inline]
    #[must_use]
    pub fn with_technical(mut self, technical: TechnicalRequirements) -> Self {
        self.technical = technical;
        self
    }

    /// With roles
    #[inline]
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = Some(roles);
        self
    }

    /// With data models
    #[inline]
    #[must_use]
    pub fn with_data_models(mut self, models: Vec<DataModel>) -> Self {
        self.data_models = Some(models);
        self
    }

    /// With conversation transcript
    #[inline]
    #[must_use]
    pub fn with_conversation(mut self, transcript: impl Into<String>) -> Self {
        self.conversation_context = Some(transcript.into());
        self
    }

    /// With layout design artifact
    #[inline]
    #[must_use]
    pub fn with_layout_design(mut self, design: LayoutDesign) -> Self {
        self.layout_design = Some(design);
        self
    }

    /// With layout manifest
    #[inline]
    #[must_use]
    pub fn with_layout_manifest(mut self, manifest: LayoutManifest) -> Self {
        self.layout_manifest = Some(manifest);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_high_first() {
        let mut priorities = vec![Priority::Low, Priority::High, Priority::Medium];
        priorities.sort();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn complexity_orders_simple_first() {
        assert!(Complexity::Simple < Complexity::Moderate);
        assert!(Complexity::Moderate < Complexity::Complex);
    }

    #[test]
    fn domain_round_trips_through_str() {
        for domain in Domain::PRIORITY_ORDER {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert!("unknown".parse::<Domain>().is_err());
    }

    #[test]
    fn domain_serializes_kebab_case() {
        let json = serde_json::to_string(&Domain::UiComponent).unwrap();
        assert_eq!(json, "\"ui-component\"");
    }

    #[test]
    fn concept_deserializes_with_defaults() {
        let json = r#"{
            "name": "Recipes",
            "features": [{"id": "f1", "name": "Browse", "priority": "high"}],
            "technical": {"needsDatabase": true}
        }"#;
        let concept: AppConcept = serde_json::from_str(json).unwrap();
        assert_eq!(concept.features.len(), 1);
        assert_eq!(concept.features[0].description, "");
        assert!(concept.technical.needs_database);
        assert!(!concept.technical.needs_auth);
        assert!(concept.layout_design.is_none());
    }
}
