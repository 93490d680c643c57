//! Phase building
//!
//! Assembles the ordered phase sequence:
//!
//! ```text
//! Setup → [Design System] → [Database] → [Auth] → domain phases… → Polish
//! ```
//!
//! Domain phases follow [`Domain::PRIORITY_ORDER`]; each domain's features are
//! bin-packed into sub-phases under the token and feature budgets.

use crate::grouping::DomainGroups;
use ppe_core::{
    AppConcept, ConceptContext, Domain, DynamicPhase, FeatureClassification, PlannerConfig,
};

/// Features that will be generated together in one sub-phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureBatch {
    /// Phase name for the batch
    pub name: String,
    /// Features in generation order
    pub features: Vec<FeatureClassification>,
}

impl FeatureBatch {
    /// Sum of constituent token estimates
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> u32 {
        self.features.iter().map(|f| f.token_estimate).sum()
    }
}

/// Phase builder
#[derive(Debug, Clone, Copy)]
pub struct PhaseBuilder<'a> {
    config: &'a PlannerConfig,
}

impl<'a> PhaseBuilder<'a> {
    /// Create builder over configuration
    #[inline]
    #[must_use]
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Build the ordered phase list
    ///
    /// Database and auth buckets are consumed by their dedicated phases.
    /// Dependencies are only those hard-wired by structure (design system on
    /// setup, polish on its predecessor); the resolver adds the rest.
    #[must_use]
    pub fn build(&self, grouped: DomainGroups, concept: &AppConcept) -> Vec<DynamicPhase> {
        let mut groups = grouped;
        let mut phases = vec![self.setup_phase(concept)];

        if concept.layout_design.is_some() {
            phases.push(self.design_system_phase(next_number(&phases), concept));
        }

        for domain in [Domain::Database, Domain::Auth] {
            if let Some(features) = groups.shift_remove(&domain) {
                phases.push(self.domain_phase(
                    next_number(&phases),
                    domain.phase_label().to_string(),
                    domain,
                    features,
                    concept,
                ));
            }
        }

        for domain in Domain::PRIORITY_ORDER {
            let Some(features) = groups.shift_remove(&domain) else {
                continue;
            };
            for batch in self.split_features_into_phases(features, domain) {
                phases.push(self.domain_phase(
                    next_number(&phases),
                    batch.name,
                    domain,
                    batch.features,
                    concept,
                ));
            }
        }

        for (domain, features) in &groups {
            tracing::warn!(
                %domain,
                count = features.len(),
                "features in non-plannable domain ignored"
            );
        }

        let polish_number = next_number(&phases);
        phases.push(self.polish_phase(polish_number, concept));

        tracing::debug!(phases = phases.len(), "built phase sequence");
        phases
    }

    /// Greedy bin-packing of one domain's features
    ///
    /// Features are sorted by priority then complexity (stable). A batch is
    /// closed before a feature that would push it past the token budget or
    /// when it already holds the maximum feature count. A single feature is
    /// never split, so a lone oversized feature forms its own batch. Own-phase
    /// features always form their own batch.
    #[must_use]
    pub fn split_features_into_phases(
        &self,
        features: Vec<FeatureClassification>,
        domain: Domain,
    ) -> Vec<FeatureBatch> {
        let mut sorted = features;
        sorted.sort_by_key(|f| (f.priority, f.complexity));

        let mut bins: Vec<Vec<FeatureClassification>> = Vec::new();
        let mut current: Vec<FeatureClassification> = Vec::new();
        let mut current_tokens: u32 = 0;

        for feature in sorted {
            if feature.requires_own_phase {
                if !current.is_empty() {
                    bins.push(std::mem::take(&mut current));
                    current_tokens = 0;
                }
                bins.push(vec![feature]);
                continue;
            }

            let over_tokens = current_tokens.saturating_add(feature.token_estimate)
                > self.config.max_tokens_per_phase;
            let over_count = current.len() >= self.config.max_features_per_phase;
            if !current.is_empty() && (over_tokens || over_count) {
                bins.push(std::mem::take(&mut current));
                current_tokens = 0;
            }

            current_tokens = current_tokens.saturating_add(feature.token_estimate);
            current.push(feature);
        }
        if !current.is_empty() {
            bins.push(current);
        }

        let total = bins.len();
        bins.into_iter()
            .enumerate()
            .map(|(index, features)| {
                let name = match features.as_slice() {
                    [single] => single.suggested_phase_name.clone(),
                    _ if total > 1 => format!("{} (Part {})", domain.phase_label(), index + 1),
                    _ => domain.phase_label().to_string(),
                };
                FeatureBatch { name, features }
            })
            .collect()
    }

    fn setup_phase(&self, concept: &AppConcept) -> DynamicPhase {
        let mut description = format!(
            "Initialize the {} project: folder structure, routing, base layout and styling.",
            display_name(concept)
        );
        if let Some(style) = concept.ui_preferences.as_ref().and_then(|p| p.style.as_deref()) {
            description.push_str(&format!(" Visual style: {style}."));
        }

        let context = ConceptContext {
            ui_preferences: concept.ui_preferences.clone(),
            roles: concept.roles.clone().unwrap_or_default(),
            design_notes: concept.layout_design.as_ref().and_then(|d| d.notes.clone()),
            ..base_context(concept)
        };

        DynamicPhase::new(1, Domain::Setup.phase_label(), description, Domain::Setup)
            .with_tokens(self.config.base_tokens.setup)
            .with_test_criteria(test_criteria(Domain::Setup, &[]))
            .with_context(context)
    }

    fn design_system_phase(&self, number: u32, concept: &AppConcept) -> DynamicPhase {
        let context = ConceptContext {
            ui_preferences: concept.ui_preferences.clone(),
            design_notes: concept.layout_design.as_ref().and_then(|d| d.notes.clone()),
            ..base_context(concept)
        };

        DynamicPhase::new(
            number,
            Domain::DesignSystem.phase_label(),
            "Translate the layout design into design tokens and base components.",
            Domain::DesignSystem,
        )
        .with_tokens(self.config.base_tokens.design_system)
        .depends_on(1)
        .with_test_criteria(test_criteria(Domain::DesignSystem, &[]))
        .with_context(context)
    }

    fn domain_phase(
        &self,
        number: u32,
        name: String,
        domain: Domain,
        features: Vec<FeatureClassification>,
        concept: &AppConcept,
    ) -> DynamicPhase {
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        let description = format!("Implement {}: {}.", domain.phase_label(), names.join(", "));
        let criteria = test_criteria(domain, &names);

        let mut context = base_context(concept);
        match domain {
            Domain::Database | Domain::CoreEntity => {
                context.data_models = concept.data_models.clone().unwrap_or_default();
            }
            Domain::Auth | Domain::Admin | Domain::UiRole => {
                context.roles = concept.roles.clone().unwrap_or_default();
            }
            _ => {}
        }

        DynamicPhase::new(number, name, description, domain)
            .with_features(features)
            .with_test_criteria(criteria)
            .with_context(context)
    }

    fn polish_phase(&self, number: u32, concept: &AppConcept) -> DynamicPhase {
        let mut phase = DynamicPhase::new(
            number,
            Domain::Polish.phase_label(),
            "Final polish: loading and error states, responsiveness, accessibility and README.",
            Domain::Polish,
        )
        .with_tokens(self.config.base_tokens.polish)
        .with_test_criteria(test_criteria(Domain::Polish, &[]))
        .with_context(base_context(concept));

        // Single predecessor only, not every earlier phase.
        if number > 1 {
            phase = phase.depends_on(number - 1);
        }
        phase
    }
}

fn next_number(phases: &[DynamicPhase]) -> u32 {
    u32::try_from(phases.len()).map_or(u32::MAX, |n| n.saturating_add(1))
}

fn display_name(concept: &AppConcept) -> &str {
    if concept.name.trim().is_empty() {
        "application"
    } else {
        concept.name.as_str()
    }
}

fn base_context(concept: &AppConcept) -> ConceptContext {
    ConceptContext {
        purpose: concept.purpose.clone(),
        target_users: concept.target_users.clone(),
        ..ConceptContext::default()
    }
}

fn test_criteria(domain: Domain, features: &[&str]) -> Vec<String> {
    let fixed: &[&str] = match domain {
        Domain::Setup => &[
            "Project installs and starts without errors",
            "Base layout renders on desktop and mobile",
            "Navigation between placeholder pages works",
        ],
        Domain::DesignSystem => &[
            "Design tokens match the layout design",
            "Base components render in every variant",
        ],
        Domain::Database => &[
            "Schema covers every data model",
            "Create, read, update and delete succeed through the data layer",
        ],
        Domain::Auth => &[
            "Users can sign up, log in and log out",
            "Protected routes redirect unauthenticated users",
            "Session survives a page reload",
        ],
        Domain::RealTime => &["Changes appear for other clients without a reload"],
        Domain::Offline => &["Core screens work with the network disabled"],
        Domain::Polish => &[
            "No console errors or warnings",
            "Every page is responsive",
            "Loading and error states are handled",
            "README documents setup and usage",
        ],
        _ => &[],
    };

    fixed
        .iter()
        .map(|c| (*c).to_string())
        .chain(features.iter().map(|name| format!("{name} works as described")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_domain;
    use ppe_core::{Complexity, LayoutDesign, Priority};
    use pretty_assertions::assert_eq;

    fn classification(
        name: &str,
        tokens: u32,
        priority: Priority,
        complexity: Complexity,
    ) -> FeatureClassification {
        FeatureClassification {
            name: name.to_string(),
            description: String::new(),
            priority,
            domain: Domain::Feature,
            complexity,
            token_estimate: tokens,
            requires_own_phase: false,
            suggested_phase_name: name.to_string(),
            dependency_names: Vec::new(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn split_sorts_by_priority_then_complexity() {
        let config = PlannerConfig::default();
        let batches = PhaseBuilder::new(&config).split_features_into_phases(
            vec![
                classification("low", 100, Priority::Low, Complexity::Simple),
                classification("high-complex", 100, Priority::High, Complexity::Complex),
                classification("high-simple", 100, Priority::High, Complexity::Simple),
            ],
            Domain::Feature,
        );
        assert_eq!(batches.len(), 1);
        let order: Vec<_> = batches[0].features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(order, vec!["high-simple", "high-complex", "low"]);
        assert_eq!(batches[0].name, "Core Features");
    }

    #[test]
    fn split_respects_token_budget() {
        let config = PlannerConfig::default().with_max_tokens_per_phase(5000);
        let batches = PhaseBuilder::new(&config).split_features_into_phases(
            (0..4)
                .map(|i| {
                    classification(
                        &format!("f{i}"),
                        2000,
                        Priority::Medium,
                        Complexity::Simple,
                    )
                })
                .collect(),
            Domain::Feature,
        );
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.tokens() <= 5000));
        assert_eq!(batches[0].name, "Core Features (Part 1)");
        assert_eq!(batches[1].name, "Core Features (Part 2)");
    }

    #[test]
    fn split_respects_feature_budget() {
        let config = PlannerConfig::default().with_max_features_per_phase(2);
        let batches = PhaseBuilder::new(&config).split_features_into_phases(
            (0..5)
                .map(|i| classification(&format!("f{i}"), 10, Priority::Medium, Complexity::Simple))
                .collect(),
            Domain::Feature,
        );
        let sizes: Vec<_> = batches.iter().map(|b| b.features.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        // trailing single-feature batch takes the feature's own name
        assert_eq!(batches[2].name, "f4");
    }

    #[test]
    fn oversized_feature_is_never_split() {
        let config = PlannerConfig::default().with_max_tokens_per_phase(1000);
        let batches = PhaseBuilder::new(&config).split_features_into_phases(
            vec![
                classification("small", 500, Priority::High, Complexity::Simple),
                classification("huge", 5000, Priority::Medium, Complexity::Simple),
            ],
            Domain::Feature,
        );
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].tokens(), 5000);
        assert_eq!(batches[1].name, "huge");
    }

    #[test]
    fn own_phase_feature_is_isolated() {
        let config = PlannerConfig::default();
        let mut isolated = classification(
            "Undo/Redo History",
            3000,
            Priority::High,
            Complexity::Complex,
        );
        isolated.requires_own_phase = true;
        let batches = PhaseBuilder::new(&config).split_features_into_phases(
            vec![
                classification("a", 100, Priority::High, Complexity::Simple),
                isolated,
                classification("b", 100, Priority::Low, Complexity::Simple),
            ],
            Domain::Feature,
        );
        let names: Vec<_> = batches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["a", "Undo/Redo History", "b"]);
    }

    #[test]
    fn empty_plan_has_setup_and_polish() {
        let config = PlannerConfig::default();
        let concept = AppConcept::new("Empty", "nothing");
        let phases = PhaseBuilder::new(&config).build(DomainGroups::new(), &concept);

        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].name, "Project Setup");
        assert!(phases[0].dependencies.is_empty());
        assert_eq!(phases[1].domain, Domain::Polish);
        assert_eq!(phases[1].dependencies, vec![1]);
    }

    #[test]
    fn fixed_phases_in_order() {
        let config = PlannerConfig::default();
        let concept = AppConcept::new("Shop", "a shop").with_layout_design(LayoutDesign::default());

        let mut db = classification("Database Setup", 3000, Priority::High, Complexity::Complex);
        db.domain = Domain::Database;
        let mut auth = classification(
            "Authentication System",
            4000,
            Priority::High,
            Complexity::Complex,
        );
        auth.domain = Domain::Auth;
        let mut search = classification("Filters", 2000, Priority::Medium, Complexity::Moderate);
        search.domain = Domain::Search;
        let feature = classification("Wishlist", 1500, Priority::Medium, Complexity::Simple);

        // insertion order deliberately scrambled
        let groups = group_by_domain(vec![search, auth, feature, db]);
        let phases = PhaseBuilder::new(&config).build(groups, &concept);

        let names: Vec<_> = phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Project Setup",
                "Design System",
                "Database Schema",
                "Authentication System",
                "Wishlist",
                "Filters",
                "Polish & Documentation",
            ]
        );
        let numbers: Vec<_> = phases.iter().map(|p| p.phase_number).collect();
        assert_eq!(numbers, (1..=7).collect::<Vec<_>>());
        assert_eq!(phases[1].dependencies, vec![1]);
        assert_eq!(phases[6].dependencies, vec![6]);
    }

    #[test]
    fn build_is_deterministic() {
        let config = PlannerConfig::default();
        let concept = AppConcept::new("Notes", "notes app");
        let features: Vec<_> = (0..9)
            .map(|i| {
                classification(
                    &format!("f{i}"),
                    1200 + i * 300,
                    Priority::Medium,
                    Complexity::Simple,
                )
            })
            .collect();
        let builder = PhaseBuilder::new(&config);
        let a = builder.build(group_by_domain(features.clone()), &concept);
        let b = builder.build(group_by_domain(features), &concept);
        assert_eq!(a, b);
    }

    #[test]
    fn domain_phase_carries_criteria_and_tokens() {
        let config = PlannerConfig::default();
        let concept = AppConcept::new("Notes", "notes app");
        let groups = group_by_domain(vec![
            classification("Tags", 1000, Priority::Medium, Complexity::Simple),
            classification("Pins", 1500, Priority::Medium, Complexity::Simple),
        ]);
        let phases = PhaseBuilder::new(&config).build(groups, &concept);
        let features = &phases[1];
        assert_eq!(features.estimated_tokens, 2500);
        assert_eq!(features.features, vec!["Tags", "Pins"]);
        assert!(features.test_criteria.contains(&"Pins works as described".to_string()));
    }
}
