//! Feature classification
//!
//! Turns free-text features and technical flags into
//! [`FeatureClassification`] records. Matching is table driven: the complex
//! pattern table is tried first, then the moderate table, and anything left
//! over becomes a simple `feature`-domain classification.

use once_cell::sync::Lazy;
use ppe_core::{
    Complexity, Domain, Feature, FeatureClassification, PlannerConfig, Priority,
    TechnicalRequirements,
};
use regex::Regex;

/// One row of a pattern table
#[derive(Debug)]
struct PatternRow {
    pattern: &'static str,
    domain: Domain,
    tokens: u32,
    own_phase: bool,
    phase_name: &'static str,
}

const COMPLEX_ROWS: &[PatternRow] = &[
    PatternRow {
        pattern: r"\b(auth|authentication|log ?in|sign[ -]?in|sign[ -]?up|registration|oauth|sso|password)\b",
        domain: Domain::Auth,
        tokens: 4000,
        own_phase: true,
        phase_name: "Authentication System",
    },
    PatternRow {
        pattern: r"\b(payments?|stripe|checkout|subscriptions?|billing|invoices?)\b",
        domain: Domain::Integration,
        tokens: 4500,
        own_phase: true,
        phase_name: "Payment Integration",
    },
    PatternRow {
        pattern: r"\b(real[- ]?time|websockets?|live updates?|collaborat\w*|chat|messaging)\b",
        domain: Domain::RealTime,
        tokens: 4000,
        own_phase: true,
        phase_name: "Real-time Features",
    },
    PatternRow {
        pattern: r"\b(uploads?|file storage|attachments?|media library)\b",
        domain: Domain::Storage,
        tokens: 3500,
        own_phase: true,
        phase_name: "File Storage",
    },
    PatternRow {
        pattern: r"\b(analytics|reports?|reporting|metrics|insights)\b",
        domain: Domain::Analytics,
        tokens: 4000,
        own_phase: true,
        phase_name: "Analytics Dashboard",
    },
    PatternRow {
        pattern: r"\b(admin\w*|moderation|moderators?|back[- ]?office)\b",
        domain: Domain::Admin,
        tokens: 4000,
        own_phase: true,
        phase_name: "Admin Panel",
    },
    PatternRow {
        pattern: r"\b(notifications?|push alerts?|email alerts?|reminders?)\b",
        domain: Domain::Notification,
        tokens: 3000,
        own_phase: true,
        phase_name: "Notification System",
    },
    PatternRow {
        pattern: r"\b(full[- ]?text search|search engine|advanced search|semantic search)\b",
        domain: Domain::Search,
        tokens: 3500,
        own_phase: true,
        phase_name: "Search System",
    },
    PatternRow {
        pattern: r"\b(offline|service workers?|pwa|background sync)\b",
        domain: Domain::Offline,
        tokens: 4000,
        own_phase: true,
        phase_name: "Offline Support",
    },
    PatternRow {
        pattern: r"\b(third[- ]party|external apis?|webhooks?|integrations? with)\b",
        domain: Domain::Integration,
        tokens: 3500,
        own_phase: false,
        phase_name: "API Integration",
    },
    PatternRow {
        pattern: r"\b(database|data models?|schemas?|migrations?)\b",
        domain: Domain::Database,
        tokens: 3000,
        own_phase: true,
        phase_name: "Database Setup",
    },
];

const MODERATE_ROWS: &[PatternRow] = &[
    PatternRow {
        pattern: r"\b(crud|create|edit|update|delete|manage|management)\b",
        domain: Domain::CoreEntity,
        tokens: 2500,
        own_phase: false,
        phase_name: "Data Management",
    },
    PatternRow {
        pattern: r"\b(forms?|validation|wizard|multi[- ]step)\b",
        domain: Domain::Feature,
        tokens: 2500,
        own_phase: false,
        phase_name: "Forms & Validation",
    },
    PatternRow {
        pattern: r"\b(search|filter\w*|sort\w*|pagination)\b",
        domain: Domain::Search,
        tokens: 2000,
        own_phase: false,
        phase_name: "Search & Filtering",
    },
    PatternRow {
        pattern: r"\b(profiles?|settings|preferences)\b",
        domain: Domain::Feature,
        tokens: 2000,
        own_phase: false,
        phase_name: "User Settings",
    },
    PatternRow {
        pattern: r"\b(charts?|graphs?|visuali[sz]ations?|dashboards?)\b",
        domain: Domain::UiComponent,
        tokens: 2500,
        own_phase: false,
        phase_name: "Data Visualization",
    },
    PatternRow {
        pattern: r"\b(modals?|dialogs?|drag[- ]and[- ]drop|animations?|dark mode|themes?|responsive)\b",
        domain: Domain::UiComponent,
        tokens: 2000,
        own_phase: false,
        phase_name: "UI Components",
    },
    PatternRow {
        pattern: r"\b(export|import|csv|pdf)\b",
        domain: Domain::Feature,
        tokens: 2500,
        own_phase: false,
        phase_name: "Import & Export",
    },
    PatternRow {
        pattern: r"\b(calendar|schedul\w*|booking|appointments?)\b",
        domain: Domain::Feature,
        tokens: 2500,
        own_phase: false,
        phase_name: "Scheduling",
    },
    PatternRow {
        pattern: r"\b(roles?|permissions?)\b",
        domain: Domain::UiRole,
        tokens: 2500,
        own_phase: false,
        phase_name: "Role-based Views",
    },
];

fn compile(rows: &'static [PatternRow]) -> Vec<(Regex, &'static PatternRow)> {
    rows.iter()
        .filter_map(|row| match Regex::new(&format!("(?i){}", row.pattern)) {
            Ok(regex) => Some((regex, row)),
            Err(e) => {
                tracing::error!(pattern = row.pattern, error = %e, "invalid classifier pattern");
                None
            }
        })
        .collect()
}

static COMPLEX_PATTERNS: Lazy<Vec<(Regex, &'static PatternRow)>> =
    Lazy::new(|| compile(COMPLEX_ROWS));
static MODERATE_PATTERNS: Lazy<Vec<(Regex, &'static PatternRow)>> =
    Lazy::new(|| compile(MODERATE_ROWS));

/// Substring rules mapping description terms to the phase a feature needs
const DEPENDENCY_RULES: &[(&[&str], &str)] = &[
    (&["user", "account", "profile"], "Authentication System"),
    (&["save", "store", "persist", "history"], "Database Setup"),
    (&["image", "photo", "file", "upload"], "File Storage"),
];

/// Static shape of a feature implied by a flag or a detected layout tag
#[derive(Debug, Clone, Copy)]
pub struct ImplicitFeature {
    pub name: &'static str,
    pub description: &'static str,
    pub domain: Domain,
    pub tokens: u32,
    pub own_phase: bool,
}

impl ImplicitFeature {
    /// Lowercase words of the name, so "API Integration" yields `api`, `integration`
    fn keywords(&self) -> Vec<String> {
        self.name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn classification(&self) -> FeatureClassification {
        FeatureClassification {
            name: self.name.to_string(),
            description: self.description.to_string(),
            priority: Priority::High,
            domain: self.domain,
            complexity: if self.own_phase {
                Complexity::Complex
            } else {
                Complexity::Moderate
            },
            token_estimate: self.tokens,
            requires_own_phase: self.own_phase,
            suggested_phase_name: self.name.to_string(),
            dependency_names: Vec::new(),
            keywords: self.keywords(),
        }
    }
}

const AUTH: ImplicitFeature = ImplicitFeature {
    name: "Authentication System",
    description: "User registration, login, logout and session handling",
    domain: Domain::Auth,
    tokens: 4000,
    own_phase: true,
};
const DATABASE: ImplicitFeature = ImplicitFeature {
    name: "Database Setup",
    description: "Schema, data access layer and seed data",
    domain: Domain::Database,
    tokens: 3000,
    own_phase: true,
};
const REALTIME: ImplicitFeature = ImplicitFeature {
    name: "Real-time Features",
    description: "Live updates pushed to connected clients",
    domain: Domain::RealTime,
    tokens: 4000,
    own_phase: true,
};
const FILE_STORAGE: ImplicitFeature = ImplicitFeature {
    name: "File Storage",
    description: "File upload, storage and retrieval",
    domain: Domain::Storage,
    tokens: 3500,
    own_phase: true,
};
const API: ImplicitFeature = ImplicitFeature {
    name: "API Integration",
    description: "API routes and external service clients",
    domain: Domain::Integration,
    tokens: 3500,
    own_phase: false,
};
const I18N: ImplicitFeature = ImplicitFeature {
    name: "Internationalization",
    description: "Translatable strings and locale switching",
    domain: Domain::Feature,
    tokens: 2500,
    own_phase: false,
};
const OFFLINE: ImplicitFeature = ImplicitFeature {
    name: "Offline Support",
    description: "Local persistence and sync when connectivity returns",
    domain: Domain::Offline,
    tokens: 4000,
    own_phase: true,
};
const CACHING: ImplicitFeature = ImplicitFeature {
    name: "Caching Layer",
    description: "Client and server caching of expensive reads",
    domain: Domain::Integration,
    tokens: 2000,
    own_phase: false,
};
const STATE_HISTORY: ImplicitFeature = ImplicitFeature {
    name: "Undo/Redo History",
    description: "State history with undo and redo",
    domain: Domain::Feature,
    tokens: 3000,
    own_phase: true,
};
const CONTEXT_PERSISTENCE: ImplicitFeature = ImplicitFeature {
    name: "Context Persistence",
    description: "Persist application state across sessions",
    domain: Domain::Storage,
    tokens: 2500,
    own_phase: false,
};
const SEARCH: ImplicitFeature = ImplicitFeature {
    name: "Search System",
    description: "Search across application content",
    domain: Domain::Search,
    tokens: 3500,
    own_phase: true,
};
const NOTIFICATIONS: ImplicitFeature = ImplicitFeature {
    name: "Notification System",
    description: "In-app and email notifications",
    domain: Domain::Notification,
    tokens: 3000,
    own_phase: true,
};
const PAYMENTS: ImplicitFeature = ImplicitFeature {
    name: "Payment Integration",
    description: "Checkout and payment provider integration",
    domain: Domain::Integration,
    tokens: 4500,
    own_phase: true,
};
const ANALYTICS: ImplicitFeature = ImplicitFeature {
    name: "Analytics Dashboard",
    description: "Charts and reports over application data",
    domain: Domain::Analytics,
    tokens: 4000,
    own_phase: true,
};
const THEMING: ImplicitFeature = ImplicitFeature {
    name: "Theme Support",
    description: "Light and dark theme switching",
    domain: Domain::UiComponent,
    tokens: 1500,
    own_phase: false,
};

/// Layout-manifest tags (normalised: lowercase, alphanumeric only)
const DETECTED_FEATURE_TAGS: &[(&str, ImplicitFeature)] = &[
    ("authentication", AUTH),
    ("auth", AUTH),
    ("login", AUTH),
    ("fileupload", FILE_STORAGE),
    ("upload", FILE_STORAGE),
    ("realtime", REALTIME),
    ("chat", REALTIME),
    ("search", SEARCH),
    ("notifications", NOTIFICATIONS),
    ("payments", PAYMENTS),
    ("checkout", PAYMENTS),
    ("analytics", ANALYTICS),
    ("charts", ANALYTICS),
    ("database", DATABASE),
    ("offline", OFFLINE),
    ("darkmode", THEMING),
    ("themetoggle", THEMING),
    ("i18n", I18N),
];

/// Feature classifier
///
/// Holds nothing but the shared configuration, so classification is pure.
#[derive(Debug, Clone, Copy)]
pub struct FeatureClassifier<'a> {
    config: &'a PlannerConfig,
}

impl<'a> FeatureClassifier<'a> {
    /// Create classifier over configuration
    #[inline]
    #[must_use]
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Classify a single feature
    #[must_use]
    pub fn classify(&self, feature: &Feature) -> FeatureClassification {
        let text = format!("{} {}", feature.name, feature.description);

        let matched = find_row(&COMPLEX_PATTERNS, &text)
            .map(|hit| (hit, Complexity::Complex))
            .or_else(|| find_row(&MODERATE_PATTERNS, &text).map(|hit| (hit, Complexity::Moderate)));

        let mut classification = match matched {
            Some(((row, keywords), complexity)) => FeatureClassification {
                name: feature.name.clone(),
                description: feature.description.clone(),
                priority: feature.priority,
                domain: row.domain,
                complexity,
                token_estimate: row.tokens,
                requires_own_phase: row.own_phase,
                suggested_phase_name: if complexity == Complexity::Complex {
                    row.phase_name.to_string()
                } else {
                    feature.name.clone()
                },
                dependency_names: Vec::new(),
                keywords,
            },
            None => FeatureClassification {
                name: feature.name.clone(),
                description: feature.description.clone(),
                priority: feature.priority,
                domain: Domain::Feature,
                complexity: Complexity::Simple,
                token_estimate: self.config.base_tokens.simple_feature,
                requires_own_phase: false,
                suggested_phase_name: feature.name.clone(),
                dependency_names: Vec::new(),
                keywords: name_keywords(&feature.name),
            },
        };

        classification.dependency_names =
            infer_dependencies(&feature.description, &classification.suggested_phase_name);

        tracing::debug!(
            feature = %feature.name,
            domain = %classification.domain,
            complexity = ?classification.complexity,
            tokens = classification.token_estimate,
            "classified feature"
        );
        classification
    }

    /// Classify every feature in order
    #[must_use]
    pub fn classify_all(&self, features: &[Feature]) -> Vec<FeatureClassification> {
        features.iter().map(|f| self.classify(f)).collect()
    }

    /// Synthesize one classification per true technical flag
    #[must_use]
    pub fn classify_requirements(
        &self,
        technical: &TechnicalRequirements,
    ) -> Vec<FeatureClassification> {
        let flags: [(bool, &ImplicitFeature); 10] = [
            (technical.needs_auth, &AUTH),
            (technical.needs_database, &DATABASE),
            (technical.needs_realtime, &REALTIME),
            (technical.needs_file_upload, &FILE_STORAGE),
            (technical.needs_api, &API),
            (technical.needs_i18n, &I18N),
            (technical.needs_offline, &OFFLINE),
            (technical.needs_caching, &CACHING),
            (technical.needs_state_history, &STATE_HISTORY),
            (technical.needs_context_persistence, &CONTEXT_PERSISTENCE),
        ];

        flags
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, implicit)| implicit.classification())
            .collect()
    }

    /// Synthesize classifications from layout-manifest feature tags
    ///
    /// Unknown tags are ignored; repeated tags yield repeated classifications,
    /// which the grouper collapses.
    #[must_use]
    pub fn classify_detected_features(&self, tags: &[String]) -> Vec<FeatureClassification> {
        tags.iter()
            .filter_map(|tag| {
                let normalized: String = tag
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect::<String>()
                    .to_ascii_lowercase();
                DETECTED_FEATURE_TAGS
                    .iter()
                    .find(|(known, _)| *known == normalized)
                    .map(|(_, implicit)| implicit.classification())
            })
            .collect()
    }
}

/// First matching row plus the distinct terms it matched
fn find_row(
    patterns: &[(Regex, &'static PatternRow)],
    text: &str,
) -> Option<(&'static PatternRow, Vec<String>)> {
    patterns.iter().find_map(|(regex, row)| {
        let mut keywords: Vec<String> = Vec::new();
        for m in regex.find_iter(text) {
            let term = m.as_str().to_lowercase();
            if !keywords.contains(&term) {
                keywords.push(term);
            }
        }
        (!keywords.is_empty()).then_some((*row, keywords))
    })
}

fn name_keywords(name: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    for word in name.split(|c: char| !c.is_alphanumeric()) {
        let word = word.to_lowercase();
        if word.chars().count() > 3 && !keywords.contains(&word) {
            keywords.push(word);
        }
    }
    keywords
}

fn infer_dependencies(description: &str, own_phase_name: &str) -> Vec<String> {
    let description = description.to_lowercase();
    DEPENDENCY_RULES
        .iter()
        .filter(|(terms, target)| {
            *target != own_phase_name && terms.iter().any(|t| description.contains(t))
        })
        .map(|(_, target)| (*target).to_string())
        .collect()
}
