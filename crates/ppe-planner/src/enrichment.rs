//! Conversation enrichment
//!
//! Picks the paragraphs of the requirements conversation most relevant to a
//! phase's domain. Scoring is plain case-insensitive keyword counting.

use ppe_core::{Domain, PlannerConfig};

/// Paragraphs shorter than this carry no useful context
const MIN_PARAGRAPH_CHARS: usize = 20;

fn domain_keywords(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Setup => &[
            "app",
            "project",
            "platform",
            "stack",
            "framework",
            "mobile",
            "desktop",
            "web",
        ],
        Domain::DesignSystem => &[
            "design", "color", "colour", "font", "theme", "style", "layout", "brand", "look",
        ],
        Domain::Database => &[
            "data", "store", "save", "database", "record", "table", "model", "persist",
        ],
        Domain::Auth => &[
            "login", "log in", "sign up", "signup", "password", "account", "user", "auth",
            "session",
        ],
        Domain::CoreEntity => &["create", "edit", "delete", "manage", "list", "item", "record"],
        Domain::Feature => &["feature", "able to", "should", "want", "need", "allow"],
        Domain::UiComponent => &[
            "screen",
            "page",
            "button",
            "modal",
            "dashboard",
            "chart",
            "view",
            "component",
        ],
        Domain::Integration => &[
            "api",
            "integrate",
            "integration",
            "payment",
            "stripe",
            "webhook",
            "third-party",
            "service",
        ],
        Domain::Storage => &[
            "upload",
            "file",
            "image",
            "photo",
            "attachment",
            "document",
            "storage",
        ],
        Domain::RealTime => &[
            "real-time",
            "realtime",
            "live",
            "chat",
            "instant",
            "sync",
            "collaborat",
        ],
        Domain::Notification => &["notify", "notification", "alert", "email", "push", "remind"],
        Domain::Search => &["search", "filter", "sort", "find", "query"],
        Domain::Analytics => &[
            "analytics",
            "report",
            "metric",
            "chart",
            "statistic",
            "insight",
            "track",
        ],
        Domain::Admin => &[
            "admin",
            "moderate",
            "manage users",
            "permission",
            "role",
            "back office",
        ],
        Domain::UiRole => &["role", "permission", "manager", "viewer", "editor", "access"],
        Domain::Offline => &["offline", "no connection", "cache", "sync", "airplane"],
        Domain::Polish => &[
            "polish",
            "accessib",
            "responsive",
            "performance",
            "animation",
            "loading",
        ],
    }
}

/// Conversation extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextEnricher {
    top_k: usize,
    max_chars: usize,
}

impl Default for ContextEnricher {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_chars: 3000,
        }
    }
}

impl ContextEnricher {
    /// Create enricher with the configured paragraph count and ceiling
    #[inline]
    #[must_use]
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            top_k: config.enrichment_top_k,
            max_chars: config.enrichment_max_chars,
        }
    }

    /// With paragraph count
    #[inline]
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// With character ceiling
    #[inline]
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Extract the domain-relevant part of `text`
    ///
    /// Paragraphs are scored by keyword hits, ties keep their original order.
    /// Zero-score paragraphs are dropped. An extract over the ceiling is cut
    /// at the ceiling and gets a note with the number of omitted characters.
    #[must_use]
    pub fn extract(&self, text: &str, domain: Domain) -> String {
        let keywords = domain_keywords(domain);

        let mut scored: Vec<(usize, &str)> = split_paragraphs(text)
            .into_iter()
            .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
            .map(|p| (score(p, keywords), p))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let joined = scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, p)| p)
            .collect::<Vec<_>>()
            .join("\n\n");

        let total = joined.chars().count();
        if total <= self.max_chars {
            return joined;
        }

        let cut: String = joined.chars().take(self.max_chars).collect();
        tracing::debug!(
            %domain,
            omitted = total - self.max_chars,
            "truncated conversation extract"
        );
        format!("{cut}\n\n[NOTE: {} characters omitted]", total - self.max_chars)
    }
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(text[s..end].trim());
            }
        } else {
            if start.is_none() {
                start = Some(offset);
            }
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        paragraphs.push(text[s..end].trim());
    }

    paragraphs
}

fn score(paragraph: &str, keywords: &[&str]) -> usize {
    let lower = paragraph.to_lowercase();
    keywords.iter().map(|k| lower.matches(k).count()).sum()
}
