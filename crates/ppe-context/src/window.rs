//! Bounded context window
//!
//! Selects previously generated files for the next phase's prompt. Files are
//! taken in descending importance and appended as
//!
//! ```text
//! // File: <path>
//! <content>
//!
//! ```
//!
//! while they fit under the ceiling. A high-importance file that does not fit
//! is truncated into the remaining space instead of being dropped, and
//! selection stops there. Sizes are measured in bytes, so the output length
//! never exceeds `max_chars`.

use crate::delimited::GeneratedFile;
use crate::importance;
use ppe_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Appended after a truncated file's content
pub const TRUNCATION_MARKER: &str = "\n// ... (truncated)";

/// Context window configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextConfig {
    /// Output ceiling in bytes
    pub max_chars: usize,
    /// Remaining space below which no file is truncated in
    pub truncation_floor: usize,
    /// Score at or above which a file is truncated rather than skipped
    pub high_importance: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_chars: 24_000,
            truncation_floor: 500,
            high_importance: 0.8,
        }
    }
}

impl ContextConfig {
    /// With output ceiling
    #[inline]
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// With truncation floor
    #[inline]
    #[must_use]
    pub fn with_truncation_floor(mut self, floor: usize) -> Self {
        self.truncation_floor = floor;
        self
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a zero ceiling or a threshold
    /// outside `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars == 0 {
            return Err(ConfigError::invalid("maxChars", "must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.high_importance) {
            return Err(ConfigError::invalid("highImportance", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// A file paired with its importance
#[derive(Debug, Clone, Copy)]
pub struct ScoredFile<'a> {
    pub file: &'a GeneratedFile,
    pub score: f64,
}

/// How a file ended up in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    Full,
    Truncated,
    Omitted,
}

/// Per-file selection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub path: String,
    pub score: f64,
    pub inclusion: Inclusion,
}

/// Rendered window plus what went into it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWindow {
    pub text: String,
    /// Every candidate in selection order
    pub files: Vec<SelectedFile>,
}

impl ContextWindow {
    /// Paths that made it into the text
    pub fn included(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|f| f.inclusion != Inclusion::Omitted)
            .map(|f| f.path.as_str())
    }
}

/// Context window builder
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextWindowBuilder {
    config: ContextConfig,
}

impl ContextWindowBuilder {
    /// Create builder with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Build context text for files, scoring each one
    #[must_use]
    pub fn build_context(&self, files: &[GeneratedFile]) -> String {
        self.select(
            files
                .iter()
                .map(|file| ScoredFile {
                    score: importance::score(&file.path, &file.content),
                    file,
                })
                .collect(),
        )
        .text
    }

    /// Select from pre-scored files
    ///
    /// Ordering is by score descending, then path ascending.
    #[must_use]
    pub fn select(&self, mut candidates: Vec<ScoredFile<'_>>) -> ContextWindow {
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.file.path.cmp(&b.file.path))
        });

        let max = self.config.max_chars;
        let mut window = ContextWindow::default();
        let mut stopped = false;

        for candidate in candidates {
            let path = &candidate.file.path;
            let inclusion = if stopped {
                Inclusion::Omitted
            } else {
                let header = format!("// File: {path}\n");
                let content = &candidate.file.content;
                let remaining = max - window.text.len();
                let block_len = header.len() + content.len() + 2;

                if block_len <= remaining {
                    window.text.push_str(&header);
                    window.text.push_str(content);
                    window.text.push_str("\n\n");
                    Inclusion::Full
                } else if candidate.score >= self.config.high_importance
                    && (remaining > self.config.truncation_floor || window.text.is_empty())
                {
                    stopped = true;
                    match truncated_block(&header, content, remaining) {
                        Some(block) => {
                            window.text.push_str(&block);
                            Inclusion::Truncated
                        }
                        None => Inclusion::Omitted,
                    }
                } else {
                    Inclusion::Omitted
                }
            };

            window.files.push(SelectedFile {
                path: path.clone(),
                score: candidate.score,
                inclusion,
            });
        }

        tracing::debug!(
            bytes = window.text.len(),
            max,
            included = window.included().count(),
            candidates = window.files.len(),
            "built context window"
        );
        window
    }
}

/// Header, content prefix, marker and separator within `remaining` bytes
fn truncated_block(header: &str, content: &str, remaining: usize) -> Option<String> {
    let overhead = header.len() + TRUNCATION_MARKER.len() + 2;
    let budget = remaining.checked_sub(overhead).filter(|b| *b > 0)?;

    let mut end = budget.min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }

    Some(format!("{header}{}{TRUNCATION_MARKER}\n\n", &content[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scored(file: &GeneratedFile, score: f64) -> ScoredFile<'_> {
        ScoredFile { file, score }
    }

    #[test]
    fn includes_everything_under_ceiling() {
        let a = GeneratedFile::new("a.ts", "A");
        let b = GeneratedFile::new("b.ts", "B");
        let window = ContextWindowBuilder::default().select(vec![scored(&a, 0.5), scored(&b, 0.9)]);
        assert_eq!(window.text, "// File: b.ts\nB\n\n// File: a.ts\nA\n\n");
        assert_eq!(window.included().collect::<Vec<_>>(), vec!["b.ts", "a.ts"]);
    }

    #[test]
    fn ties_break_by_path() {
        let a = GeneratedFile::new("z.ts", "Z");
        let b = GeneratedFile::new("m.ts", "M");
        let window = ContextWindowBuilder::default().select(vec![scored(&a, 0.5), scored(&b, 0.5)]);
        assert!(window.text.starts_with("// File: m.ts"));
    }

    #[test]
    fn skips_low_importance_that_does_not_fit() {
        let big = GeneratedFile::new("big.ts", "x".repeat(100));
        let small = GeneratedFile::new("small.ts", "y");
        let builder = ContextWindowBuilder::new(ContextConfig::default().with_max_chars(60));
        let window = builder.select(vec![scored(&big, 0.6), scored(&small, 0.5)]);

        assert_eq!(window.text, "// File: small.ts\ny\n\n");
        assert_eq!(window.files[0].inclusion, Inclusion::Omitted);
        assert_eq!(window.files[1].inclusion, Inclusion::Full);
    }

    #[test]
    fn truncates_high_importance_and_stops() {
        let types = GeneratedFile::new("types.ts", "t".repeat(1000));
        let after = GeneratedFile::new("after.ts", "a");
        let builder = ContextWindowBuilder::new(
            ContextConfig::default().with_max_chars(200).with_truncation_floor(50),
        );
        let window = builder.select(vec![scored(&types, 0.9), scored(&after, 0.5)]);

        assert_eq!(window.text.len(), 200);
        assert!(window.text.starts_with("// File: types.ts\nttt"));
        assert!(window.text.ends_with("(truncated)\n\n"));
        assert_eq!(window.files[0].inclusion, Inclusion::Truncated);
        assert_eq!(window.files[1].inclusion, Inclusion::Omitted);
    }

    #[test]
    fn respects_truncation_floor_once_something_is_selected() {
        let first = GeneratedFile::new("first.ts", "f".repeat(150));
        let second = GeneratedFile::new("second.ts", "s".repeat(500));
        let builder = ContextWindowBuilder::new(
            ContextConfig::default().with_max_chars(200).with_truncation_floor(100),
        );
        let window = builder.select(vec![scored(&first, 0.95), scored(&second, 0.9)]);
        assert_eq!(window.files[1].inclusion, Inclusion::Omitted);
        assert!(window.text.len() <= 200);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let file = GeneratedFile::new("é.ts", "é".repeat(200));
        let builder = ContextWindowBuilder::new(ContextConfig::default().with_max_chars(64));
        let text = builder.select(vec![scored(&file, 1.0)]).text;
        assert!(text.len() <= 64);
        assert!(text.contains('é'));
    }

    #[test]
    fn build_context_scores_files() {
        let test = GeneratedFile::new("src/a.test.ts", "T");
        let types = GeneratedFile::new("src/types/a.ts", "export type A = 1;");
        let text = ContextWindowBuilder::default().build_context(&[test, types]);
        assert!(text.starts_with("// File: src/types/a.ts"));
    }

    #[test]
    fn config_validation() {
        assert!(ContextConfig::default().validate().is_ok());
        assert!(ContextConfig::default().with_max_chars(0).validate().is_err());
    }
}
