//! Delimited generated-output grammar
//!
//! Code generation returns plain text of the form:
//!
//! ```text
//! ===FILE:src/app.ts===
//! <content, any number of lines>
//! ===FILE:src/other.ts===
//! <content>
//! ===DEPENDENCIES===
//! {"react": "^18.2.0"}
//! ===END===
//! ```
//!
//! A block runs until the next marker line or the end of input. The newline
//! that precedes the next marker belongs to the grammar, not to the content,
//! so [`render`] and [`parse_generated_output`] round-trip exactly.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^===(?:FILE:(?P<path>[^\r\n]*?)|(?P<deps>DEPENDENCIES)|(?P<end>END))===[ \t]*\r?$",
    )
    .expect("valid marker regex")
});

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    /// Create file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Everything one generation call produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOutput {
    /// Files in emission order; a path may repeat
    pub files: Vec<GeneratedFile>,
    /// Package dependencies block, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<serde_json::Value>,
    /// Whether the end marker was seen
    pub complete: bool,
}

impl GeneratedOutput {
    /// Last emitted version of a path
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().rev().find(|f| f.path == path)
    }
}

enum Marker<'a> {
    File(&'a str),
    Dependencies,
    End,
}

/// Parse generated output
///
/// Text before the first marker and after `===END===` is ignored.
///
/// # Errors
/// - [`ParseError::EmptyPath`] for a file marker without a path
/// - [`ParseError::InvalidDependencies`] if the dependencies block is not JSON
/// - [`ParseError::DuplicateDependencies`] for a second dependencies block
pub fn parse_generated_output(text: &str) -> Result<GeneratedOutput, ParseError> {
    let mut markers = Vec::new();
    for caps in MARKER.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let marker = if let Some(path) = caps.name("path") {
            Marker::File(path.as_str())
        } else if caps.name("deps").is_some() {
            Marker::Dependencies
        } else {
            Marker::End
        };
        let body_start = if text[whole.end()..].starts_with('\n') {
            whole.end() + 1
        } else {
            whole.end()
        };
        let line = text[..whole.start()].matches('\n').count() + 1;
        markers.push((whole.start(), body_start, line, marker));
    }

    if let Some((first, ..)) = markers.first() {
        if !text[..*first].trim().is_empty() {
            tracing::debug!(bytes = first, "ignoring text before first marker");
        }
    }

    let mut output = GeneratedOutput::default();
    for (index, (_, body_start, line, marker)) in markers.iter().enumerate() {
        let body_end = markers.get(index + 1).map_or(text.len(), |next| next.0);
        let body = strip_one_newline(&text[*body_start..body_end]);

        match marker {
            Marker::File(path) => {
                let path = path.trim();
                if path.is_empty() {
                    return Err(ParseError::EmptyPath { line: *line });
                }
                output.files.push(GeneratedFile::new(path, body));
            }
            Marker::Dependencies => {
                if output.dependencies.is_some() {
                    return Err(ParseError::DuplicateDependencies { line: *line });
                }
                let json = body.trim();
                let value = if json.is_empty() {
                    serde_json::Value::Object(serde_json::Map::new())
                } else {
                    serde_json::from_str(json)
                        .map_err(|source| ParseError::InvalidDependencies { line: *line, source })?
                };
                output.dependencies = Some(value);
            }
            Marker::End => {
                output.complete = true;
                break;
            }
        }
    }

    tracing::debug!(
        files = output.files.len(),
        complete = output.complete,
        "parsed generated output"
    );
    Ok(output)
}

/// Render output back into the delimited grammar
#[must_use]
pub fn render(output: &GeneratedOutput) -> String {
    let mut text = String::new();
    for file in &output.files {
        text.push_str("===FILE:");
        text.push_str(&file.path);
        text.push_str("===\n");
        text.push_str(&file.content);
        text.push('\n');
    }
    if let Some(deps) = &output.dependencies {
        text.push_str("===DEPENDENCIES===\n");
        text.push_str(&deps.to_string());
        text.push('\n');
    }
    if output.complete {
        text.push_str("===END===\n");
    }
    text
}

fn strip_one_newline(body: &str) -> &str {
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ppe_test_utils::GENERATED_OUTPUT;

    #[test]
    fn parses_multiline_files() {
        let output = parse_generated_output(GENERATED_OUTPUT).unwrap();
        let paths: Vec<_> = output.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "src/types/recipe.ts",
                "src/app/api/recipes/route.ts",
                "src/components/RecipeCard.tsx",
                "src/components/RecipeCard.test.tsx",
            ]
        );
        assert_eq!(
            output.files[0].content,
            "/** Recipe domain types */\nexport interface Recipe {\n  id: string;\n  title: string;\n}\n\nexport type RecipeId = string;"
        );
        assert!(output.complete);
        assert_eq!(output.dependencies.unwrap()["next"], "14.0.0");
    }

    #[test]
    fn last_block_runs_to_end_of_input() {
        let output = parse_generated_output("===FILE:a.ts===\nconst a = 1;\n\n").unwrap();
        assert_eq!(output.files[0].content, "const a = 1;\n");
        assert!(!output.complete);
        assert!(output.dependencies.is_none());
    }

    #[test]
    fn empty_and_unterminated_bodies() {
        let output = parse_generated_output("===FILE:a.ts===\n===FILE:b.ts===").unwrap();
        assert_eq!(output.files[0], GeneratedFile::new("a.ts", ""));
        assert_eq!(output.files[1], GeneratedFile::new("b.ts", ""));
    }

    #[test]
    fn markers_must_start_a_line() {
        let output =
            parse_generated_output("===FILE:a.md===\nuse `===END===` to finish\n").unwrap();
        assert_eq!(output.files[0].content, "use `===END===` to finish");
        assert!(!output.complete);
    }

    #[test]
    fn ignores_preamble_and_trailer() {
        let output =
            parse_generated_output("Here you go:\n===FILE:a.ts===\nx\n===END===\nThanks!").unwrap();
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].content, "x");
        assert!(output.complete);
    }

    #[test]
    fn crlf_line_endings() {
        let output = parse_generated_output("===FILE:a.ts===\r\nx\r\n===END===\r\n").unwrap();
        assert_eq!(output.files[0].content, "x");
        assert!(output.complete);
    }

    #[test]
    fn rejects_empty_path() {
        let err = parse_generated_output("===FILE:a.ts===\nx\n===FILE:  ===\ny").unwrap_err();
        assert!(matches!(err, ParseError::EmptyPath { line: 3 }));
    }

    #[test]
    fn rejects_bad_dependencies() {
        let err = parse_generated_output("===DEPENDENCIES===\n{not json}\n===END===").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDependencies { line: 1, .. }));

        let err = parse_generated_output("===DEPENDENCIES===\n{}\n===DEPENDENCIES===\n{}")
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDependencies { line: 3 }));
    }

    #[test]
    fn render_round_trips() {
        let output = parse_generated_output(GENERATED_OUTPUT).unwrap();
        assert_eq!(parse_generated_output(&render(&output)).unwrap(), output);
    }

    #[test]
    fn latest_version_of_path_wins() {
        let output = parse_generated_output("===FILE:a.ts===\nold\n===FILE:a.ts===\nnew").unwrap();
        assert_eq!(output.file("a.ts").unwrap().content, "new");
    }
}
