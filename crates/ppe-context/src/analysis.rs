//! Generated file analysis
//!
//! Best-effort, regex based metadata extraction: file type, exports, package
//! imports, a one-line summary and HTTP API contracts. It can miss or
//! misreport constructs; callers treat the result as hints.

use crate::delimited::GeneratedFile;
use crate::importance::{exports_types, is_config_path, is_test_path};
use crate::patterns::CodingPatterns;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static NAMED_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*export\s+(?:declare\s+)?(?:async\s+)?(?:function\*?|const|let|var|class|interface|type|enum|abstract\s+class)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("valid named export regex")
});

static DEFAULT_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*export\s+default\s+(?:async\s+)?(?:(?:function|class)\s+([A-Za-z_$][\w$]*)|([A-Za-z_$][\w$]*)\s*;?\s*$)?",
    )
    .expect("valid default export regex")
});

static BRACED_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*export\s+(?:type\s+)?\{([^}]*)\}").expect("valid braced export regex")
});

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)(?:^\s*import\s+(?:[^'";]*?\s+from\s+)?|\brequire\s*\(\s*)['"]([^'"]+)['"]"#,
    )
    .expect("valid import regex")
});

static DOC_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:/\*\*?\s*\n?\s*\*?\s*([^\n*][^\n]*)|//\s*([^\n]+))")
        .expect("valid doc comment regex")
});

static HTTP_HANDLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*export\s+(?:async\s+function\s+|function\s+|const\s+)(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\b",
    )
    .expect("valid handler regex")
});

static AUTH_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"getServerSession|getSession\s*\(|\bauth\s*\(\s*\)|requireAuth|withAuth|currentUser|verifyToken|Unauthorized|status:\s*401",
    )
    .expect("valid auth marker regex")
});

/// Broad role of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Api,
    Type,
    Util,
    Component,
    Style,
    Config,
    Other,
}

impl FileType {
    /// Infer from path
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        let rooted = format!("/{lower}");
        let in_dir = |dir: &str| rooted.contains(&format!("/{dir}/"));

        if [".css", ".scss", ".sass", ".less"]
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            FileType::Style
        } else if is_config_path(&lower) {
            FileType::Config
        } else if in_dir("api") {
            FileType::Api
        } else if in_dir("types")
            || lower.ends_with(".d.ts")
            || lower.ends_with("/types.ts")
            || lower == "types.ts"
        {
            FileType::Type
        } else if in_dir("utils") || in_dir("lib") || in_dir("helpers") {
            FileType::Util
        } else if lower.ends_with(".tsx") || lower.ends_with(".jsx") || in_dir("components") {
            FileType::Component
        } else {
            FileType::Other
        }
    }

    /// Infer from path, falling back to content for paths that say nothing
    ///
    /// A file outside the conventional directories is an API route if it
    /// exports HTTP method handlers, and a type module if it exports types.
    #[must_use]
    pub fn detect(path: &str, content: &str) -> Self {
        match Self::from_path(path) {
            FileType::Other if HTTP_HANDLER.is_match(content) => FileType::Api,
            FileType::Other if exports_types(content) => FileType::Type,
            file_type => file_type,
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Api => "api",
            FileType::Type => "type",
            FileType::Util => "util",
            FileType::Component => "component",
            FileType::Style => "style",
            FileType::Config => "config",
            FileType::Other => "other",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of one generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatedFile {
    pub path: String,
    pub file_type: FileType,
    pub exports: Vec<String>,
    /// Package names of non-relative imports
    pub imports: Vec<String>,
    pub summary: String,
}

/// HTTP endpoint exposed by a generated route file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContract {
    pub endpoint: String,
    pub method: String,
    pub requires_auth: bool,
    pub file_path: String,
}

/// Analysis of a batch of generated files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub files: Vec<AccumulatedFile>,
    pub api_contracts: Vec<ApiContract>,
    pub patterns: CodingPatterns,
}

/// Analyze generated files
#[must_use]
pub fn analyze_generated_files(files: &[GeneratedFile]) -> FileAnalysis {
    let mut analysis = FileAnalysis::default();

    for file in files {
        let accumulated = analyze_file(file);
        if accumulated.file_type == FileType::Api {
            analysis.api_contracts.extend(extract_api_contracts(file));
        }
        if !is_test_path(&file.path.to_lowercase()) {
            analysis.patterns.merge(&CodingPatterns::detect(&file.content));
        }
        analysis.files.push(accumulated);
    }

    tracing::debug!(
        files = analysis.files.len(),
        contracts = analysis.api_contracts.len(),
        "analyzed generated files"
    );
    analysis
}

/// Metadata of one file
#[must_use]
pub fn analyze_file(file: &GeneratedFile) -> AccumulatedFile {
    let file_type = FileType::detect(&file.path, &file.content);
    let exports = extract_exports(&file.content);
    let imports = extract_imports(&file.content);
    let summary = summarize(&file.path, &file.content, file_type, &exports);

    AccumulatedFile {
        path: file.path.clone(),
        file_type,
        exports,
        imports,
        summary,
    }
}

/// Exported names: named, default and braced, deduplicated
#[must_use]
pub fn extract_exports(content: &str) -> Vec<String> {
    let mut exports: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !name.is_empty() && !exports.iter().any(|e| e == name) {
            exports.push(name.to_string());
        }
    };

    for caps in NAMED_EXPORT.captures_iter(content) {
        push(&caps[1]);
    }
    for caps in DEFAULT_EXPORT.captures_iter(content) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("default", |m| m.as_str());
        push(name);
    }
    for caps in BRACED_EXPORT.captures_iter(content) {
        for item in caps[1].split(',') {
            // `a as b` exports `b`
            push(item.split_whitespace().last().unwrap_or_default());
        }
    }

    exports
}

/// Package names of non-relative imports, deduplicated
#[must_use]
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut packages: Vec<String> = Vec::new();
    for caps in IMPORT.captures_iter(content) {
        let Some(package) = package_name(&caps[1]) else {
            continue;
        };
        if !packages.iter().any(|p| p == package) {
            packages.push(package.to_string());
        }
    }
    packages
}

fn package_name(specifier: &str) -> Option<&str> {
    if specifier.starts_with('.')
        || specifier.starts_with('/')
        || specifier.starts_with("@/")
        || specifier.starts_with("~/")
    {
        return None;
    }
    let mut segments = specifier.splitn(3, '/');
    let first = segments.next()?;
    if first.starts_with('@') {
        let second = segments.next()?;
        Some(&specifier[..first.len() + 1 + second.len()])
    } else {
        Some(first)
    }
}

fn summarize(path: &str, content: &str, file_type: FileType, exports: &[String]) -> String {
    if let Some(caps) = DOC_COMMENT.captures(content) {
        if let Some(text) = caps.get(1).or_else(|| caps.get(2)) {
            let text = text.as_str().trim().trim_end_matches("*/").trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }

    let listed = if exports.is_empty() {
        String::from("no exports")
    } else {
        exports.join(", ")
    };
    let name = path.rsplit('/').next().unwrap_or(path);
    match file_type {
        FileType::Api => format!("API route {name} handling {listed}"),
        FileType::Type => format!("Type definitions: {listed}"),
        FileType::Util => format!("Utilities: {listed}"),
        FileType::Component => format!("Component {name} exporting {listed}"),
        FileType::Style => format!("Stylesheet {name}"),
        FileType::Config => format!("Configuration {name}"),
        FileType::Other => format!("Module {name} exporting {listed}"),
    }
}

/// Endpoint path for a route file
///
/// `src/app/api/users/[id]/route.ts` becomes `/api/users/[id]`,
/// `pages/api/login.ts` becomes `/api/login`.
#[must_use]
pub fn endpoint_for(path: &str) -> String {
    let rooted = format!("/{path}");
    let tail = rooted
        .find("/api/")
        .map_or(rooted.as_str(), |index| &rooted[index..]);

    let without_ext = tail.rsplit_once('.').map_or(tail, |(stem, ext)| {
        if ext.contains('/') {
            tail
        } else {
            stem
        }
    });
    let trimmed = without_ext
        .strip_suffix("/route")
        .or_else(|| without_ext.strip_suffix("/index"))
        .unwrap_or(without_ext);

    trimmed.to_string()
}

/// Contracts for exported HTTP method handlers
#[must_use]
pub fn extract_api_contracts(file: &GeneratedFile) -> Vec<ApiContract> {
    let endpoint = endpoint_for(&file.path);
    let requires_auth = AUTH_MARKER.is_match(&file.content);

    let mut contracts: Vec<ApiContract> = Vec::new();
    for caps in HTTP_HANDLER.captures_iter(&file.content) {
        let method = &caps[1];
        if contracts.iter().any(|c| c.method == method) {
            continue;
        }
        contracts.push(ApiContract {
            endpoint: endpoint.clone(),
            method: method.to_string(),
            requires_auth,
            file_path: file.path.clone(),
        });
    }
    contracts
}
