//! Incremental code context across phases
//!
//! [`CodeContextTracker`] is fed the output of each completed phase. It keeps
//! the latest content of every path, append-only logs of file metadata and
//! API contracts, and the merged coding patterns, and turns them into the
//! context and summary handed to the next phase. Views of the current state
//! are derived from the logs; nothing recorded is ever removed.

use crate::analysis::{
    analyze_file, extract_api_contracts, AccumulatedFile, ApiContract, FileType,
};
use crate::delimited::{parse_generated_output, GeneratedFile, GeneratedOutput};
use crate::error::ParseError;
use crate::importance;
use crate::patterns::CodingPatterns;
use crate::window::{ContextConfig, ContextWindow, ContextWindowBuilder, ScoredFile};
use indexmap::IndexMap;
use moka::sync::Cache;
use std::fmt::Write;

/// Importance scores kept per tracker
const SCORE_CACHE_CAPACITY: u64 = 4096;

/// Metadata log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Phase that produced this version
    pub phase: u32,
    pub file: AccumulatedFile,
}

/// Contract log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
    /// Phase that produced the route file
    pub phase: u32,
    pub contract: ApiContract,
    /// Index of the file record the contract came from
    revision: usize,
}

/// Working set of generated code
#[derive(Debug)]
pub struct CodeContextTracker {
    window: ContextWindowBuilder,
    files: IndexMap<String, GeneratedFile>,
    log: Vec<FileRecord>,
    contracts: Vec<ContractRecord>,
    patterns: CodingPatterns,
    packages: IndexMap<String, serde_json::Value>,
    scores: Cache<blake3::Hash, f64>,
}

impl Default for CodeContextTracker {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl CodeContextTracker {
    /// Create empty tracker
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self {
            window: ContextWindowBuilder::new(config),
            files: IndexMap::new(),
            log: Vec::new(),
            contracts: Vec::new(),
            patterns: CodingPatterns::default(),
            packages: IndexMap::new(),
            scores: Cache::new(SCORE_CACHE_CAPACITY),
        }
    }

    /// Parse and record raw generated output
    ///
    /// # Errors
    /// Returns [`ParseError`] if the output is malformed; nothing is recorded
    pub fn record_raw(&mut self, phase: u32, text: &str) -> Result<usize, ParseError> {
        let output = parse_generated_output(text)?;
        Ok(self.record_phase(phase, &output))
    }

    /// Record a completed phase's output, returning the number of files
    pub fn record_phase(&mut self, phase: u32, output: &GeneratedOutput) -> usize {
        for file in &output.files {
            let metadata = analyze_file(file);
            let revision = self.log.len();

            if metadata.file_type == FileType::Api {
                self.contracts
                    .extend(extract_api_contracts(file).into_iter().map(|contract| {
                        ContractRecord {
                            phase,
                            contract,
                            revision,
                        }
                    }));
            }
            if !importance::is_test_path(&file.path.to_lowercase()) {
                self.patterns.merge(&CodingPatterns::detect(&file.content));
            }

            self.log.push(FileRecord { phase, file: metadata });
            self.files.insert(file.path.clone(), file.clone());
        }

        if let Some(serde_json::Value::Object(deps)) = &output.dependencies {
            for (name, version) in deps {
                self.packages.insert(name.clone(), version.clone());
            }
        }

        tracing::info!(
            phase,
            files = output.files.len(),
            tracked = self.files.len(),
            contracts = self.contracts.len(),
            "recorded phase output"
        );
        output.files.len()
    }

    /// Latest version of every tracked file, in first-seen order
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.values()
    }

    /// Append-only metadata log
    #[must_use]
    pub fn history(&self) -> &[FileRecord] {
        &self.log
    }

    /// Every contract ever recorded, oldest first
    #[must_use]
    pub fn contract_history(&self) -> &[ContractRecord] {
        &self.contracts
    }

    /// Contracts exposed by the latest version of each route file
    #[must_use]
    pub fn api_contracts(&self) -> Vec<&ApiContract> {
        let mut latest: IndexMap<&str, usize> = IndexMap::new();
        for (revision, record) in self.log.iter().enumerate() {
            latest.insert(record.file.path.as_str(), revision);
        }

        self.contracts
            .iter()
            .filter(|r| latest.get(r.contract.file_path.as_str()) == Some(&r.revision))
            .map(|r| &r.contract)
            .collect()
    }

    /// Merged coding patterns
    #[must_use]
    pub fn patterns(&self) -> &CodingPatterns {
        &self.patterns
    }

    /// Declared package dependencies, later phases overriding earlier ones
    #[must_use]
    pub fn packages(&self) -> &IndexMap<String, serde_json::Value> {
        &self.packages
    }

    /// Importance of a file, memoised by content
    #[must_use]
    pub fn importance(&self, file: &GeneratedFile) -> f64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(file.path.as_bytes());
        hasher.update(&[0]);
        hasher.update(file.content.as_bytes());
        let key = hasher.finalize();

        self.scores
            .get_with(key, || importance::score(&file.path, &file.content))
    }

    /// Latest metadata per path
    fn current_metadata(&self) -> IndexMap<&str, &AccumulatedFile> {
        let mut current = IndexMap::new();
        for record in &self.log {
            current.insert(record.file.path.as_str(), &record.file);
        }
        current
    }

    /// Exports of every tracked file that has any
    #[must_use]
    pub fn existing_exports(&self) -> IndexMap<String, Vec<String>> {
        self.current_metadata()
            .into_iter()
            .filter(|(_, meta)| !meta.exports.is_empty())
            .map(|(path, meta)| (path.to_string(), meta.exports.clone()))
            .collect()
    }

    /// Check whether something named `name` already exists
    ///
    /// Matches export names and file stems, ignoring case and punctuation, so
    /// "Recipe Card" matches `RecipeCard.tsx`.
    #[must_use]
    pub fn is_already_implemented(&self, name: &str) -> bool {
        let wanted = normalize(name);
        if wanted.is_empty() {
            return false;
        }

        self.current_metadata().into_iter().any(|(path, meta)| {
            let file_name = path.rsplit('/').next().unwrap_or(path);
            let stem = file_name.split('.').next().unwrap_or(file_name);
            normalize(stem) == wanted || meta.exports.iter().any(|e| normalize(e) == wanted)
        })
    }

    /// Context window over the tracked files
    #[must_use]
    pub fn build_context(&self) -> ContextWindow {
        let candidates = self
            .files
            .values()
            .map(|file| ScoredFile {
                file,
                score: self.importance(file),
            })
            .collect();
        self.window.select(candidates)
    }

    /// Prompt section describing what already exists
    #[must_use]
    pub fn prompt_summary(&self) -> String {
        let mut out = String::new();
        let metadata = self.current_metadata();

        let _ = writeln!(out, "## Existing files ({})", metadata.len());
        for meta in metadata.values() {
            let _ = write!(out, "- {} [{}]: {}", meta.path, meta.file_type, meta.summary);
            if !meta.exports.is_empty() {
                let _ = write!(out, " (exports: {})", meta.exports.join(", "));
            }
            out.push('\n');
        }

        let contracts = self.api_contracts();
        if !contracts.is_empty() {
            out.push_str("\n## API contracts\n");
            for contract in contracts {
                let auth = if contract.requires_auth {
                    " (auth required)"
                } else {
                    ""
                };
                let _ = writeln!(out, "- {} {}{auth}", contract.method, contract.endpoint);
            }
        }

        let guidelines = self.patterns.guidelines();
        if !guidelines.is_empty() {
            out.push_str("\n## Consistency guidelines\n");
            for guideline in guidelines {
                let _ = writeln!(out, "- {guideline}");
            }
        }

        out
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
