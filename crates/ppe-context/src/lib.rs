//! PPE Context - carries generated code from one phase to the next
//!
//! - [`delimited`]: parse and render the `===FILE:path===` output grammar
//! - [`importance`]: how much later phases rely on a file
//! - [`window`]: importance-ordered, size-bounded context text
//! - [`analysis`]: exports, imports, summaries and API contracts
//! - [`patterns`]: libraries and idioms already in use
//! - [`tracker`]: all of the above accumulated across phases
//!
//! # Example
//!
//! ```rust
//! use ppe_context::{CodeContextTracker, ContextConfig};
//!
//! let mut tracker = CodeContextTracker::new(ContextConfig::default());
//! tracker
//!     .record_raw(1, "===FILE:src/types/user.ts===\nexport interface User {}\n===END===\n")
//!     .unwrap();
//! assert!(tracker.is_already_implemented("user"));
//! assert!(tracker.build_context().text.starts_with("// File: src/types/user.ts"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analysis;
pub mod delimited;
pub mod error;
pub mod importance;
pub mod patterns;
pub mod tracker;
pub mod window;

pub use analysis::{
    analyze_file, analyze_generated_files, extract_api_contracts, AccumulatedFile, ApiContract,
    FileAnalysis, FileType,
};
pub use delimited::{parse_generated_output, render, GeneratedFile, GeneratedOutput};
pub use error::ParseError;
pub use patterns::CodingPatterns;
pub use tracker::{CodeContextTracker, ContractRecord, FileRecord};
pub use window::{
    ContextConfig, ContextWindow, ContextWindowBuilder, Inclusion, ScoredFile, SelectedFile,
    TRUNCATION_MARKER,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for context handling
    pub use crate::{
        parse_generated_output, CodeContextTracker, ContextConfig, ContextWindow,
        ContextWindowBuilder, GeneratedFile, GeneratedOutput, ParseError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
