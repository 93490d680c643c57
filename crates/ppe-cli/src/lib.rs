//! PPE CLI - command line front end for the `ppe` binary

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{CliArgs, Commands};
pub use settings::Settings;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
