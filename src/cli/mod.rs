//! CLI module
//!
//! Offline content tooling:
//! - bundle build: compile a source-record file into a checksummed bundle
//! - bundle verify: run full loader validation against a bundle file
//! - bundle inspect: print a bundle's manifest and counts

mod args;
mod commands;
mod errors;

pub use args::{BundleCommand, Cli, Command};
pub use commands::{bundle_build, bundle_inspect, bundle_verify, run};
pub use errors::{CliError, CliErrorCode, CliResult};
