//! CLI argument definitions using clap
//!
//! Commands:
//! - medguard bundle build --source <records.json> --out <bundle.json> --version <v>
//! - medguard bundle verify --bundle <bundle.json>
//! - medguard bundle inspect --bundle <bundle.json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MedGuard - A strict, deterministic, auditable clinical decision rule engine
#[derive(Parser, Debug)]
#[command(name = "medguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Content bundle tooling
    Bundle {
        #[command(subcommand)]
        command: BundleCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum BundleCommand {
    /// Compile a source-record file into a checksummed bundle
    Build {
        /// Path to the source records (JSON array)
        #[arg(long)]
        source: PathBuf,

        /// Output bundle path
        #[arg(long)]
        out: PathBuf,

        /// Content version to stamp into the manifest
        #[arg(long)]
        version: String,
    },

    /// Run full integrity verification against a bundle file
    Verify {
        /// Path to the bundle
        #[arg(long)]
        bundle: PathBuf,
    },

    /// Print a bundle's manifest and per-state counts
    Inspect {
        /// Path to the bundle
        #[arg(long)]
        bundle: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
