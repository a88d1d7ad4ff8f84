//! CLI command implementations

use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::bundle::{
    read_bundle_file, write_bundle_file, BundleBuilder, ContentBundle, RetryPolicy, SourceRecord,
    SourceStore,
};
use crate::registry::ContentLoader;
use crate::rules::LifecycleState;

use super::args::{BundleCommand, Cli, Command};
use super::errors::CliResult;

/// Parses arguments and dispatches to a command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Bundle { command } => match command {
            BundleCommand::Build {
                source,
                out,
                version,
            } => bundle_build(&source, &out, &version),
            BundleCommand::Verify { bundle } => bundle_verify(&bundle),
            BundleCommand::Inspect { bundle } => bundle_inspect(&bundle),
        },
    }
}

/// Compiles a source-record file into a bundle file.
pub fn bundle_build(source: &Path, out: &Path, version: &str) -> CliResult<()> {
    let text = fs::read_to_string(source)?;
    let records: Vec<SourceRecord> = serde_json::from_str(&text)?;

    let mut store = SourceStore::new();
    for record in records {
        store.insert(record)?;
    }

    let bundle = BundleBuilder::new(version).build(&store, Utc::now())?;
    write_bundle_file(&bundle, out)?;

    println!(
        "built bundle {} ({} rules, checksum {})",
        bundle.manifest.version,
        bundle.rules.len(),
        bundle.manifest.checksum
    );
    Ok(())
}

/// Runs the full loader verification against a bundle file.
pub fn bundle_verify(bundle_path: &Path) -> CliResult<()> {
    let bytes = read_bundle_file(bundle_path, RetryPolicy::no_retry())?;
    let registry = ContentLoader::load(&bytes)?;
    println!(
        "bundle {} verified ({} rules)",
        registry.version(),
        registry.len()
    );
    Ok(())
}

/// Prints a bundle's manifest and per-state counts.
///
/// Inspection verifies first: a bundle that fails integrity checks has no
/// trustworthy contents to print.
pub fn bundle_inspect(bundle_path: &Path) -> CliResult<()> {
    let bytes = read_bundle_file(bundle_path, RetryPolicy::no_retry())?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| super::errors::CliError::source_error(e.to_string()))?;
    let bundle = ContentBundle::from_json(text)?;
    ContentLoader::verify(&bundle)?;

    println!("version:   {}", bundle.manifest.version);
    println!("built_at:  {}", bundle.manifest.built_at.to_rfc3339());
    println!("checksum:  {}", bundle.manifest.checksum);
    println!(
        "counts:    interaction={} contraindication={} dosing_threshold={}",
        bundle.manifest.counts.interaction,
        bundle.manifest.counts.contraindication,
        bundle.manifest.counts.dosing_threshold
    );

    for state in [
        LifecycleState::Draft,
        LifecycleState::Active,
        LifecycleState::Deprecated,
    ] {
        let count = bundle.rules.iter().filter(|r| r.lifecycle == state).count();
        println!("{:<10} {}", format!("{}:", state.as_str().to_lowercase()), count);
    }
    Ok(())
}
