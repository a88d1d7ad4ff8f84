//! Bundle file transport
//!
//! Writes are fsynced before acknowledgement. Reads retry transient I/O
//! failures with a bounded backoff; this is the only retried operation in
//! the crate. Rule evaluation itself is never retried.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use super::bundle::ContentBundle;
use super::errors::{BundleError, BundleResult};

/// Retry policy for transient bundle-read failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Initial backoff, doubled per retry
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries, for tests and CLI verification.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
        }
    }
}

/// True for error kinds worth retrying; structural failures are not.
fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
    )
}

/// Writes a bundle to a file and fsyncs it.
pub fn write_bundle_file(bundle: &ContentBundle, path: &Path) -> BundleResult<()> {
    let json = bundle.to_json()?;
    let mut file = File::create(path).map_err(|e| BundleError::io(path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| BundleError::io(path, e))?;
    file.sync_all().map_err(|e| BundleError::io(path, e))?;
    Ok(())
}

/// Reads raw bundle bytes from a file, retrying transient failures.
///
/// Parsing and integrity verification belong to the content loader; this
/// function only moves bytes.
pub fn read_bundle_file(path: &Path, policy: RetryPolicy) -> BundleResult<Vec<u8>> {
    let mut backoff = policy.initial_backoff;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match try_read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < policy.max_attempts && is_transient(e.kind()) => {
                thread::sleep(backoff);
                backoff *= 2;
            }
            Err(e) => return Err(BundleError::io(path, e)),
        }
    }
}

fn try_read(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
