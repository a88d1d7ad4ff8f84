//! Content bundle subsystem
//!
//! A bundle is the unit of content deployment: an ordered list of compiled
//! rules plus a manifest carrying the semantic version, build timestamp,
//! per-category counts and a SHA-256 checksum over the rule payload. The
//! checksum is the integrity anchor; any mismatch is fatal at load.
//!
//! Bundle building runs offline, never on the evaluation hot path.

mod builder;
mod bundle;
mod checksum;
mod errors;
mod io;
mod manifest;
mod source;

pub use builder::BundleBuilder;
pub use bundle::ContentBundle;
pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use errors::{BundleError, BundleResult};
pub use io::{read_bundle_file, write_bundle_file, RetryPolicy};
pub use manifest::{BundleManifest, CategoryCounts};
pub use source::{SourceRecord, SourceStore};
