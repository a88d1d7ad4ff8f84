//! Bundle error types

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::RuleDefect;

/// Result type for bundle operations
pub type BundleResult<T> = Result<T, BundleError>;

/// Errors raised while building, serializing or transporting bundles.
///
/// Load-side integrity verification lives in the registry subsystem
/// (`ContentIntegrityError`); these errors cover the authoring/build side
/// and file transport.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A source record failed structural validation during build
    #[error("source record '{rule_id}' is invalid: {defect}")]
    InvalidSourceRecord { rule_id: String, defect: RuleDefect },

    /// Two source records share an identifier
    #[error("duplicate rule id '{0}' in source store")]
    DuplicateRuleId(String),

    /// Bundle cannot be serialized or parsed
    #[error("bundle serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bundle version string is empty
    #[error("bundle version is empty")]
    EmptyVersion,

    /// File I/O failed after exhausting retries
    #[error("bundle I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    /// Creates an I/O error carrying the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
