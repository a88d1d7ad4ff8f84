//! CLI error types
//!
//! All CLI errors are fatal: the command prints the error and exits
//! non-zero.

use std::fmt;
use std::io;

use crate::bundle::BundleError;
use crate::registry::ContentIntegrityError;

/// CLI error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Source-record file error
    SourceError,
    /// Bundle build failed
    BuildFailed,
    /// Bundle failed integrity verification
    IntegrityFailed,
    /// I/O error
    IoError,
}

impl CliErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceError => "MEDG_CLI_SOURCE_ERROR",
            Self::BuildFailed => "MEDG_CLI_BUILD_FAILED",
            Self::IntegrityFailed => "MEDG_CLI_INTEGRITY_FAILED",
            Self::IoError => "MEDG_CLI_IO_ERROR",
        }
    }
}

/// CLI error.
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Source file error.
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SourceError, msg)
    }

    /// The error code.
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::IoError, e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::source_error(format!("JSON error: {}", e))
    }
}

impl From<BundleError> for CliError {
    fn from(e: BundleError) -> Self {
        Self::new(CliErrorCode::BuildFailed, e.to_string())
    }
}

impl From<ContentIntegrityError> for CliError {
    fn from(e: ContentIntegrityError) -> Self {
        Self::new(CliErrorCode::IntegrityFailed, e.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
