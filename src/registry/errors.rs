//! Content integrity error types
//!
//! Error codes:
//! - MEDG_BUNDLE_MALFORMED (FATAL at load)
//! - MEDG_CHECKSUM_MISMATCH (FATAL at load)
//! - MEDG_PROVENANCE_INCOMPLETE (FATAL at load)
//! - MEDG_DUPLICATE_RULE_ID (FATAL at load)
//! - MEDG_RULE_INVALID (FATAL at load)
//! - MEDG_COUNT_MISMATCH (FATAL at load)
//!
//! Every code is fatal for the load in progress: the bundle is rejected
//! wholesale and the previously published registry keeps serving.

use std::fmt;

/// Content integrity error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityErrorCode {
    /// Bundle bytes are not a well-formed bundle document (includes
    /// unrecognized lifecycle states and trigger categories, which the
    /// closed enums reject at parse)
    BundleMalformed,
    /// Manifest checksum does not match the recomputed payload digest
    ChecksumMismatch,
    /// A rule's provenance is missing or incomplete
    ProvenanceIncomplete,
    /// Two rules share an identifier
    DuplicateRuleId,
    /// A rule failed structural validation
    RuleInvalid,
    /// Manifest per-category counts disagree with the payload
    CountMismatch,
}

impl IntegrityErrorCode {
    /// Returns the string code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BundleMalformed => "MEDG_BUNDLE_MALFORMED",
            Self::ChecksumMismatch => "MEDG_CHECKSUM_MISMATCH",
            Self::ProvenanceIncomplete => "MEDG_PROVENANCE_INCOMPLETE",
            Self::DuplicateRuleId => "MEDG_DUPLICATE_RULE_ID",
            Self::RuleInvalid => "MEDG_RULE_INVALID",
            Self::CountMismatch => "MEDG_COUNT_MISMATCH",
        }
    }
}

/// A bundle integrity violation detected at load.
#[derive(Debug, Clone)]
pub struct ContentIntegrityError {
    code: IntegrityErrorCode,
    detail: String,
}

impl ContentIntegrityError {
    /// Creates a new integrity error.
    pub fn new(code: IntegrityErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// Malformed bundle document.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(IntegrityErrorCode::BundleMalformed, detail)
    }

    /// Checksum mismatch between manifest and recomputed digest.
    pub fn checksum_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(
            IntegrityErrorCode::ChecksumMismatch,
            format!("manifest declares {} but payload digests to {}", expected, actual),
        )
    }

    /// Incomplete provenance on a named rule.
    pub fn provenance_incomplete(rule_id: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            IntegrityErrorCode::ProvenanceIncomplete,
            format!("rule '{}': {}", rule_id, detail),
        )
    }

    /// Duplicate rule identifier.
    pub fn duplicate_rule_id(rule_id: &str) -> Self {
        Self::new(
            IntegrityErrorCode::DuplicateRuleId,
            format!("rule id '{}' appears more than once", rule_id),
        )
    }

    /// Structurally invalid rule.
    pub fn rule_invalid(rule_id: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            IntegrityErrorCode::RuleInvalid,
            format!("rule '{}': {}", rule_id, detail),
        )
    }

    /// Manifest counts disagree with payload.
    pub fn count_mismatch(detail: impl Into<String>) -> Self {
        Self::new(IntegrityErrorCode::CountMismatch, detail)
    }

    /// The error code.
    pub fn code(&self) -> IntegrityErrorCode {
        self.code
    }

    /// The error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ContentIntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.detail)
    }
}

impl std::error::Error for ContentIntegrityError {}

/// Result type for load operations
pub type LoadResult<T> = Result<T, ContentIntegrityError>;
