//! Consent error types

use thiserror::Error;

/// Failure of the consent collaborator itself (transport, timeout).
///
/// Never surfaced to evaluation callers directly: the authorization path
/// converts it to a denial.
#[derive(Debug, Clone, Error)]
pub enum ConsentError {
    #[error("consent service unavailable: {0}")]
    Unavailable(String),

    #[error("consent check timed out")]
    Timeout,
}

/// Evaluation was refused because consent is not authorized.
#[derive(Debug, Clone, Error)]
#[error("consent denied for patient '{patient_id}' (purpose {purpose}): {reason}")]
pub struct ConsentDeniedError {
    pub patient_id: String,
    pub purpose: String,
    pub reason: String,
}
