//! Evaluation error types

use thiserror::Error;

use crate::consent::ConsentDeniedError;
use crate::facts::EvaluationInputError;

/// Why an evaluation produced no output.
///
/// Insufficient data is deliberately absent here: it is not an error but a
/// degraded, explicitly-flagged output.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Consent was denied (or the guard failed; failure maps to denial)
    #[error(transparent)]
    ConsentDenied(#[from] ConsentDeniedError),

    /// The fact set failed structural validation
    #[error("evaluation input rejected: {0}")]
    Input(#[from] EvaluationInputError),
}
