//! Fact-set input error types

use thiserror::Error;

/// Result type for fact-set validation
pub type InputResult<T> = Result<T, EvaluationInputError>;

/// A structural defect in a submitted fact set.
///
/// Any defect rejects the entire evaluation; the engine never produces
/// output from partially valid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationInputError {
    #[error("medication at position {0} has a blank code")]
    BlankMedicationCode(usize),

    #[error("diagnosis at position {0} has a blank code")]
    BlankDiagnosisCode(usize),

    #[error("allergy at position {0} has a blank code")]
    BlankAllergyCode(usize),

    #[error("lab observation at position {0} has a blank code")]
    BlankLabCode(usize),

    #[error("lab observation '{code}' has a non-finite value")]
    NonFiniteLabValue { code: String },

    #[error("lab observation '{code}' has no unit")]
    MissingLabUnit { code: String },

    #[error("age {0} is outside the plausible range")]
    ImplausibleAge(u32),

    #[error("weight {0} kg is not a positive number")]
    NonPositiveWeight(f64),
}
