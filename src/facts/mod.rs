//! Patient fact set
//!
//! The fact set is the minimal, normalized projection of patient data the
//! engine is permitted to read: coded medications, diagnoses, recent labs,
//! dosing-relevant demographics and coded allergies. The calling
//! application constructs it; the engine never sees the full record.
//!
//! Structural validation is strict: a malformed fact set rejects the whole
//! evaluation. There is no partial output.

mod errors;
mod types;

pub use errors::{EvaluationInputError, InputResult};
pub use types::{Allergy, Demographics, Diagnosis, LabObservation, Medication, PatientFactSet};
