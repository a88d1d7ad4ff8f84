//! Consent guard
//!
//! The single mandatory chokepoint for reading patient facts. No evaluator
//! touches a fact-set field before an explicit authorization exists for the
//! requested purpose.
//!
//! Fail-closed: a guard error or timeout maps to denial, never to an
//! implicit allow. Every denial is written to the audit sink before the
//! caller sees it.

mod errors;
mod guard;
mod sealed;

pub use errors::{ConsentDeniedError, ConsentError};
pub use guard::{authorize_access, ConsentDecision, ConsentGuard, Purpose, StaticConsentGuard};
pub use sealed::{AccessGrant, SealedFactSet};
