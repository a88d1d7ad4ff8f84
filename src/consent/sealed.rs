//! Sealed fact set and access grants
//!
//! `SealedFactSet` holds patient facts behind a private field; the only way
//! to read them is to present an `AccessGrant`, and the only issuer of
//! grants is the fail-closed authorization path in this module. Components
//! that never hold a grant cannot read facts, by construction.

use chrono::{DateTime, Utc};

use crate::facts::PatientFactSet;

use super::errors::ConsentDeniedError;
use super::guard::Purpose;

/// Proof that consent was authorized for one patient and purpose.
///
/// Cannot be constructed outside this module.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    patient_id: String,
    purpose: Purpose,
    granted_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Issues a grant. Module-private: only `authorize_access` calls this.
    pub(super) fn issue(patient_id: &str, purpose: Purpose) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            purpose,
            granted_at: Utc::now(),
        }
    }

    /// True when the grant covers the given patient.
    pub fn covers(&self, patient_id: &str) -> bool {
        self.patient_id == patient_id
    }

    /// The authorized purpose.
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// When the grant was issued.
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }
}

/// A patient fact set sealed behind consent.
#[derive(Debug, Clone)]
pub struct SealedFactSet {
    patient_id: String,
    facts: PatientFactSet,
}

impl SealedFactSet {
    /// Seals a fact set for a patient.
    pub fn seal(patient_id: impl Into<String>, facts: PatientFactSet) -> Self {
        Self {
            patient_id: patient_id.into(),
            facts,
        }
    }

    /// The patient identifier (not itself a clinical fact).
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Opens the fact set with a grant covering this patient.
    ///
    /// A grant for a different patient is refused; mismatches fail closed
    /// like any other consent ambiguity.
    pub fn open(&self, grant: &AccessGrant) -> Result<&PatientFactSet, ConsentDeniedError> {
        if !grant.covers(&self.patient_id) {
            return Err(ConsentDeniedError {
                patient_id: self.patient_id.clone(),
                purpose: grant.purpose().to_string(),
                reason: "access grant does not cover this patient".to_string(),
            });
        }
        Ok(&self.facts)
    }
}
