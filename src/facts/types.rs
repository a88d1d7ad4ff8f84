//! Fact set types and structural validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::ClinicalCode;

use super::errors::{EvaluationInputError, InputResult};

/// An active medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub code: ClinicalCode,
    pub name: String,
}

/// An active diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: ClinicalCode,
    pub name: String,
}

/// A recent lab result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabObservation {
    pub code: ClinicalCode,
    pub value: f64,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
}

/// A known allergy, coded by allergen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allergy {
    pub code: ClinicalCode,
    pub substance: String,
}

/// Demographics relevant to dosing decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Known renal impairment per the source record, independent of any
    /// lab observation carried here
    #[serde(default)]
    pub renal_impairment: bool,
}

/// The normalized slice of clinical data the engine evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFactSet {
    pub medications: Vec<Medication>,
    pub diagnoses: Vec<Diagnosis>,
    pub labs: Vec<LabObservation>,
    pub demographics: Demographics,
    pub allergies: Vec<Allergy>,
}

impl PatientFactSet {
    /// Validates the fact set structurally.
    ///
    /// Returns the first defect found. An empty medication list is valid
    /// (nothing to check is a legitimate state); blank codes and
    /// non-finite values are not.
    pub fn validate(&self) -> InputResult<()> {
        for (i, med) in self.medications.iter().enumerate() {
            if med.code.is_blank() {
                return Err(EvaluationInputError::BlankMedicationCode(i));
            }
        }
        for (i, dx) in self.diagnoses.iter().enumerate() {
            if dx.code.is_blank() {
                return Err(EvaluationInputError::BlankDiagnosisCode(i));
            }
        }
        for (i, allergy) in self.allergies.iter().enumerate() {
            if allergy.code.is_blank() {
                return Err(EvaluationInputError::BlankAllergyCode(i));
            }
        }
        for (i, lab) in self.labs.iter().enumerate() {
            if lab.code.is_blank() {
                return Err(EvaluationInputError::BlankLabCode(i));
            }
            if !lab.value.is_finite() {
                return Err(EvaluationInputError::NonFiniteLabValue {
                    code: lab.code.key(),
                });
            }
            if lab.unit.trim().is_empty() {
                return Err(EvaluationInputError::MissingLabUnit {
                    code: lab.code.key(),
                });
            }
        }
        if self.demographics.age_years > 130 {
            return Err(EvaluationInputError::ImplausibleAge(
                self.demographics.age_years,
            ));
        }
        if let Some(weight) = self.demographics.weight_kg {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(EvaluationInputError::NonPositiveWeight(weight));
            }
        }
        Ok(())
    }

    /// Canonical JSON bytes for input-snapshot hashing.
    ///
    /// Field order follows struct declaration, so identical fact sets
    /// always produce identical bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // Serialization of these plain structs cannot fail
        serde_json::to_vec(self).expect("fact set serialization is infallible")
    }
}
