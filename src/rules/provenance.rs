//! Clinical provenance
//!
//! Every rule must be traceable to its clinical source and reviewer.
//! Provenance is validated for completeness at bundle build and again at
//! load; an incomplete record is an integrity defect that aborts the
//! operation, never a warning.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::EvidenceLevel;

/// Provenance metadata tracing a rule to its clinical source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalProvenance {
    /// Citation of the clinical source (guideline, label, study)
    pub source_citation: String,

    /// Publication or last review date of the source
    pub published_on: NaiveDate,

    /// Reviewing clinician or clinical body that approved the rule content
    pub reviewed_by: String,

    /// Evidence grade of the source
    pub evidence_level: EvidenceLevel,

    /// Start of the rule's clinical validity
    pub effective_from: NaiveDate,

    /// End of validity, if bounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_until: Option<NaiveDate>,
}

/// A specific way a provenance record is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvenanceDefect {
    /// Source citation is empty
    MissingCitation,
    /// Reviewer identity is empty
    MissingReviewer,
    /// effective_until precedes effective_from
    InvertedEffectiveRange,
}

impl ProvenanceDefect {
    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingCitation => "source citation is empty",
            Self::MissingReviewer => "reviewing clinician or body is empty",
            Self::InvertedEffectiveRange => "effective_until precedes effective_from",
        }
    }
}

impl fmt::Display for ProvenanceDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl ClinicalProvenance {
    /// Checks the record for completeness.
    ///
    /// Returns the first defect found. Completeness means: non-empty
    /// citation, non-empty reviewer, coherent effective-date range.
    pub fn validate(&self) -> Result<(), ProvenanceDefect> {
        if self.source_citation.trim().is_empty() {
            return Err(ProvenanceDefect::MissingCitation);
        }
        if self.reviewed_by.trim().is_empty() {
            return Err(ProvenanceDefect::MissingReviewer);
        }
        if let Some(until) = self.effective_until {
            if until < self.effective_from {
                return Err(ProvenanceDefect::InvertedEffectiveRange);
            }
        }
        Ok(())
    }
}
