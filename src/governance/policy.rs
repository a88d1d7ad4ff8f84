//! Promotion policy
//!
//! Promotion criteria are explicit and checkable: minimum evidence level,
//! and no existing ACTIVE rule covering the identical trigger with a
//! conflicting severity. Two live rules must never silently disagree;
//! conflicts are resolved by explicit deprecation first.

use std::fmt;

use crate::bundle::{SourceRecord, SourceStore};
use crate::rules::{EvidenceLevel, LifecycleState};

/// Reason a promotion was denied.
///
/// For every promotion decision the system can explain why it was allowed
/// or denied.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionDenial {
    /// Evidence level is below the policy minimum
    EvidenceBelowMinimum {
        level: EvidenceLevel,
        minimum: EvidenceLevel,
    },
    /// An ACTIVE rule already covers the identical trigger with a
    /// different severity
    ConflictingActiveRule { existing_rule_id: String },
}

impl fmt::Display for PromotionDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvidenceBelowMinimum { level, minimum } => write!(
                f,
                "evidence level {} is below the policy minimum {}",
                level, minimum
            ),
            Self::ConflictingActiveRule { existing_rule_id } => write!(
                f,
                "active rule '{}' covers the identical trigger with a conflicting severity; \
                 deprecate it first",
                existing_rule_id
            ),
        }
    }
}

/// Explicit promotion criteria.
#[derive(Debug, Clone, Copy)]
pub struct PromotionPolicy {
    /// Weakest evidence level still eligible for promotion
    pub minimum_evidence: EvidenceLevel,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            minimum_evidence: EvidenceLevel::B,
        }
    }
}

impl PromotionPolicy {
    /// Creates a policy with the given minimum evidence level.
    pub fn new(minimum_evidence: EvidenceLevel) -> Self {
        Self { minimum_evidence }
    }

    /// Checks whether a candidate record may be promoted.
    pub fn check_promotion(
        &self,
        candidate: &SourceRecord,
        store: &SourceStore,
    ) -> Result<(), PromotionDenial> {
        let level = candidate.provenance.evidence_level;
        if !level.satisfies(self.minimum_evidence) {
            return Err(PromotionDenial::EvidenceBelowMinimum {
                level,
                minimum: self.minimum_evidence,
            });
        }

        let candidate_key = candidate.trigger.key();
        for existing in store.iter() {
            if existing.id == candidate.id {
                continue;
            }
            if existing.lifecycle == LifecycleState::Active
                && existing.trigger.key() == candidate_key
                && existing.severity != candidate.severity
            {
                return Err(PromotionDenial::ConflictingActiveRule {
                    existing_rule_id: existing.id.clone(),
                });
            }
        }
        Ok(())
    }
}
