//! Rule and trigger definitions
//!
//! A `Rule` pairs a category-specific trigger with severity, recommendation
//! text, provenance and lifecycle state. The trigger is a tagged union so
//! evaluator dispatch is exhaustive by construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::provenance::{ClinicalProvenance, ProvenanceDefect};
use super::types::{ClinicalCode, ComparisonOp, LifecycleState, Severity};

/// Rule category discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    /// Drug-drug interaction
    Interaction,
    /// Drug contraindicated by a condition or coded allergy
    Contraindication,
    /// Lab-value threshold gating a drug (e.g. renal dosing)
    DosingThreshold,
}

impl RuleCategory {
    /// Returns the category name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Interaction => "INTERACTION",
            RuleCategory::Contraindication => "CONTRAINDICATION",
            RuleCategory::DosingThreshold => "DOSING_THRESHOLD",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category-specific trigger predicate.
///
/// Serialized with an explicit `category` tag so the bundle format stays
/// readable and the discriminant survives round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    /// Fires when both drugs are active. The pair is unordered.
    Interaction {
        drug_a: ClinicalCode,
        drug_b: ClinicalCode,
    },

    /// Fires when the drug is active and the condition code matches an
    /// active diagnosis or a coded allergy.
    Contraindication {
        drug: ClinicalCode,
        condition: ClinicalCode,
    },

    /// Fires when the drug is active and a sufficiently recent observation
    /// of the lab satisfies `value <op> threshold`.
    DosingThreshold {
        drug: ClinicalCode,
        lab: ClinicalCode,
        op: ComparisonOp,
        threshold: f64,
        unit: String,
        /// Observations older than this are not clinically valid for the
        /// check; their absence degrades the evaluation instead of passing it.
        max_observation_age_days: u32,
    },
}

impl Trigger {
    /// The category this trigger belongs to.
    pub fn category(&self) -> RuleCategory {
        match self {
            Trigger::Interaction { .. } => RuleCategory::Interaction,
            Trigger::Contraindication { .. } => RuleCategory::Contraindication,
            Trigger::DosingThreshold { .. } => RuleCategory::DosingThreshold,
        }
    }

    /// Canonical trigger key.
    ///
    /// Two rules cover the same trigger iff their keys are equal. Interaction
    /// pairs are sorted so `(a, b)` and `(b, a)` collide. Used for governance
    /// conflict detection and registry index keys.
    pub fn key(&self) -> String {
        match self {
            Trigger::Interaction { drug_a, drug_b } => {
                let (first, second) = if drug_a <= drug_b {
                    (drug_a, drug_b)
                } else {
                    (drug_b, drug_a)
                };
                format!("interaction|{}|{}", first.key(), second.key())
            }
            Trigger::Contraindication { drug, condition } => {
                format!("contraindication|{}|{}", drug.key(), condition.key())
            }
            Trigger::DosingThreshold {
                drug, lab, op, threshold, ..
            } => {
                format!(
                    "dosing|{}|{}|{}{}",
                    drug.key(),
                    lab.key(),
                    op.symbol(),
                    threshold
                )
            }
        }
    }

    /// Checks trigger codes for structural validity.
    fn validate(&self) -> Result<(), RuleDefect> {
        match self {
            Trigger::Interaction { drug_a, drug_b } => {
                if drug_a.is_blank() || drug_b.is_blank() {
                    return Err(RuleDefect::BlankTriggerCode);
                }
                if drug_a == drug_b {
                    return Err(RuleDefect::SelfInteraction);
                }
            }
            Trigger::Contraindication { drug, condition } => {
                if drug.is_blank() || condition.is_blank() {
                    return Err(RuleDefect::BlankTriggerCode);
                }
            }
            Trigger::DosingThreshold {
                drug,
                lab,
                threshold,
                unit,
                max_observation_age_days,
                ..
            } => {
                if drug.is_blank() || lab.is_blank() {
                    return Err(RuleDefect::BlankTriggerCode);
                }
                if !threshold.is_finite() {
                    return Err(RuleDefect::NonFiniteThreshold);
                }
                if unit.trim().is_empty() {
                    return Err(RuleDefect::MissingUnit);
                }
                if *max_observation_age_days == 0 {
                    return Err(RuleDefect::ZeroObservationWindow);
                }
            }
        }
        Ok(())
    }
}

/// A compiled clinical safety rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable rule identifier, unique within a bundle
    pub id: String,

    /// Category-specific trigger predicate
    pub trigger: Trigger,

    /// Alert severity when the rule fires
    pub severity: Severity,

    /// Recommendation text surfaced to the clinician
    pub recommendation: String,

    /// Mandatory clinical provenance
    pub provenance: ClinicalProvenance,

    /// Lifecycle state; only the governance controller mutates this
    pub lifecycle: LifecycleState,

    /// Rule this one replaces, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,

    /// Rule that replaced this one, set at deprecation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
}

/// A structural defect in a rule definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDefect {
    /// Rule id is empty
    EmptyId,
    /// Recommendation text is empty
    EmptyRecommendation,
    /// A trigger code has an empty system or code component
    BlankTriggerCode,
    /// Interaction trigger names the same drug twice
    SelfInteraction,
    /// Dosing threshold is NaN or infinite
    NonFiniteThreshold,
    /// Dosing trigger lacks a unit
    MissingUnit,
    /// Dosing trigger has a zero-day observation window
    ZeroObservationWindow,
    /// Provenance is incomplete
    Provenance(ProvenanceDefect),
}

impl fmt::Display for RuleDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "rule id is empty"),
            Self::EmptyRecommendation => write!(f, "recommendation text is empty"),
            Self::BlankTriggerCode => write!(f, "trigger contains a blank clinical code"),
            Self::SelfInteraction => write!(f, "interaction trigger names the same drug twice"),
            Self::NonFiniteThreshold => write!(f, "dosing threshold is not a finite number"),
            Self::MissingUnit => write!(f, "dosing trigger has no unit"),
            Self::ZeroObservationWindow => {
                write!(f, "dosing trigger observation window is zero days")
            }
            Self::Provenance(defect) => write!(f, "incomplete provenance: {}", defect),
        }
    }
}

impl Rule {
    /// The rule's category, derived from its trigger.
    pub fn category(&self) -> RuleCategory {
        self.trigger.category()
    }

    /// Canonical trigger key (see [`Trigger::key`]).
    pub fn trigger_key(&self) -> String {
        self.trigger.key()
    }

    /// Validates the rule structurally, provenance included.
    ///
    /// Returns the first defect found. Called by the bundle builder and
    /// again by the content loader; both abort on any defect.
    pub fn validate(&self) -> Result<(), RuleDefect> {
        if self.id.trim().is_empty() {
            return Err(RuleDefect::EmptyId);
        }
        if self.recommendation.trim().is_empty() {
            return Err(RuleDefect::EmptyRecommendation);
        }
        self.trigger.validate()?;
        self.provenance.validate().map_err(RuleDefect::Provenance)?;
        Ok(())
    }
}
