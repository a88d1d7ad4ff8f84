//! Clinical rule data model
//!
//! Rules are the unit of clinical content. Each rule is a tagged variant by
//! category (interaction, contraindication, dosing threshold) so every
//! dispatch site is forced by the compiler to handle all categories.
//!
//! # Design Principles
//!
//! - Provenance is mandatory; a rule without complete provenance is a defect,
//!   never a warning
//! - Lifecycle is a closed enum; invalid states are unrepresentable
//! - Trigger keys are canonical strings so identical triggers collide
//!   deterministically

mod provenance;
mod rule;
mod types;

pub use provenance::{ClinicalProvenance, ProvenanceDefect};
pub use rule::{Rule, RuleCategory, RuleDefect, Trigger};
pub use types::{ClinicalCode, ComparisonOp, EvidenceLevel, LifecycleState, Severity};
