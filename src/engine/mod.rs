//! Rule engine subsystem
//!
//! The deterministic evaluator: given a registry snapshot and an authorized
//! patient fact set, produce an ordered protocol output of fired rules.
//!
//! # Design Principles
//!
//! - Evaluation is a pure function of (registry snapshot, fact set,
//!   context): no I/O, no mutation, no wall-clock reads, no retry
//! - Matches order by severity (major first) then rule id, so output is
//!   byte-reproducible
//! - Missing required data degrades the output explicitly; it never
//!   silently skips a safety check

mod context;
mod errors;
mod evaluator;
mod fallback;
mod matchers;
mod output;

pub use context::{EvaluationContext, EvaluationMode};
pub use errors::EvaluationError;
pub use evaluator::RuleEngine;
pub use fallback::FallbackOrchestrator;
pub use matchers::{
    CategoryFindings, CategoryMatcher, ContraindicationMatcher, DosingThresholdMatcher,
    InteractionMatcher,
};
pub use output::{DataGap, FiredRule, GapReason, ProtocolOutput};
