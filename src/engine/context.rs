//! Evaluation context

use chrono::{DateTime, Utc};

use crate::consent::Purpose;
use crate::rules::LifecycleState;

/// Which lifecycle states may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Production evaluation: ACTIVE rules only
    Current,
    /// Historical reproduction by bundle version: ACTIVE and DEPRECATED.
    /// DRAFT never fires in any mode.
    Historical,
}

impl EvaluationMode {
    /// True when a rule in the given state participates in this mode.
    pub fn allows(&self, state: LifecycleState) -> bool {
        match (self, state) {
            (_, LifecycleState::Active) => true,
            (EvaluationMode::Historical, LifecycleState::Deprecated) => true,
            _ => false,
        }
    }
}

/// Caller-supplied evaluation parameters.
///
/// `as_of` is the reference instant for lab-recency windows and the output
/// timestamp. The engine never reads the wall clock, so replaying with the
/// same context reproduces the output exactly.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext {
    pub purpose: Purpose,
    pub as_of: DateTime<Utc>,
    pub mode: EvaluationMode,
}

impl EvaluationContext {
    /// Production context.
    pub fn new(purpose: Purpose, as_of: DateTime<Utc>) -> Self {
        Self {
            purpose,
            as_of,
            mode: EvaluationMode::Current,
        }
    }

    /// Historical-reproduction context.
    pub fn historical(as_of: DateTime<Utc>) -> Self {
        Self {
            purpose: Purpose::HistoricalAudit,
            as_of,
            mode: EvaluationMode::Historical,
        }
    }
}
