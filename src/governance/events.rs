//! Governance events
//!
//! Append-only record of lifecycle transitions. Events are emitted to the
//! audit sink and returned to the caller; they are never mutated.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    /// DRAFT → ACTIVE
    Promoted,
    /// ACTIVE → DEPRECATED
    Deprecated,
    /// ACTIVE rule fired but was clinically overridden; no state change
    Overridden,
}

impl TransitionKind {
    /// Returns the kind name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Promoted => "PROMOTED",
            TransitionKind::Deprecated => "DEPRECATED",
            TransitionKind::Overridden => "OVERRIDDEN",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single governance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceEvent {
    /// Unique event id
    pub event_id: Uuid,
    /// Rule the transition applied to
    pub rule_id: String,
    /// Transition kind
    pub kind: TransitionKind,
    /// Acting identity (clinician, review board, tooling user)
    pub actor: String,
    /// Stated reason for the transition
    pub reason: String,
    /// When the transition occurred (UTC)
    pub occurred_at: DateTime<Utc>,
}

impl GovernanceEvent {
    /// Creates a new event stamped now.
    pub fn new(
        rule_id: impl Into<String>,
        kind: TransitionKind,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            rule_id: rule_id.into(),
            kind,
            actor: actor.into(),
            reason: reason.into(),
            occurred_at: Utc::now(),
        }
    }
}
