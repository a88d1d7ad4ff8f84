//! Governance error types
//!
//! A rejected transition changes no state and emits no transition event;
//! only a rejection record reaches the audit trail.

use std::fmt;

/// Governance error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernanceTransitionErrorKind {
    /// Rule id not present in the source store
    UnknownRule,
    /// Transition not permitted from the rule's current state
    ForbiddenTransition,
    /// Promotion denied by policy
    PromotionDenied,
    /// superseded_by references a rule that does not exist
    UnknownReplacement,
    /// Post-transition bundle rebuild failed; the transition was reverted
    RebuildFailed,
}

/// A rejected governance transition.
#[derive(Debug, Clone)]
pub struct GovernanceTransitionError {
    /// Error kind
    pub kind: GovernanceTransitionErrorKind,
    /// Error message
    pub message: String,
}

impl GovernanceTransitionError {
    /// Creates a new transition error.
    pub fn new(kind: GovernanceTransitionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unknown rule id.
    pub fn unknown_rule(rule_id: &str) -> Self {
        Self::new(
            GovernanceTransitionErrorKind::UnknownRule,
            format!("no rule with id '{}'", rule_id),
        )
    }

    /// Forbidden transition from the current state.
    pub fn forbidden_transition(rule_id: &str, from: &str, attempted: &str) -> Self {
        Self::new(
            GovernanceTransitionErrorKind::ForbiddenTransition,
            format!("rule '{}': cannot {} from {}", rule_id, attempted, from),
        )
    }

    /// Promotion denied by policy.
    pub fn promotion_denied(rule_id: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            GovernanceTransitionErrorKind::PromotionDenied,
            format!("rule '{}': {}", rule_id, reason),
        )
    }

    /// Unknown replacement rule.
    pub fn unknown_replacement(rule_id: &str, replacement: &str) -> Self {
        Self::new(
            GovernanceTransitionErrorKind::UnknownReplacement,
            format!(
                "rule '{}': superseded_by '{}' does not exist",
                rule_id, replacement
            ),
        )
    }

    /// Rebuild failure after a transition; state was reverted.
    pub fn rebuild_failed(detail: impl fmt::Display) -> Self {
        Self::new(
            GovernanceTransitionErrorKind::RebuildFailed,
            format!("bundle rebuild failed, transition reverted: {}", detail),
        )
    }
}

impl fmt::Display for GovernanceTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GovernanceTransitionError({:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for GovernanceTransitionError {}

/// Result type for governance operations
pub type GovernanceResult<T> = Result<T, GovernanceTransitionError>;
