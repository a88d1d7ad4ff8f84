//! Governance controller
//!
//! The only mutator of rule lifecycle state. Each successful promote or
//! deprecate rebuilds the bundle from the source store, re-verifies it
//! through the content loader, and publishes a fresh registry snapshot. A
//! rebuild failure reverts the transition, so the published registry and
//! the source store never disagree.

use std::sync::Arc;

use chrono::Utc;

use crate::audit::{AuditAction, AuditOutcome, AuditRecord, AuditSink};
use crate::bundle::{BundleBuilder, SourceStore};
use crate::observability::Logger;
use crate::registry::{ContentLoader, RegistryPublisher};
use crate::rules::LifecycleState;

use super::errors::{GovernanceResult, GovernanceTransitionError};
use super::events::{GovernanceEvent, TransitionKind};
use super::policy::PromotionPolicy;

/// Applies lifecycle transitions and republishes content.
pub struct GovernanceController {
    store: SourceStore,
    policy: PromotionPolicy,
    publisher: Arc<RegistryPublisher>,
    audit: Arc<dyn AuditSink>,
    base_version: String,
    revision: u64,
}

impl GovernanceController {
    /// Creates a controller over a source store.
    ///
    /// `base_version` seeds the content version; each republication appends
    /// an incremented revision (e.g. `2024.08.1-r3`).
    pub fn new(
        store: SourceStore,
        policy: PromotionPolicy,
        publisher: Arc<RegistryPublisher>,
        audit: Arc<dyn AuditSink>,
        base_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            policy,
            publisher,
            audit,
            base_version: base_version.into(),
            revision: 0,
        }
    }

    /// Read access to the source store.
    pub fn store(&self) -> &SourceStore {
        &self.store
    }

    /// The version string the next republication will carry.
    pub fn next_version(&self) -> String {
        format!("{}-r{}", self.base_version, self.revision + 1)
    }

    /// Promotes a DRAFT rule to ACTIVE.
    ///
    /// Rejected when the rule is unknown, not in DRAFT, or the promotion
    /// policy denies it (evidence below minimum, conflicting active rule).
    pub fn promote(&mut self, rule_id: &str, actor: &str) -> GovernanceResult<GovernanceEvent> {
        let record = match self.store.get(rule_id) {
            Some(record) => record.clone(),
            None => return Err(self.reject(rule_id, actor, GovernanceTransitionError::unknown_rule(rule_id))),
        };

        if record.lifecycle != LifecycleState::Draft {
            return Err(self.reject(
                rule_id,
                actor,
                GovernanceTransitionError::forbidden_transition(
                    rule_id,
                    record.lifecycle.as_str(),
                    "promote",
                ),
            ));
        }

        if let Err(denial) = self.policy.check_promotion(&record, &self.store) {
            return Err(self.reject(
                rule_id,
                actor,
                GovernanceTransitionError::promotion_denied(rule_id, denial),
            ));
        }

        self.apply_lifecycle(rule_id, LifecycleState::Active);
        if let Err(e) = self.republish() {
            self.apply_lifecycle(rule_id, LifecycleState::Draft);
            return Err(self.reject(rule_id, actor, e));
        }

        Ok(self.emit(rule_id, TransitionKind::Promoted, actor, "promoted to ACTIVE"))
    }

    /// Deprecates an ACTIVE rule, optionally linking its replacement.
    pub fn deprecate(
        &mut self,
        rule_id: &str,
        actor: &str,
        reason: &str,
        superseded_by: Option<&str>,
    ) -> GovernanceResult<GovernanceEvent> {
        let lifecycle = match self.store.get(rule_id) {
            Some(record) => record.lifecycle,
            None => return Err(self.reject(rule_id, actor, GovernanceTransitionError::unknown_rule(rule_id))),
        };

        if lifecycle != LifecycleState::Active {
            return Err(self.reject(
                rule_id,
                actor,
                GovernanceTransitionError::forbidden_transition(
                    rule_id,
                    lifecycle.as_str(),
                    "deprecate",
                ),
            ));
        }

        if let Some(replacement) = superseded_by {
            if self.store.get(replacement).is_none() {
                return Err(self.reject(
                    rule_id,
                    actor,
                    GovernanceTransitionError::unknown_replacement(rule_id, replacement),
                ));
            }
        }

        // Apply the transition and the supersession links
        {
            let record = self.store.get_mut(rule_id).expect("presence checked above");
            record.lifecycle = LifecycleState::Deprecated;
            record.superseded_by = superseded_by.map(str::to_string);
        }
        if let Some(replacement) = superseded_by {
            if let Some(next) = self.store.get_mut(replacement) {
                next.supersedes = Some(rule_id.to_string());
            }
        }

        if let Err(e) = self.republish() {
            // Revert both sides of the link
            if let Some(record) = self.store.get_mut(rule_id) {
                record.lifecycle = LifecycleState::Active;
                record.superseded_by = None;
            }
            if let Some(replacement) = superseded_by {
                if let Some(next) = self.store.get_mut(replacement) {
                    next.supersedes = None;
                }
            }
            return Err(self.reject(rule_id, actor, e));
        }

        Ok(self.emit(rule_id, TransitionKind::Deprecated, actor, reason))
    }

    /// Records a clinical override of a fired ACTIVE rule.
    ///
    /// No state change and no republication; the override exists purely in
    /// the governance trail.
    pub fn record_override(
        &mut self,
        rule_id: &str,
        actor: &str,
        reason: &str,
    ) -> GovernanceResult<GovernanceEvent> {
        let lifecycle = match self.store.get(rule_id) {
            Some(record) => record.lifecycle,
            None => return Err(self.reject(rule_id, actor, GovernanceTransitionError::unknown_rule(rule_id))),
        };
        if lifecycle != LifecycleState::Active {
            return Err(self.reject(
                rule_id,
                actor,
                GovernanceTransitionError::forbidden_transition(
                    rule_id,
                    lifecycle.as_str(),
                    "override",
                ),
            ));
        }

        let event = GovernanceEvent::new(rule_id, TransitionKind::Overridden, actor, reason);
        let _ = self.audit.append(
            &AuditRecord::new(AuditAction::ClinicalOverride, AuditOutcome::Success)
                .with_rule(rule_id)
                .with_actor(actor)
                .with_detail(reason),
        );
        Ok(event)
    }

    fn apply_lifecycle(&mut self, rule_id: &str, state: LifecycleState) {
        if let Some(record) = self.store.get_mut(rule_id) {
            record.lifecycle = state;
        }
    }

    /// Rebuilds the bundle from the store and publishes a fresh registry.
    ///
    /// The rebuilt bundle goes through the same loader verification as a
    /// bundle read from disk; governance gets no integrity shortcut.
    fn republish(&mut self) -> GovernanceResult<()> {
        let version = self.next_version();
        let bundle = BundleBuilder::new(version)
            .build(&self.store, Utc::now())
            .map_err(GovernanceTransitionError::rebuild_failed)?;
        let bytes = bundle
            .to_json()
            .map_err(GovernanceTransitionError::rebuild_failed)?
            .into_bytes();
        let registry =
            ContentLoader::load(&bytes).map_err(GovernanceTransitionError::rebuild_failed)?;
        self.publisher.publish(registry);
        self.revision += 1;
        Ok(())
    }

    fn emit(
        &self,
        rule_id: &str,
        kind: TransitionKind,
        actor: &str,
        reason: &str,
    ) -> GovernanceEvent {
        let event = GovernanceEvent::new(rule_id, kind, actor, reason);
        let _ = self.audit.append(
            &AuditRecord::new(AuditAction::GovernanceTransition, AuditOutcome::Success)
                .with_rule(rule_id)
                .with_actor(actor)
                .with_detail(format!("{}: {}", kind, reason)),
        );
        Logger::info(
            "GOVERNANCE_TRANSITION",
            &[("kind", kind.as_str()), ("rule", rule_id), ("actor", actor)],
        );
        event
    }

    fn reject(
        &self,
        rule_id: &str,
        actor: &str,
        error: GovernanceTransitionError,
    ) -> GovernanceTransitionError {
        let _ = self.audit.append(
            &AuditRecord::new(AuditAction::GovernanceRejected, AuditOutcome::Rejected)
                .with_rule(rule_id)
                .with_actor(actor)
                .with_detail(error.message.clone()),
        );
        Logger::warn(
            "GOVERNANCE_REJECTED",
            &[("rule", rule_id), ("detail", error.message.as_str())],
        );
        error
    }
}
