//! Content source store
//!
//! Raw rule authoring records, fully annotated with provenance. The store is
//! pure data: it holds records, preserves insertion order, and refuses
//! duplicate identifiers. Records are never deleted; lifecycle changes are
//! the governance controller's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::{BundleError, BundleResult};
use crate::rules::{ClinicalProvenance, LifecycleState, Rule, Severity, Trigger};

/// A raw authoring record, the source form of a rule.
///
/// New records enter the store as DRAFT; promotion is a governance
/// transition, never an authoring-time decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub trigger: Trigger,
    pub severity: Severity,
    pub recommendation: String,
    pub provenance: ClinicalProvenance,
    pub lifecycle: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
}

impl SourceRecord {
    /// Creates a new DRAFT record.
    pub fn draft(
        id: impl Into<String>,
        trigger: Trigger,
        severity: Severity,
        recommendation: impl Into<String>,
        provenance: ClinicalProvenance,
    ) -> Self {
        Self {
            id: id.into(),
            trigger,
            severity,
            recommendation: recommendation.into(),
            provenance,
            lifecycle: LifecycleState::Draft,
            supersedes: None,
            superseded_by: None,
        }
    }

    /// Compiles the record into a bundle rule.
    pub fn compile(&self) -> Rule {
        Rule {
            id: self.id.clone(),
            trigger: self.trigger.clone(),
            severity: self.severity,
            recommendation: self.recommendation.clone(),
            provenance: self.provenance.clone(),
            lifecycle: self.lifecycle,
            supersedes: self.supersedes.clone(),
            superseded_by: self.superseded_by.clone(),
        }
    }
}

/// In-memory source store with stable iteration order.
#[derive(Debug, Default)]
pub struct SourceStore {
    order: Vec<String>,
    records: HashMap<String, SourceRecord>,
}

impl SourceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, rejecting duplicate identifiers.
    pub fn insert(&mut self, record: SourceRecord) -> BundleResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(BundleError::DuplicateRuleId(record.id));
        }
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&SourceRecord> {
        self.records.get(id)
    }

    /// Mutable lookup, used by the governance controller only.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SourceRecord> {
        self.records.get_mut(id)
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
