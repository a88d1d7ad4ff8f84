//! Immutable indexed registry
//!
//! Built once per bundle load, then read-only. Indexes answer trigger-key
//! probes in O(1) instead of scanning the rule list. Lifecycle filtering
//! happens at the query site, so a single registry serves both production
//! evaluation (ACTIVE only) and historical reproduction (ACTIVE plus
//! DEPRECATED).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::rules::{ClinicalCode, LifecycleState, Rule, RuleCategory, Trigger};

/// Immutable, indexed view of a loaded bundle.
///
/// Construction is private to the loader; every `Registry` in existence has
/// passed full integrity verification.
#[derive(Debug)]
pub struct Registry {
    version: String,
    built_at: DateTime<Utc>,
    /// Rule ids in bundle order (stable listing order)
    order: Vec<String>,
    rules: HashMap<String, Rule>,
    /// Unordered drug-pair key -> interaction rule ids
    interaction_index: HashMap<String, Vec<String>>,
    /// Drug code key -> contraindication rule ids
    contraindication_index: HashMap<String, Vec<String>>,
    /// Drug code key -> dosing-threshold rule ids.
    ///
    /// Keyed by drug, not lab: the fallback path must discover that a
    /// dosing check applies from the medication list alone, even when the
    /// required lab observation is absent.
    dosing_index: HashMap<String, Vec<String>>,
}

impl Registry {
    /// Builds a registry from verified rules. Loader-only.
    pub(super) fn build(version: String, built_at: DateTime<Utc>, rules: Vec<Rule>) -> Self {
        let mut order = Vec::with_capacity(rules.len());
        let mut by_id = HashMap::with_capacity(rules.len());
        let mut interaction_index: HashMap<String, Vec<String>> = HashMap::new();
        let mut contraindication_index: HashMap<String, Vec<String>> = HashMap::new();
        let mut dosing_index: HashMap<String, Vec<String>> = HashMap::new();

        for rule in rules {
            match &rule.trigger {
                Trigger::Interaction { drug_a, drug_b } => {
                    interaction_index
                        .entry(pair_key(drug_a, drug_b))
                        .or_default()
                        .push(rule.id.clone());
                }
                Trigger::Contraindication { drug, .. } => {
                    contraindication_index
                        .entry(drug.key())
                        .or_default()
                        .push(rule.id.clone());
                }
                Trigger::DosingThreshold { drug, .. } => {
                    dosing_index
                        .entry(drug.key())
                        .or_default()
                        .push(rule.id.clone());
                }
            }
            order.push(rule.id.clone());
            by_id.insert(rule.id.clone(), rule);
        }

        Self {
            version,
            built_at,
            order,
            rules: by_id,
            interaction_index,
            contraindication_index,
            dosing_index,
        }
    }

    /// Bundle content version this registry was built from.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Bundle build timestamp.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up a rule by id.
    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.get(rule_id)
    }

    /// Lists rules, optionally filtered by category and lifecycle state,
    /// in bundle order.
    pub fn list(
        &self,
        category: Option<RuleCategory>,
        lifecycle: Option<LifecycleState>,
    ) -> Vec<&Rule> {
        self.order
            .iter()
            .filter_map(|id| self.rules.get(id))
            .filter(|rule| category.map_or(true, |c| rule.category() == c))
            .filter(|rule| lifecycle.map_or(true, |s| rule.lifecycle == s))
            .collect()
    }

    /// Interaction rules covering an unordered drug pair.
    pub fn interactions_for(&self, a: &ClinicalCode, b: &ClinicalCode) -> Vec<&Rule> {
        self.probe(&self.interaction_index, &pair_key(a, b))
    }

    /// Contraindication rules triggered by a drug.
    pub fn contraindications_for(&self, drug: &ClinicalCode) -> Vec<&Rule> {
        self.probe(&self.contraindication_index, &drug.key())
    }

    /// Dosing-threshold rules gating a drug.
    pub fn dosing_rules_for(&self, drug: &ClinicalCode) -> Vec<&Rule> {
        self.probe(&self.dosing_index, &drug.key())
    }

    fn probe<'a>(&'a self, index: &'a HashMap<String, Vec<String>>, key: &str) -> Vec<&'a Rule> {
        index
            .get(key)
            .map(|ids| ids.iter().filter_map(|id| self.rules.get(id)).collect())
            .unwrap_or_default()
    }
}

/// Canonical key for an unordered drug pair.
fn pair_key(a: &ClinicalCode, b: &ClinicalCode) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{}|{}", first.key(), second.key())
}
