//! Protocol output
//!
//! The ordered, reproducible result of one evaluation: fired rules sorted
//! by severity then rule id, explicit data gaps, and an input-snapshot
//! hash binding the output to exactly the inputs that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bundle::{compute_checksum, format_checksum};
use crate::facts::PatientFactSet;
use crate::rules::{ClinicalCode, RuleCategory, Severity};

/// One fired rule in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredRule {
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub recommendation: String,
    /// Provenance citation of the rule, carried so every alert is
    /// traceable without a registry lookup
    pub provenance_citation: String,
}

/// Why a required observation could not support a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapReason {
    /// No observation of the required lab at all
    MissingObservation,
    /// Latest observation is older than the clinically valid window
    StaleObservation,
    /// Observation exists but its unit does not match the rule's
    UnitMismatch,
}

/// A category check that could not run for lack of valid data.
///
/// Carried in the output so the absence of data is never indistinguishable
/// from the absence of risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGap {
    pub rule_id: String,
    pub category: RuleCategory,
    /// The lab whose observation is missing or unusable
    pub lab: ClinicalCode,
    pub reason: GapReason,
    /// What the clinician should do before treatment
    pub recommendation: String,
}

/// Ordered result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolOutput {
    /// Content version of the registry snapshot evaluated against
    pub bundle_version: String,
    /// The caller-supplied reference instant
    pub evaluated_at: DateTime<Utc>,
    /// Purpose string of the authorized access
    pub purpose: String,
    /// SHA-256 over (bundle version, canonical fact-set bytes)
    pub input_snapshot_hash: String,
    /// Fired rules, sorted by severity (major first) then rule id
    pub findings: Vec<FiredRule>,
    /// Checks that could not run for lack of valid data
    pub insufficient_data: Vec<DataGap>,
    /// True iff any required check was degraded
    pub degraded: bool,
}

impl ProtocolOutput {
    /// One-line summary for the audit trail.
    pub fn summary(&self) -> String {
        format!(
            "version={} findings={} gaps={} hash={}",
            self.bundle_version,
            self.findings.len(),
            self.insufficient_data.len(),
            self.input_snapshot_hash
        )
    }
}

/// Hashes the evaluation inputs: bundle version and canonical fact bytes.
///
/// A separator byte keeps (version, facts) framing unambiguous.
pub(super) fn input_snapshot_hash(bundle_version: &str, facts: &PatientFactSet) -> String {
    let mut payload = Vec::new();
    payload.extend_from_slice(bundle_version.as_bytes());
    payload.push(0);
    payload.extend_from_slice(&facts.canonical_bytes());
    format_checksum(&compute_checksum(&payload))
}
