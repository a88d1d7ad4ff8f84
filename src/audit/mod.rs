//! Audit trail
//!
//! Append-only record of consent decisions, fact access, evaluation
//! summaries and governance transitions. Records are durable (file sink
//! syncs every append) and never mutated. Delivery beyond the sink is the
//! audit collaborator's concern; the engine appends and moves on.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Audit action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Consent was checked for an evaluation request
    ConsentChecked,
    /// Consent was denied (or the guard failed; failure maps to denial)
    ConsentDenied,
    /// Patient facts were opened for evaluation
    FactAccess,
    /// An evaluation completed and produced output
    EvaluationCompleted,
    /// An evaluation was rejected for malformed input
    EvaluationRejected,
    /// A rule lifecycle transition was applied
    GovernanceTransition,
    /// A rule lifecycle transition was rejected
    GovernanceRejected,
    /// A clinical override of a fired rule was recorded
    ClinicalOverride,
}

impl AuditAction {
    /// Returns the action name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ConsentChecked => "CONSENT_CHECKED",
            AuditAction::ConsentDenied => "CONSENT_DENIED",
            AuditAction::FactAccess => "FACT_ACCESS",
            AuditAction::EvaluationCompleted => "EVALUATION_COMPLETED",
            AuditAction::EvaluationRejected => "EVALUATION_REJECTED",
            AuditAction::GovernanceTransition => "GOVERNANCE_TRANSITION",
            AuditAction::GovernanceRejected => "GOVERNANCE_REJECTED",
            AuditAction::ClinicalOverride => "CLINICAL_OVERRIDE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit record outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Rejected,
    Failed,
}

impl AuditOutcome {
    /// Returns the outcome string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "SUCCESS",
            AuditOutcome::Rejected => "REJECTED",
            AuditOutcome::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single audit record.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// Unique record id
    pub id: Uuid,
    /// When the action occurred (UTC)
    pub occurred_at: DateTime<Utc>,
    /// The action
    pub action: AuditAction,
    /// Outcome of the action
    pub outcome: AuditOutcome,
    /// Patient the action concerned, if any
    pub patient_id: Option<String>,
    /// Rule the action concerned, if any
    pub rule_id: Option<String>,
    /// Acting identity (governance actor, calling service)
    pub actor: Option<String>,
    /// Evaluation purpose, if applicable
    pub purpose: Option<String>,
    /// Free-form detail (reason, error message, output summary)
    pub detail: Option<String>,
}

impl AuditRecord {
    /// Creates a new record stamped now.
    pub fn new(action: AuditAction, outcome: AuditOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            action,
            outcome,
            patient_id: None,
            rule_id: None,
            actor: None,
            purpose: None,
            detail: None,
        }
    }

    /// Sets the patient id.
    pub fn with_patient(mut self, id: impl Into<String>) -> Self {
        self.patient_id = Some(id.into());
        self
    }

    /// Sets the rule id.
    pub fn with_rule(mut self, id: impl Into<String>) -> Self {
        self.rule_id = Some(id.into());
        self
    }

    /// Sets the actor.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Sets the purpose.
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Sets the detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Serializes to a single JSON line for append-only logging.
    pub fn to_json(&self) -> String {
        let mut json = format!(
            r#"{{"id":"{}","at":"{}","action":"{}","outcome":"{}""#,
            self.id,
            self.occurred_at.to_rfc3339(),
            self.action,
            self.outcome
        );
        if let Some(ref patient) = self.patient_id {
            json.push_str(&format!(r#","patient":"{}""#, escape_json(patient)));
        }
        if let Some(ref rule) = self.rule_id {
            json.push_str(&format!(r#","rule":"{}""#, escape_json(rule)));
        }
        if let Some(ref actor) = self.actor {
            json.push_str(&format!(r#","actor":"{}""#, escape_json(actor)));
        }
        if let Some(ref purpose) = self.purpose {
            json.push_str(&format!(r#","purpose":"{}""#, escape_json(purpose)));
        }
        if let Some(ref detail) = self.detail {
            json.push_str(&format!(r#","detail":"{}""#, escape_json(detail)));
        }
        json.push('}');
        json
    }
}

/// Escape special JSON characters.
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Append-only audit sink.
///
/// `append` must be synchronous: the record is visible once the call
/// returns. Callers treat appends as fire-and-forget and never retry.
pub trait AuditSink: Send + Sync {
    /// Appends a record to the audit trail.
    fn append(&self, record: &AuditRecord) -> io::Result<()>;

    /// Syncs the trail to durable storage.
    fn sync(&self) -> io::Result<()>;
}

/// File-based audit sink: one JSON record per line, fsync per append.
pub struct FileAuditSink {
    path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
}

impl FileAuditSink {
    /// Opens or creates an append-only audit file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    /// The audit file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditSink {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let json = record.to_json();
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    fn sync(&self) -> io::Result<()> {
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.get_ref().sync_all()
    }
}

/// In-memory audit sink for tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    /// True when any record has the given action.
    pub fn contains_action(&self, action: AuditAction) -> bool {
        self.records.lock().unwrap().iter().any(|r| r.action == action)
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}
