//! Shared clinical vocabulary types
//!
//! Coded concepts, severity levels, evidence grades, lifecycle states and
//! threshold comparison operators. All enums are closed; serialization uses
//! stable SCREAMING_SNAKE strings in the bundle format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coded clinical concept: a drug (e.g. RxNorm), a lab (e.g. LOINC) or a
/// diagnosis (e.g. ICD-10).
///
/// Codes are compared case-sensitively on both system and code. Matching is
/// always exact; there is no fuzzy or hierarchical code expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClinicalCode {
    /// Code system identifier (e.g. "rxnorm", "loinc", "icd10")
    pub system: String,
    /// Code within the system
    pub code: String,
}

impl ClinicalCode {
    /// Creates a new coded concept.
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            code: code.into(),
        }
    }

    /// Returns true when either component is empty.
    pub fn is_blank(&self) -> bool {
        self.system.is_empty() || self.code.is_empty()
    }

    /// Canonical `system:code` form used in trigger keys and indexes.
    pub fn key(&self) -> String {
        format!("{}:{}", self.system, self.code)
    }
}

impl fmt::Display for ClinicalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.system, self.code)
    }
}

/// Alert severity. Ordering is by clinical urgency: `Major` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Potentially life-threatening; requires action
    Major = 0,
    /// Clinically significant; requires review
    Moderate = 1,
    /// Informational
    Minor = 2,
}

impl Severity {
    /// Returns the severity name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Major => "MAJOR",
            Severity::Moderate => "MODERATE",
            Severity::Minor => "MINOR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evidence grade of the clinical source backing a rule.
///
/// `A` is the strongest. Ordering follows grade strength, so
/// `level <= minimum` means "at least as strong as the minimum".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvidenceLevel {
    /// High-quality evidence (e.g. systematic review, regulatory label)
    A = 0,
    /// Moderate-quality evidence
    B = 1,
    /// Limited evidence
    C = 2,
    /// Expert opinion only
    D = 3,
}

impl EvidenceLevel {
    /// True when this level is at least as strong as `minimum`.
    pub fn satisfies(&self, minimum: EvidenceLevel) -> bool {
        *self <= minimum
    }

    /// Returns the grade letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceLevel::A => "A",
            EvidenceLevel::B => "B",
            EvidenceLevel::C => "C",
            EvidenceLevel::D => "D",
        }
    }
}

impl fmt::Display for EvidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule lifecycle state.
///
/// Transitions are owned exclusively by the governance controller:
/// DRAFT → ACTIVE (promote), ACTIVE → DEPRECATED (deprecate). Rules are
/// never deleted; deprecation is the only removal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Authored but not yet approved; never fires in production evaluation
    Draft,
    /// Approved; participates in evaluation
    Active,
    /// Retired; fires only for explicit historical reproduction
    Deprecated,
}

impl LifecycleState {
    /// Returns the state name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Draft => "DRAFT",
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Deprecated => "DEPRECATED",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison operator for lab-threshold triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOp {
    /// value < threshold
    Lt,
    /// value <= threshold
    Le,
    /// value > threshold
    Gt,
    /// value >= threshold
    Ge,
}

impl ComparisonOp {
    /// Applies the operator to an observed value against a threshold.
    pub fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOp::Lt => value < threshold,
            ComparisonOp::Le => value <= threshold,
            ComparisonOp::Gt => value > threshold,
            ComparisonOp::Ge => value >= threshold,
        }
    }

    /// Returns the operator symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
