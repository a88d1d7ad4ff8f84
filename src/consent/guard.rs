//! Consent guard trait and fail-closed authorization

use std::fmt;

use crate::audit::{AuditAction, AuditOutcome, AuditRecord, AuditSink};
use crate::observability::Logger;

use super::errors::{ConsentDeniedError, ConsentError};
use super::sealed::{AccessGrant, SealedFactSet};

/// Purpose of a fact-set access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Production decision support at the point of care
    TreatmentDecisionSupport,
    /// Reproduction of a historical evaluation for audit
    HistoricalAudit,
}

impl Purpose {
    /// Returns the purpose name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::TreatmentDecisionSupport => "TREATMENT_DECISION_SUPPORT",
            Purpose::HistoricalAudit => "HISTORICAL_AUDIT",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision returned by the consent collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentDecision {
    Authorized,
    Denied { reason: String },
}

/// External consent collaborator.
///
/// `check_consent` may block or call out to another service; it is invoked
/// exactly once per evaluation request, before any fact is read.
pub trait ConsentGuard: Send + Sync {
    fn check_consent(&self, patient_id: &str, purpose: Purpose)
        -> Result<ConsentDecision, ConsentError>;
}

/// Obtains an access grant for a sealed fact set, fail-closed.
///
/// A guard error is treated as denial: ambiguity never maps to allow. The
/// outcome (granted or denied) is appended to the audit sink before this
/// function returns.
pub fn authorize_access(
    guard: &dyn ConsentGuard,
    sealed: &SealedFactSet,
    purpose: Purpose,
    audit: &dyn AuditSink,
) -> Result<AccessGrant, ConsentDeniedError> {
    let patient_id = sealed.patient_id();

    let denial_reason = match guard.check_consent(patient_id, purpose) {
        Ok(ConsentDecision::Authorized) => {
            let _ = audit.append(
                &AuditRecord::new(AuditAction::ConsentChecked, AuditOutcome::Success)
                    .with_patient(patient_id)
                    .with_purpose(purpose.as_str()),
            );
            return Ok(AccessGrant::issue(patient_id, purpose));
        }
        Ok(ConsentDecision::Denied { reason }) => reason,
        // Guard failure maps to denial, never to allow
        Err(err) => format!("consent guard failed: {}", err),
    };

    let denied = ConsentDeniedError {
        patient_id: patient_id.to_string(),
        purpose: purpose.to_string(),
        reason: denial_reason,
    };
    let _ = audit.append(
        &AuditRecord::new(AuditAction::ConsentDenied, AuditOutcome::Rejected)
            .with_patient(patient_id)
            .with_purpose(purpose.as_str())
            .with_detail(denied.reason.clone()),
    );
    Logger::warn(
        "CONSENT_DENIED",
        &[("patient", patient_id), ("purpose", purpose.as_str())],
    );
    Err(denied)
}

/// Fixed-decision guard for embedding and tests.
pub struct StaticConsentGuard {
    decision: ConsentDecision,
}

impl StaticConsentGuard {
    /// A guard that authorizes every request.
    pub fn allow_all() -> Self {
        Self {
            decision: ConsentDecision::Authorized,
        }
    }

    /// A guard that denies every request with the given reason.
    pub fn deny_all(reason: impl Into<String>) -> Self {
        Self {
            decision: ConsentDecision::Denied {
                reason: reason.into(),
            },
        }
    }
}

impl ConsentGuard for StaticConsentGuard {
    fn check_consent(
        &self,
        _patient_id: &str,
        _purpose: Purpose,
    ) -> Result<ConsentDecision, ConsentError> {
        Ok(self.decision.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::facts::{Demographics, PatientFactSet};

    struct BrokenGuard;

    impl ConsentGuard for BrokenGuard {
        fn check_consent(
            &self,
            _patient_id: &str,
            _purpose: Purpose,
        ) -> Result<ConsentDecision, ConsentError> {
            Err(ConsentError::Timeout)
        }
    }

    fn sealed() -> SealedFactSet {
        SealedFactSet::seal(
            "p-100",
            PatientFactSet {
                medications: vec![],
                diagnoses: vec![],
                labs: vec![],
                demographics: Demographics {
                    age_years: 50,
                    weight_kg: None,
                    renal_impairment: false,
                },
                allergies: vec![],
            },
        )
    }

    #[test]
    fn test_authorized_issues_grant() {
        let audit = MemoryAuditSink::new();
        let guard = StaticConsentGuard::allow_all();
        let grant =
            authorize_access(&guard, &sealed(), Purpose::TreatmentDecisionSupport, &audit)
                .unwrap();
        assert!(grant.covers("p-100"));
        assert!(audit.contains_action(AuditAction::ConsentChecked));
    }

    #[test]
    fn test_denied_is_audited() {
        let audit = MemoryAuditSink::new();
        let guard = StaticConsentGuard::deny_all("patient opted out");
        let err =
            authorize_access(&guard, &sealed(), Purpose::TreatmentDecisionSupport, &audit)
                .unwrap_err();
        assert_eq!(err.reason, "patient opted out");
        assert!(audit.contains_action(AuditAction::ConsentDenied));
    }

    #[test]
    fn test_guard_failure_maps_to_denial() {
        let audit = MemoryAuditSink::new();
        let err = authorize_access(
            &BrokenGuard,
            &sealed(),
            Purpose::TreatmentDecisionSupport,
            &audit,
        )
        .unwrap_err();
        assert!(err.reason.contains("consent guard failed"));
        assert!(audit.contains_action(AuditAction::ConsentDenied));
    }
}
