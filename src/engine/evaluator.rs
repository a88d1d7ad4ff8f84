//! Rule engine
//!
//! Ties the pieces together for one evaluation request: consent first,
//! then input validation, then category dispatch against a single acquired
//! registry snapshot. The snapshot is held for the whole evaluation, so a
//! concurrent registry publish never tears a result.

use std::sync::Arc;

use crate::audit::{AuditAction, AuditOutcome, AuditRecord, AuditSink};
use crate::consent::{authorize_access, ConsentGuard, SealedFactSet};
use crate::observability::Logger;
use crate::registry::RegistryPublisher;
use crate::rules::{LifecycleState, Rule, RuleCategory};

use super::context::EvaluationContext;
use super::errors::EvaluationError;
use super::fallback::FallbackOrchestrator;
use super::matchers::{
    CategoryMatcher, ContraindicationMatcher, DosingThresholdMatcher, InteractionMatcher,
};
use super::output::ProtocolOutput;

/// The deterministic clinical rule evaluator.
pub struct RuleEngine {
    publisher: Arc<RegistryPublisher>,
    guard: Arc<dyn ConsentGuard>,
    audit: Arc<dyn AuditSink>,
}

impl RuleEngine {
    /// Creates an engine over a registry publisher, consent guard and
    /// audit sink.
    pub fn new(
        publisher: Arc<RegistryPublisher>,
        guard: Arc<dyn ConsentGuard>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            publisher,
            guard,
            audit,
        }
    }

    /// Evaluates a sealed fact set for the context's purpose.
    ///
    /// Order is fixed: consent check (fail-closed), fact access, input
    /// validation, category dispatch. No fact-set field is read before the
    /// consent guard authorizes the request. The result is a pure function
    /// of (registry snapshot, fact set, context); evaluation is never
    /// retried.
    pub fn evaluate(
        &self,
        sealed: &SealedFactSet,
        ctx: &EvaluationContext,
    ) -> Result<ProtocolOutput, EvaluationError> {
        let snapshot = self.publisher.acquire();

        let grant = authorize_access(self.guard.as_ref(), sealed, ctx.purpose, self.audit.as_ref())?;
        let facts = sealed.open(&grant)?;
        let _ = self.audit.append(
            &AuditRecord::new(AuditAction::FactAccess, AuditOutcome::Success)
                .with_patient(sealed.patient_id())
                .with_purpose(ctx.purpose.as_str()),
        );

        if let Err(defect) = facts.validate() {
            let _ = self.audit.append(
                &AuditRecord::new(AuditAction::EvaluationRejected, AuditOutcome::Rejected)
                    .with_patient(sealed.patient_id())
                    .with_detail(defect.to_string()),
            );
            return Err(EvaluationError::Input(defect));
        }

        let matchers: [&dyn CategoryMatcher; 3] = [
            &InteractionMatcher,
            &ContraindicationMatcher,
            &DosingThresholdMatcher,
        ];
        let category_findings = matchers
            .iter()
            .map(|matcher| matcher.evaluate(&snapshot, facts, ctx))
            .collect();

        let output = FallbackOrchestrator::finalize(&snapshot, facts, ctx, category_findings);

        let _ = self.audit.append(
            &AuditRecord::new(AuditAction::EvaluationCompleted, AuditOutcome::Success)
                .with_patient(sealed.patient_id())
                .with_purpose(ctx.purpose.as_str())
                .with_detail(output.summary()),
        );
        if output.degraded {
            Logger::warn(
                "EVALUATION_DEGRADED",
                &[
                    ("gaps", &output.insufficient_data.len().to_string()),
                    ("version", &output.bundle_version),
                ],
            );
        } else {
            Logger::info(
                "EVALUATION_COMPLETED",
                &[
                    ("findings", &output.findings.len().to_string()),
                    ("version", &output.bundle_version),
                ],
            );
        }

        Ok(output)
    }

    /// Looks up a rule in the current snapshot.
    pub fn get_rule(&self, rule_id: &str) -> Option<Rule> {
        self.publisher.acquire().get(rule_id).cloned()
    }

    /// Lists rules in the current snapshot, optionally filtered.
    pub fn list_rules(
        &self,
        category: Option<RuleCategory>,
        lifecycle: Option<LifecycleState>,
    ) -> Vec<Rule> {
        self.publisher
            .acquire()
            .list(category, lifecycle)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::bundle::{BundleBuilder, SourceRecord, SourceStore};
    use crate::consent::{Purpose, StaticConsentGuard};
    use crate::facts::{Demographics, Medication, PatientFactSet};
    use crate::registry::ContentLoader;
    use crate::rules::{
        ClinicalCode, ClinicalProvenance, EvidenceLevel, Severity, Trigger,
    };
    use chrono::{NaiveDate, Utc};

    fn provenance() -> ClinicalProvenance {
        ClinicalProvenance {
            source_citation: "Interaction compendium 2024".to_string(),
            published_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reviewed_by: "Pharmacy Review Committee".to_string(),
            evidence_level: EvidenceLevel::A,
            effective_from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            effective_until: None,
        }
    }

    fn engine_with_active_interaction() -> (RuleEngine, Arc<MemoryAuditSink>) {
        let mut store = SourceStore::new();
        let mut record = SourceRecord::draft(
            "ddi-warfarin-aspirin",
            Trigger::Interaction {
                drug_a: ClinicalCode::new("rxnorm", "11289"),
                drug_b: ClinicalCode::new("rxnorm", "1191"),
            },
            Severity::Major,
            "Avoid combination; increased bleeding risk.",
            provenance(),
        );
        record.lifecycle = crate::rules::LifecycleState::Active;
        store.insert(record).unwrap();

        let bundle = BundleBuilder::new("1.0.0").build(&store, Utc::now()).unwrap();
        let registry = ContentLoader::load(bundle.to_json().unwrap().as_bytes()).unwrap();
        let audit = Arc::new(MemoryAuditSink::new());
        let engine = RuleEngine::new(
            Arc::new(RegistryPublisher::new(registry)),
            Arc::new(StaticConsentGuard::allow_all()),
            audit.clone(),
        );
        (engine, audit)
    }

    fn warfarin_aspirin_facts() -> SealedFactSet {
        SealedFactSet::seal(
            "p-100",
            PatientFactSet {
                medications: vec![
                    Medication {
                        code: ClinicalCode::new("rxnorm", "11289"),
                        name: "warfarin".to_string(),
                    },
                    Medication {
                        code: ClinicalCode::new("rxnorm", "1191"),
                        name: "aspirin".to_string(),
                    },
                ],
                diagnoses: vec![],
                labs: vec![],
                demographics: Demographics {
                    age_years: 70,
                    weight_kg: None,
                    renal_impairment: false,
                },
                allergies: vec![],
            },
        )
    }

    #[test]
    fn test_interaction_fires_with_provenance() {
        let (engine, _) = engine_with_active_interaction();
        let ctx = EvaluationContext::new(
            Purpose::TreatmentDecisionSupport,
            "2026-08-20T00:00:00Z".parse().unwrap(),
        );
        let output = engine.evaluate(&warfarin_aspirin_facts(), &ctx).unwrap();
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].severity, Severity::Major);
        assert_eq!(
            output.findings[0].provenance_citation,
            "Interaction compendium 2024"
        );
        assert!(!output.degraded);
    }

    #[test]
    fn test_denied_consent_blocks_fact_access() {
        let audit = Arc::new(MemoryAuditSink::new());
        let denied_engine = RuleEngine::new(
            Arc::new(RegistryPublisher::new(
                ContentLoader::load(
                    BundleBuilder::new("1.0.0")
                        .build(&SourceStore::new(), Utc::now())
                        .unwrap()
                        .to_json()
                        .unwrap()
                        .as_bytes(),
                )
                .unwrap(),
            )),
            Arc::new(StaticConsentGuard::deny_all("opted out")),
            audit.clone(),
        );

        let ctx = EvaluationContext::new(
            Purpose::TreatmentDecisionSupport,
            "2026-08-20T00:00:00Z".parse().unwrap(),
        );
        let err = denied_engine
            .evaluate(&warfarin_aspirin_facts(), &ctx)
            .unwrap_err();
        assert!(matches!(err, EvaluationError::ConsentDenied(_)));
        assert!(audit.contains_action(AuditAction::ConsentDenied));
        assert!(!audit.contains_action(AuditAction::FactAccess));
    }

    #[test]
    fn test_malformed_input_rejected_whole() {
        let (engine, audit) = engine_with_active_interaction();
        let facts = SealedFactSet::seal(
            "p-100",
            PatientFactSet {
                medications: vec![Medication {
                    code: ClinicalCode::new("", ""),
                    name: "mystery".to_string(),
                }],
                diagnoses: vec![],
                labs: vec![],
                demographics: Demographics {
                    age_years: 70,
                    weight_kg: None,
                    renal_impairment: false,
                },
                allergies: vec![],
            },
        );
        let ctx = EvaluationContext::new(
            Purpose::TreatmentDecisionSupport,
            "2026-08-20T00:00:00Z".parse().unwrap(),
        );
        let err = engine.evaluate(&facts, &ctx).unwrap_err();
        assert!(matches!(err, EvaluationError::Input(_)));
        assert!(audit.contains_action(AuditAction::EvaluationRejected));
    }

    #[test]
    fn test_get_and_list_rules() {
        let (engine, _) = engine_with_active_interaction();
        assert!(engine.get_rule("ddi-warfarin-aspirin").is_some());
        assert!(engine.get_rule("missing").is_none());
        assert_eq!(
            engine
                .list_rules(Some(RuleCategory::Interaction), None)
                .len(),
            1
        );
        assert_eq!(
            engine
                .list_rules(Some(RuleCategory::DosingThreshold), None)
                .len(),
            0
        );
    }
}
