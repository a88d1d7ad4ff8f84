//! Category matchers
//!
//! Each rule category owns its own matcher behind a common trait, so the
//! engine's dispatch loop is category-agnostic. Matchers probe the registry
//! indexes with coded facts and apply the category-specific predicate to
//! each candidate.

use chrono::Duration;

use crate::facts::{LabObservation, PatientFactSet};
use crate::registry::Registry;
use crate::rules::{Rule, RuleCategory, Trigger};

use super::context::EvaluationContext;
use super::output::{DataGap, FiredRule, GapReason};

/// Result of one category's matching pass.
#[derive(Debug, Default)]
pub struct CategoryFindings {
    pub fired: Vec<FiredRule>,
    pub gaps: Vec<DataGap>,
}

/// Category-specific matching logic.
pub trait CategoryMatcher {
    /// The category this matcher handles.
    fn category(&self) -> RuleCategory;

    /// Probes the registry and applies the category predicate.
    ///
    /// Pure: reads the snapshot and facts, mutates nothing.
    fn evaluate(
        &self,
        registry: &Registry,
        facts: &PatientFactSet,
        ctx: &EvaluationContext,
    ) -> CategoryFindings;
}

fn fired(rule: &Rule) -> FiredRule {
    FiredRule {
        rule_id: rule.id.clone(),
        category: rule.category(),
        severity: rule.severity,
        recommendation: rule.recommendation.clone(),
        provenance_citation: rule.provenance.source_citation.clone(),
    }
}

/// Drug-drug interaction matcher: exact unordered code-pair match.
pub struct InteractionMatcher;

impl CategoryMatcher for InteractionMatcher {
    fn category(&self) -> RuleCategory {
        RuleCategory::Interaction
    }

    fn evaluate(
        &self,
        registry: &Registry,
        facts: &PatientFactSet,
        ctx: &EvaluationContext,
    ) -> CategoryFindings {
        let mut findings = CategoryFindings::default();
        let meds = &facts.medications;

        for i in 0..meds.len() {
            for j in (i + 1)..meds.len() {
                for rule in registry.interactions_for(&meds[i].code, &meds[j].code) {
                    if ctx.mode.allows(rule.lifecycle) {
                        findings.fired.push(fired(rule));
                    }
                }
            }
        }
        findings
    }
}

/// Contraindication matcher: active drug against an active diagnosis or a
/// coded allergy.
pub struct ContraindicationMatcher;

impl CategoryMatcher for ContraindicationMatcher {
    fn category(&self) -> RuleCategory {
        RuleCategory::Contraindication
    }

    fn evaluate(
        &self,
        registry: &Registry,
        facts: &PatientFactSet,
        ctx: &EvaluationContext,
    ) -> CategoryFindings {
        let mut findings = CategoryFindings::default();

        for med in &facts.medications {
            for rule in registry.contraindications_for(&med.code) {
                if !ctx.mode.allows(rule.lifecycle) {
                    continue;
                }
                let Trigger::Contraindication { condition, .. } = &rule.trigger else {
                    continue;
                };
                let present = facts.diagnoses.iter().any(|dx| &dx.code == condition)
                    || facts.allergies.iter().any(|a| &a.code == condition);
                if present {
                    findings.fired.push(fired(rule));
                }
            }
        }
        findings
    }
}

/// Lab-threshold matcher (e.g. renal-function-adjusted anticoagulant
/// dosing).
///
/// Requires a sufficiently recent observation of the trigger's lab; when
/// none exists the check degrades to an explicit data gap instead of
/// silently passing.
pub struct DosingThresholdMatcher;

impl DosingThresholdMatcher {
    /// Most recent observation of `lab` at or before the reference instant.
    fn latest_observation<'a>(
        facts: &'a PatientFactSet,
        lab: &crate::rules::ClinicalCode,
        ctx: &EvaluationContext,
    ) -> Option<&'a LabObservation> {
        facts
            .labs
            .iter()
            .filter(|obs| &obs.code == lab && obs.observed_at <= ctx.as_of)
            .max_by_key(|obs| obs.observed_at)
    }
}

impl CategoryMatcher for DosingThresholdMatcher {
    fn category(&self) -> RuleCategory {
        RuleCategory::DosingThreshold
    }

    fn evaluate(
        &self,
        registry: &Registry,
        facts: &PatientFactSet,
        ctx: &EvaluationContext,
    ) -> CategoryFindings {
        let mut findings = CategoryFindings::default();

        for med in &facts.medications {
            for rule in registry.dosing_rules_for(&med.code) {
                if !ctx.mode.allows(rule.lifecycle) {
                    continue;
                }
                let Trigger::DosingThreshold {
                    lab,
                    op,
                    threshold,
                    unit,
                    max_observation_age_days,
                    ..
                } = &rule.trigger
                else {
                    continue;
                };

                let gap = |reason: GapReason| DataGap {
                    rule_id: rule.id.clone(),
                    category: RuleCategory::DosingThreshold,
                    lab: lab.clone(),
                    reason,
                    recommendation: format!(
                        "Obtain a current {} ({}) result before treatment with {}; \
                         the dose check could not be performed.",
                        lab, unit, med.name
                    ),
                };

                match Self::latest_observation(facts, lab, ctx) {
                    None => findings.gaps.push(gap(GapReason::MissingObservation)),
                    Some(obs) => {
                        let age = ctx.as_of - obs.observed_at;
                        if age > Duration::days(i64::from(*max_observation_age_days)) {
                            findings.gaps.push(gap(GapReason::StaleObservation));
                        } else if obs.unit != *unit {
                            findings.gaps.push(gap(GapReason::UnitMismatch));
                        } else if op.compare(obs.value, *threshold) {
                            findings.fired.push(fired(rule));
                        }
                    }
                }
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::Purpose;
    use crate::facts::{Demographics, Diagnosis, Medication};
    use crate::registry::ContentLoader;
    use crate::rules::{
        ClinicalCode, ClinicalProvenance, ComparisonOp, EvidenceLevel, LifecycleState, Severity,
    };
    use crate::bundle::{BundleBuilder, SourceRecord, SourceStore};
    use chrono::{DateTime, NaiveDate, Utc};

    fn provenance() -> ClinicalProvenance {
        ClinicalProvenance {
            source_citation: "Renal dosing guideline 2024".to_string(),
            published_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reviewed_by: "Nephrology Board".to_string(),
            evidence_level: EvidenceLevel::A,
            effective_from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            effective_until: None,
        }
    }

    fn apixaban() -> ClinicalCode {
        ClinicalCode::new("rxnorm", "1364430")
    }

    fn crcl() -> ClinicalCode {
        ClinicalCode::new("loinc", "2164-2")
    }

    fn registry_with_dosing_rule(lifecycle: LifecycleState) -> Registry {
        let mut store = SourceStore::new();
        let mut record = SourceRecord::draft(
            "dose-apixaban-crcl",
            Trigger::DosingThreshold {
                drug: apixaban(),
                lab: crcl(),
                op: ComparisonOp::Lt,
                threshold: 30.0,
                unit: "mL/min".to_string(),
                max_observation_age_days: 90,
            },
            Severity::Major,
            "Reduce apixaban dose; severe renal impairment.",
            provenance(),
        );
        record.lifecycle = lifecycle;
        store.insert(record).unwrap();
        let bundle = BundleBuilder::new("t").build(&store, Utc::now()).unwrap();
        ContentLoader::load(bundle.to_json().unwrap().as_bytes()).unwrap()
    }

    fn facts_with_lab(value: Option<f64>, observed_at: &str) -> PatientFactSet {
        PatientFactSet {
            medications: vec![Medication {
                code: apixaban(),
                name: "apixaban".to_string(),
            }],
            diagnoses: vec![Diagnosis {
                code: ClinicalCode::new("icd10", "I48.91"),
                name: "atrial fibrillation".to_string(),
            }],
            labs: value
                .map(|v| {
                    vec![crate::facts::LabObservation {
                        code: crcl(),
                        value: v,
                        unit: "mL/min".to_string(),
                        observed_at: observed_at.parse().unwrap(),
                    }]
                })
                .unwrap_or_default(),
            demographics: Demographics {
                age_years: 81,
                weight_kg: Some(58.0),
                renal_impairment: true,
            },
            allergies: vec![],
        }
    }

    fn ctx(as_of: &str) -> EvaluationContext {
        let as_of: DateTime<Utc> = as_of.parse().unwrap();
        EvaluationContext::new(Purpose::TreatmentDecisionSupport, as_of)
    }

    #[test]
    fn test_threshold_breach_fires() {
        let registry = registry_with_dosing_rule(LifecycleState::Active);
        let facts = facts_with_lab(Some(25.0), "2026-08-01T09:00:00Z");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert_eq!(findings.fired.len(), 1);
        assert!(findings.gaps.is_empty());
        assert_eq!(findings.fired[0].rule_id, "dose-apixaban-crcl");
    }

    #[test]
    fn test_value_above_threshold_is_silent_but_not_a_gap() {
        let registry = registry_with_dosing_rule(LifecycleState::Active);
        let facts = facts_with_lab(Some(72.0), "2026-08-01T09:00:00Z");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert!(findings.fired.is_empty());
        assert!(findings.gaps.is_empty());
    }

    #[test]
    fn test_missing_observation_degrades() {
        let registry = registry_with_dosing_rule(LifecycleState::Active);
        let facts = facts_with_lab(None, "unused");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert!(findings.fired.is_empty());
        assert_eq!(findings.gaps.len(), 1);
        assert_eq!(findings.gaps[0].reason, GapReason::MissingObservation);
        assert!(findings.gaps[0].recommendation.contains("before treatment"));
    }

    #[test]
    fn test_stale_observation_degrades() {
        let registry = registry_with_dosing_rule(LifecycleState::Active);
        let facts = facts_with_lab(Some(25.0), "2026-01-01T09:00:00Z");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert_eq!(findings.gaps.len(), 1);
        assert_eq!(findings.gaps[0].reason, GapReason::StaleObservation);
    }

    #[test]
    fn test_future_observation_is_not_visible() {
        let registry = registry_with_dosing_rule(LifecycleState::Active);
        let facts = facts_with_lab(Some(25.0), "2026-09-01T09:00:00Z");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert_eq!(findings.gaps.len(), 1);
        assert_eq!(findings.gaps[0].reason, GapReason::MissingObservation);
    }

    #[test]
    fn test_draft_rule_never_fires_or_gaps() {
        let registry = registry_with_dosing_rule(LifecycleState::Draft);
        let facts = facts_with_lab(Some(25.0), "2026-08-01T09:00:00Z");
        let findings =
            DosingThresholdMatcher.evaluate(&registry, &facts, &ctx("2026-08-20T00:00:00Z"));
        assert!(findings.fired.is_empty());
        assert!(findings.gaps.is_empty());
    }
}
