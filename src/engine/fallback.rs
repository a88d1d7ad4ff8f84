//! Fallback orchestration
//!
//! Assembles matcher results into the final protocol output. When a
//! required check could not run (no valid lab observation), the output is
//! degraded and carries the gap explicitly; a degraded output is still a
//! complete answer, never a silent omission.

use crate::facts::PatientFactSet;
use crate::registry::Registry;

use super::context::EvaluationContext;
use super::matchers::CategoryFindings;
use super::output::{input_snapshot_hash, ProtocolOutput};

/// Turns per-category findings into an ordered, hashed protocol output.
pub struct FallbackOrchestrator;

impl FallbackOrchestrator {
    /// Merges category findings, deduplicates, orders and stamps the
    /// output.
    ///
    /// Ordering is severity (major first) then rule id, for both findings
    /// and gaps, so repeated evaluations are byte-identical.
    pub fn finalize(
        registry: &Registry,
        facts: &PatientFactSet,
        ctx: &EvaluationContext,
        category_findings: Vec<CategoryFindings>,
    ) -> ProtocolOutput {
        let mut findings = Vec::new();
        let mut gaps = Vec::new();
        for mut result in category_findings {
            findings.append(&mut result.fired);
            gaps.append(&mut result.gaps);
        }

        // A rule fires at most once per evaluation, however many fact
        // combinations matched it.
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        findings.dedup_by(|a, b| a.rule_id == b.rule_id);

        gaps.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
        gaps.dedup_by(|a, b| a.rule_id == b.rule_id);

        let degraded = !gaps.is_empty();

        ProtocolOutput {
            bundle_version: registry.version().to_string(),
            evaluated_at: ctx.as_of,
            purpose: ctx.purpose.to_string(),
            input_snapshot_hash: input_snapshot_hash(registry.version(), facts),
            findings,
            insufficient_data: gaps,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::Purpose;
    use crate::engine::output::{DataGap, FiredRule, GapReason};
    use crate::facts::Demographics;
    use crate::rules::{ClinicalCode, RuleCategory, Severity};
    use chrono::Utc;

    fn empty_facts() -> PatientFactSet {
        PatientFactSet {
            medications: vec![],
            diagnoses: vec![],
            labs: vec![],
            demographics: Demographics {
                age_years: 60,
                weight_kg: None,
                renal_impairment: false,
            },
            allergies: vec![],
        }
    }

    fn fired(id: &str, severity: Severity) -> FiredRule {
        FiredRule {
            rule_id: id.to_string(),
            category: RuleCategory::Interaction,
            severity,
            recommendation: "r".to_string(),
            provenance_citation: "c".to_string(),
        }
    }

    fn registry() -> Registry {
        crate::registry::ContentLoader::load(
            crate::bundle::BundleBuilder::new("1.0.0")
                .build(&crate::bundle::SourceStore::new(), Utc::now())
                .unwrap()
                .to_json()
                .unwrap()
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_ordering_severity_then_id() {
        let ctx = EvaluationContext::new(Purpose::TreatmentDecisionSupport, Utc::now());
        let findings = CategoryFindings {
            fired: vec![
                fired("z-minor", Severity::Minor),
                fired("b-major", Severity::Major),
                fired("a-major", Severity::Major),
            ],
            gaps: vec![],
        };
        let output =
            FallbackOrchestrator::finalize(&registry(), &empty_facts(), &ctx, vec![findings]);
        let ids: Vec<_> = output.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["a-major", "b-major", "z-minor"]);
        assert!(!output.degraded);
    }

    #[test]
    fn test_duplicate_firings_collapse() {
        let ctx = EvaluationContext::new(Purpose::TreatmentDecisionSupport, Utc::now());
        let findings = CategoryFindings {
            fired: vec![fired("dup", Severity::Major), fired("dup", Severity::Major)],
            gaps: vec![],
        };
        let output =
            FallbackOrchestrator::finalize(&registry(), &empty_facts(), &ctx, vec![findings]);
        assert_eq!(output.findings.len(), 1);
    }

    #[test]
    fn test_any_gap_degrades_output() {
        let ctx = EvaluationContext::new(Purpose::TreatmentDecisionSupport, Utc::now());
        let findings = CategoryFindings {
            fired: vec![],
            gaps: vec![DataGap {
                rule_id: "dose-1".to_string(),
                category: RuleCategory::DosingThreshold,
                lab: ClinicalCode::new("loinc", "2164-2"),
                reason: GapReason::MissingObservation,
                recommendation: "Obtain lab.".to_string(),
            }],
        };
        let output =
            FallbackOrchestrator::finalize(&registry(), &empty_facts(), &ctx, vec![findings]);
        assert!(output.degraded);
        assert_eq!(output.insufficient_data.len(), 1);
    }
}
