//! Bundle Integrity Invariant Tests
//!
//! Tests for invariants:
//! - Content corruption is never ignored
//! - A bundle with any defect is rejected wholesale; zero rules from it
//!   become servable
//! - A failed reload leaves the previously published registry serving
//! - Provenance is mandatory on every loaded rule

use chrono::{NaiveDate, Utc};
use medguard::bundle::{
    compute_checksum, format_checksum, read_bundle_file, write_bundle_file, BundleBuilder,
    BundleManifest, CategoryCounts, ContentBundle, RetryPolicy, SourceRecord, SourceStore,
};
use medguard::registry::{ContentLoader, IntegrityErrorCode, RegistryPublisher};
use medguard::rules::{
    ClinicalCode, ClinicalProvenance, EvidenceLevel, LifecycleState, Severity, Trigger,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn provenance() -> ClinicalProvenance {
    ClinicalProvenance {
        source_citation: "Interaction compendium 2024, monograph 311".to_string(),
        published_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        reviewed_by: "Pharmacy Review Committee".to_string(),
        evidence_level: EvidenceLevel::A,
        effective_from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        effective_until: None,
    }
}

fn interaction_record(id: &str) -> SourceRecord {
    SourceRecord::draft(
        id,
        Trigger::Interaction {
            drug_a: ClinicalCode::new("rxnorm", "11289"),
            drug_b: ClinicalCode::new("rxnorm", "1191"),
        },
        Severity::Major,
        "Avoid combination; increased bleeding risk.",
        provenance(),
    )
}

fn valid_bundle() -> ContentBundle {
    let mut store = SourceStore::new();
    store.insert(interaction_record("ddi-1")).unwrap();
    BundleBuilder::new("1.0.0").build(&store, Utc::now()).unwrap()
}

/// Builds bundle bytes that bypass the builder's validation, with a
/// checksum that matches the (defective) payload. Exercises the loader's
/// own checks rather than the builder's.
fn bundle_bytes_with_rules(rules: Vec<medguard::rules::Rule>) -> Vec<u8> {
    let payload = ContentBundle::rule_payload_bytes(&rules).unwrap();
    let checksum = format_checksum(&compute_checksum(&payload));
    let counts = CategoryCounts::tally(&rules);
    let bundle = ContentBundle {
        manifest: BundleManifest::new("1.0.0", Utc::now(), checksum, counts),
        rules,
    };
    bundle.to_json().unwrap().into_bytes()
}

// =============================================================================
// INVARIANT: Checksum mismatch is fatal at load
// =============================================================================

#[test]
fn test_tampered_checksum_rejects_whole_bundle() {
    let mut bundle = valid_bundle();
    bundle.manifest.checksum =
        "sha256:0000000000000000000000000000000000000000000000000000000000000000".to_string();

    let result = ContentLoader::load(bundle.to_json().unwrap().as_bytes());
    let err = result.expect_err("VIOLATION: tampered checksum must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::ChecksumMismatch);
}

#[test]
fn test_tampered_rule_payload_rejects_whole_bundle() {
    let mut bundle = valid_bundle();
    bundle.rules[0].severity = Severity::Minor;

    let result = ContentLoader::load(bundle.to_json().unwrap().as_bytes());
    let err = result.expect_err("VIOLATION: payload tampering must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::ChecksumMismatch);
}

// =============================================================================
// INVARIANT: A rule lacking complete provenance cannot exist in a loaded
// bundle
// =============================================================================

#[test]
fn test_missing_provenance_rejects_whole_bundle() {
    let mut rule = interaction_record("ddi-1").compile();
    rule.provenance.source_citation = String::new();
    let mut good = interaction_record("ddi-2").compile();
    good.trigger = Trigger::Interaction {
        drug_a: ClinicalCode::new("rxnorm", "7646"),
        drug_b: ClinicalCode::new("rxnorm", "11289"),
    };

    let bytes = bundle_bytes_with_rules(vec![rule, good]);
    let err = ContentLoader::load(&bytes)
        .expect_err("VIOLATION: incomplete provenance must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::ProvenanceIncomplete);
    assert!(
        err.detail().contains("ddi-1"),
        "error should name the offending rule, got: {}",
        err
    );
}

#[test]
fn test_duplicate_rule_id_rejects_whole_bundle() {
    let rule_a = interaction_record("ddi-1").compile();
    let rule_b = interaction_record("ddi-1").compile();

    let bytes = bundle_bytes_with_rules(vec![rule_a, rule_b]);
    let err = ContentLoader::load(&bytes)
        .expect_err("VIOLATION: duplicate rule ids must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::DuplicateRuleId);
}

#[test]
fn test_count_mismatch_rejected() {
    let mut bundle = valid_bundle();
    bundle.manifest.counts.dosing_threshold = 5;
    // Checksum still matches the payload; only counts lie.
    let err = ContentLoader::load(bundle.to_json().unwrap().as_bytes())
        .expect_err("VIOLATION: lying manifest counts must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::CountMismatch);
}

#[test]
fn test_unknown_lifecycle_state_rejected() {
    let bundle = valid_bundle();
    let json = bundle.to_json().unwrap().replace("\"DRAFT\"", "\"SHADOW\"");
    let err = ContentLoader::load(json.as_bytes())
        .expect_err("VIOLATION: unknown lifecycle state must reject the bundle");
    assert_eq!(err.code(), IntegrityErrorCode::BundleMalformed);
}

// =============================================================================
// INVARIANT: A failed reload never unpublishes the serving registry
// =============================================================================

#[test]
fn test_failed_reload_keeps_old_registry_serving() {
    let bundle = valid_bundle();
    let registry = ContentLoader::load(bundle.to_json().unwrap().as_bytes()).unwrap();
    let publisher = RegistryPublisher::new(registry);

    let mut tampered = valid_bundle();
    tampered.manifest.checksum = "sha256:deadbeef".to_string();
    let reload = ContentLoader::load(tampered.to_json().unwrap().as_bytes());
    assert!(reload.is_err());
    // The failed load produced no registry, so nothing was published.
    assert_eq!(publisher.acquire().version(), "1.0.0");
    assert_eq!(publisher.acquire().len(), 1);
}

// =============================================================================
// File transport
// =============================================================================

#[test]
fn test_bundle_survives_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bundle.json");

    let bundle = valid_bundle();
    write_bundle_file(&bundle, &path).unwrap();
    let bytes = read_bundle_file(&path, RetryPolicy::default()).unwrap();
    let registry = ContentLoader::load(&bytes).unwrap();

    assert_eq!(registry.version(), "1.0.0");
    assert_eq!(
        registry
            .list(None, Some(LifecycleState::Draft))
            .first()
            .map(|r| r.id.as_str()),
        Some("ddi-1")
    );
}

#[test]
fn test_corrupted_file_on_disk_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bundle.json");

    let bundle = valid_bundle();
    write_bundle_file(&bundle, &path).unwrap();

    // Flip a byte in the middle of the file
    let mut contents = std::fs::read(&path).unwrap();
    let mid = contents.len() / 2;
    contents[mid] ^= 0xFF;
    std::fs::write(&path, contents).unwrap();

    let bytes = read_bundle_file(&path, RetryPolicy::no_retry()).unwrap();
    assert!(
        ContentLoader::load(&bytes).is_err(),
        "VIOLATION: on-disk corruption must cause explicit load failure"
    );
}
