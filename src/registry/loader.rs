//! Content loader
//!
//! `load` turns bundle bytes into a `Registry`, verifying in order:
//!
//! 1. the document parses as a bundle (closed enums reject unknown
//!    lifecycle states and trigger categories here),
//! 2. the manifest checksum equals the recomputed digest of the rule
//!    payload,
//! 3. every rule is structurally valid with complete provenance,
//! 4. rule identifiers are unique,
//! 5. manifest per-category counts match the payload.
//!
//! Any failure aborts the whole load. No partial registry is ever returned.

use std::collections::HashSet;

use crate::bundle::{compute_checksum, format_checksum, ContentBundle};
use crate::observability::Logger;
use crate::rules::RuleDefect;

use super::errors::{ContentIntegrityError, LoadResult};
use super::registry::Registry;

/// Stateless bundle loader.
pub struct ContentLoader;

impl ContentLoader {
    /// Loads and fully verifies a bundle, producing an immutable registry.
    pub fn load(bundle_bytes: &[u8]) -> LoadResult<Registry> {
        let text = std::str::from_utf8(bundle_bytes)
            .map_err(|e| ContentIntegrityError::malformed(format!("not UTF-8: {}", e)))?;

        let bundle = ContentBundle::from_json(text)
            .map_err(|e| ContentIntegrityError::malformed(e.to_string()))?;

        Self::verify(&bundle)?;

        Logger::info(
            "REGISTRY_LOADED",
            &[
                ("version", bundle.manifest.version.as_str()),
                ("rules", &bundle.rules.len().to_string()),
            ],
        );

        Ok(Registry::build(
            bundle.manifest.version,
            bundle.manifest.built_at,
            bundle.rules,
        ))
    }

    /// Runs the full verification pipeline without building a registry.
    ///
    /// Used by the CLI `bundle verify` command.
    pub fn verify(bundle: &ContentBundle) -> LoadResult<()> {
        Self::verify_checksum(bundle)?;
        Self::verify_rules(bundle)?;
        Self::verify_counts(bundle)?;
        Ok(())
    }

    fn verify_checksum(bundle: &ContentBundle) -> LoadResult<()> {
        let payload = ContentBundle::rule_payload_bytes(&bundle.rules)
            .map_err(|e| ContentIntegrityError::malformed(e.to_string()))?;
        let actual = format_checksum(&compute_checksum(&payload));

        if actual != bundle.manifest.checksum {
            let err =
                ContentIntegrityError::checksum_mismatch(&bundle.manifest.checksum, &actual);
            Logger::error(
                "BUNDLE_LOAD_FAILED",
                &[
                    ("code", err.code_str()),
                    ("version", bundle.manifest.version.as_str()),
                ],
            );
            return Err(err);
        }
        Ok(())
    }

    fn verify_rules(bundle: &ContentBundle) -> LoadResult<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(bundle.rules.len());

        for rule in &bundle.rules {
            if let Err(defect) = rule.validate() {
                // Provenance gaps get their own code; they are the defect
                // auditors ask about first.
                let err = match defect {
                    RuleDefect::Provenance(p) => {
                        ContentIntegrityError::provenance_incomplete(&rule.id, p)
                    }
                    other => ContentIntegrityError::rule_invalid(&rule.id, other),
                };
                Logger::error("BUNDLE_LOAD_FAILED", &[("code", err.code_str())]);
                return Err(err);
            }
            if !seen.insert(rule.id.as_str()) {
                let err = ContentIntegrityError::duplicate_rule_id(&rule.id);
                Logger::error("BUNDLE_LOAD_FAILED", &[("code", err.code_str())]);
                return Err(err);
            }
        }
        Ok(())
    }

    fn verify_counts(bundle: &ContentBundle) -> LoadResult<()> {
        let actual = crate::bundle::CategoryCounts::tally(&bundle.rules);
        if actual != bundle.manifest.counts {
            return Err(ContentIntegrityError::count_mismatch(format!(
                "manifest declares {:?} but payload contains {:?}",
                bundle.manifest.counts, actual
            )));
        }
        Ok(())
    }
}
