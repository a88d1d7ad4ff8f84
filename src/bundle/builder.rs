//! Bundle builder
//!
//! Compiles validated source records into a checksummed content bundle.
//! Runs offline, out-of-band; evaluation never waits on a build. Every
//! record is validated before compilation and any defect aborts the build
//! with the offending rule named.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::bundle::ContentBundle;
use super::checksum::{compute_checksum, format_checksum};
use super::errors::{BundleError, BundleResult};
use super::manifest::{BundleManifest, CategoryCounts};
use super::source::SourceStore;
use crate::rules::Rule;

/// Compiles a source store into a content bundle.
pub struct BundleBuilder {
    version: String,
}

impl BundleBuilder {
    /// Creates a builder for the given content version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Builds a bundle from every record in the store.
    ///
    /// Validation order per record: structural rule validation (trigger
    /// codes, provenance completeness), then duplicate-id detection across
    /// the store. Any defect aborts the entire build.
    pub fn build(&self, store: &SourceStore, built_at: DateTime<Utc>) -> BundleResult<ContentBundle> {
        if self.version.trim().is_empty() {
            return Err(BundleError::EmptyVersion);
        }

        let mut rules: Vec<Rule> = Vec::with_capacity(store.len());
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(store.len());

        for record in store.iter() {
            let rule = record.compile();
            rule.validate().map_err(|defect| BundleError::InvalidSourceRecord {
                rule_id: rule.id.clone(),
                defect,
            })?;
            if !seen_ids.insert(rule.id.clone()) {
                return Err(BundleError::DuplicateRuleId(rule.id));
            }
            rules.push(rule);
        }

        let payload = ContentBundle::rule_payload_bytes(&rules)?;
        let checksum = format_checksum(&compute_checksum(&payload));
        let counts = CategoryCounts::tally(&rules);

        Ok(ContentBundle {
            manifest: BundleManifest::new(self.version.clone(), built_at, checksum, counts),
            rules,
        })
    }
}
