//! Bundle manifest
//!
//! The manifest is the authoritative bundle descriptor: semantic version,
//! build timestamp, SHA-256 checksum of the rule payload and per-category
//! counts. Counts and checksum are both re-verified at load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::{Rule, RuleCategory};

/// Per-category rule counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub interaction: usize,
    pub contraindication: usize,
    pub dosing_threshold: usize,
}

impl CategoryCounts {
    /// Tallies counts over a rule slice.
    pub fn tally(rules: &[Rule]) -> Self {
        let mut counts = Self::default();
        for rule in rules {
            match rule.category() {
                RuleCategory::Interaction => counts.interaction += 1,
                RuleCategory::Contraindication => counts.contraindication += 1,
                RuleCategory::DosingThreshold => counts.dosing_threshold += 1,
            }
        }
        counts
    }

    /// Total across categories.
    pub fn total(&self) -> usize {
        self.interaction + self.contraindication + self.dosing_threshold
    }
}

/// Bundle manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Semantic content version (e.g. "2024.08.1")
    pub version: String,

    /// Build timestamp (UTC)
    pub built_at: DateTime<Utc>,

    /// SHA-256 checksum of the serialized rule payload
    /// (format: `sha256:<64 hex>`)
    pub checksum: String,

    /// Per-category rule counts
    pub counts: CategoryCounts,

    /// Manifest format version (always 1)
    pub format_version: u8,
}

impl BundleManifest {
    /// Creates a new manifest.
    pub fn new(
        version: impl Into<String>,
        built_at: DateTime<Utc>,
        checksum: impl Into<String>,
        counts: CategoryCounts,
    ) -> Self {
        Self {
            version: version.into(),
            built_at,
            checksum: checksum.into(),
            counts,
            format_version: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_format_version_always_one() {
        let manifest = BundleManifest::new(
            "2024.08.1",
            Utc::now(),
            "sha256:00",
            CategoryCounts::default(),
        );
        assert_eq!(manifest.format_version, 1);
    }

    #[test]
    fn test_counts_total() {
        let counts = CategoryCounts {
            interaction: 2,
            contraindication: 1,
            dosing_threshold: 3,
        };
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_manifest_json_roundtrip() {
        let manifest = BundleManifest::new(
            "2024.08.1",
            "2026-08-01T12:00:00Z".parse().unwrap(),
            "sha256:abcd",
            CategoryCounts {
                interaction: 1,
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: BundleManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest, parsed);
    }
}
