//! Content bundle structure and serialization

use serde::{Deserialize, Serialize};

use super::errors::BundleResult;
use super::manifest::BundleManifest;
use crate::rules::Rule;

/// A versioned, checksummed collection of compiled rules.
///
/// The manifest checksum covers exactly the bytes returned by
/// [`ContentBundle::rule_payload_bytes`], so builder and loader agree on
/// what is protected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub manifest: BundleManifest,
    pub rules: Vec<Rule>,
}

impl ContentBundle {
    /// Canonical byte serialization of the rule payload.
    ///
    /// Rules keep their compiled order; struct fields serialize in
    /// declaration order, so the bytes are deterministic for a given
    /// rule list.
    pub fn rule_payload_bytes(rules: &[Rule]) -> BundleResult<Vec<u8>> {
        Ok(serde_json::to_vec(rules)?)
    }

    /// Serializes the bundle to pretty-printed JSON.
    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a bundle from JSON.
    pub fn from_json(json: &str) -> BundleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
