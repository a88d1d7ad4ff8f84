//! SHA-256 checksum computation for bundle payloads
//!
//! Every bundle manifest carries a SHA-256 digest of the serialized rule
//! payload. The digest is recomputed and verified at every load; a mismatch
//! rejects the bundle wholesale.

use sha2::{Digest, Sha256};

/// Computes a SHA-256 digest over the provided payload bytes.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_checksum(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.finalize().into()
}

/// Formats a digest as a manifest checksum string.
///
/// Format: `sha256:` followed by 64 lowercase hex characters.
pub fn format_checksum(digest: &[u8; 32]) -> String {
    let mut out = String::with_capacity(7 + 64);
    out.push_str("sha256:");
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Parses a formatted checksum string back to a digest.
///
/// Returns `None` if the prefix, length or hex content is invalid.
pub fn parse_checksum(formatted: &str) -> Option<[u8; 32]> {
    let hex = formatted.strip_prefix("sha256:")?;
    if hex.len() != 64 {
        return None;
    }
    let mut digest = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).ok()?;
        digest[i] = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let payload = b"rule payload bytes";
        assert_eq!(compute_checksum(payload), compute_checksum(payload));
    }

    #[test]
    fn test_checksum_detects_changes() {
        assert_ne!(compute_checksum(b"original"), compute_checksum(b"tampered"));
    }

    #[test]
    fn test_format_checksum() {
        let digest = compute_checksum(b"");
        let formatted = format_checksum(&digest);
        assert!(formatted.starts_with("sha256:"));
        assert_eq!(formatted.len(), 7 + 64);
        // SHA-256 of the empty string is a well-known constant
        assert_eq!(
            formatted,
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let digest = compute_checksum(b"roundtrip");
        let parsed = parse_checksum(&format_checksum(&digest)).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn test_parse_checksum_invalid() {
        assert_eq!(parse_checksum("invalid"), None);
        assert_eq!(parse_checksum("sha256:"), None);
        assert_eq!(parse_checksum("sha256:zz"), None);
        assert_eq!(parse_checksum("md5:00112233"), None);
    }
}
