//! Stable logical ids for provisioned resources.
//!
//! A logical id is the alphanumeric concatenation of a construct path
//! followed by the first 8 hex digits (uppercase) of the SHA-256 of the
//! `/`-joined path, e.g. `testlambdadefaultloggroup4E8B8B69`. The same
//! path always yields the same id, so repeated resolutions are
//! structurally identical.

use sha2::{Digest, Sha256};

const HASH_LEN: usize = 8;

/// Derive the logical id for a construct path.
pub fn logical_id(path: &[&str]) -> String {
    let human: String = path
        .iter()
        .flat_map(|part| part.chars())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{human}{}", path_hash(path))
}

fn path_hash(path: &[&str]) -> String {
    let digest = Sha256::digest(path.join("/").as_bytes());
    let mut hex = hex::encode_upper(digest);
    hex.truncate(HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_non_alphanumerics() {
        let id = logical_id(&["test-lambda", "default-log-group"]);
        assert!(id.starts_with("testlambdadefaultloggroup"));
        assert_eq!(id.len(), "testlambdadefaultloggroup".len() + HASH_LEN);
    }

    #[test]
    fn deterministic() {
        assert_eq!(logical_id(&["a", "b"]), logical_id(&["a", "b"]));
    }

    #[test]
    fn path_boundaries_matter() {
        // Same concatenation, different path: hashes differ.
        assert_ne!(logical_id(&["ab", "c"]), logical_id(&["a", "bc"]));
    }
}
