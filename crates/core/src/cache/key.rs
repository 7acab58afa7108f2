//! Lookup-key normalization and entry file naming.

use sha2::{Digest, Sha256};

/// Normalize a lookup key: case-folded, whitespace-collapsed.
///
/// Two keys that differ only in case or spacing identify the same entry.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Compute the entry file stem for a lookup key.
///
/// Applies [`normalize_key`] first, so equivalent keys map to the same file.
pub fn entry_hash(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_key(key).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_folds() {
        assert_eq!(normalize_key("Tal'Dorei"), "tal'dorei");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_key("  Ancient   Primordial\tRuins "), "ancient primordial ruins");
    }

    #[test]
    fn test_hash_stability() {
        let hash1 = entry_hash("https://wiki.example/wiki/Whitestone");
        let hash2 = entry_hash("https://wiki.example/wiki/Whitestone");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_equivalent_keys() {
        assert_eq!(entry_hash("Emon  City"), entry_hash("emon city"));
    }

    #[test]
    fn test_hash_distinct_keys() {
        assert_ne!(entry_hash("Emon"), entry_hash("Whitestone"));
    }

    #[test]
    fn test_hash_format() {
        let hash = entry_hash("Emon");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
