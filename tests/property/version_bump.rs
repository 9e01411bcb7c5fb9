//! Property-based tests for version bumping and content hashing

use modpack_manifest::manifest::bump_version;
use modpack_manifest::tree::{hasher, HashAlgorithm};
use proptest::prelude::*;

proptest! {
    /// Only the last component changes, and it grows by one
    #[test]
    fn bump_increments_last_component(parts in prop::collection::vec(0u64..100_000, 1..5)) {
        let version = parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let bumped = bump_version(&version).unwrap();
        let bumped_parts: Vec<u64> = bumped.split('.').map(|p| p.parse().unwrap()).collect();

        prop_assert_eq!(bumped_parts.len(), parts.len());
        let last = parts.len() - 1;
        prop_assert_eq!(&bumped_parts[..last], &parts[..last]);
        prop_assert_eq!(bumped_parts[last], parts[last] + 1);
    }

    /// Any non-numeric component is rejected
    #[test]
    fn bump_rejects_non_numeric(prefix in "[0-9]{1,3}", bad in "[a-z-]{1,4}") {
        let version = format!("{}.{}", prefix, bad);
        prop_assert!(bump_version(&version).is_err());
    }

    /// Hashing is deterministic and yields fixed-width lowercase hex
    #[test]
    fn hash_is_deterministic(content in any::<Vec<u8>>()) {
        for algorithm in [HashAlgorithm::Sha1, HashAlgorithm::Blake3] {
            let first = hasher::compute_content_hash(&content, algorithm);
            let second = hasher::compute_content_hash(&content, algorithm);
            prop_assert_eq!(&first, &second);
            let width = match algorithm {
                HashAlgorithm::Sha1 => 40,
                HashAlgorithm::Blake3 => 64,
            };
            prop_assert_eq!(first.len(), width);
            prop_assert!(first.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }
    }
}
