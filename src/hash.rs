//! Key hashing and hash-chunk routing for the trie.
//!
//! Every operation hashes a key exactly once and then consumes the 64-bit
//! hash in 5-bit chunks, least-significant chunk first, to select a child
//! slot at each branch level.
//!
//! The hasher is selected at compile time through feature flags, mirroring
//! how the map otherwise has no runtime configuration. All selectable
//! hashers are deterministic within a process, which keeps the trie layout
//! and the container hash stable for a map's whole lifetime.

use std::hash::{Hash, Hasher};

/// Branching factor of the trie (2^5 = 32 child slots per branch).
pub(crate) const BRANCHING_FACTOR: usize = 32;

/// Bits of the hash consumed per trie level.
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Bit mask extracting one chunk of the hash.
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

/// Deepest branch level. Two distinct 64-bit hashes must differ in some
/// chunk at depth 0..=MAX_DEPTH, so branches never descend past it; keys
/// whose full hashes coincide land in a collision node instead.
pub(crate) const MAX_DEPTH: usize = 64 / BITS_PER_LEVEL;

#[cfg(feature = "ahash")]
type SelectedHasher = ahash::AHasher;

#[cfg(all(feature = "fxhash", not(feature = "ahash")))]
type SelectedHasher = rustc_hash::FxHasher;

#[cfg(not(any(feature = "ahash", feature = "fxhash")))]
type SelectedHasher = std::collections::hash_map::DefaultHasher;

/// Computes the 64-bit hash code routing a key through the trie.
pub(crate) fn hash_key<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = SelectedHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Extracts the child-slot index for a given trie depth from a hash.
#[inline]
pub(crate) const fn hash_index(hash: u64, depth: usize) -> usize {
    debug_assert!(depth <= MAX_DEPTH);
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK) as usize
}

/// Computes a digest for a single map entry.
///
/// Digests are combined with a commutative operation by the map's `Hash`
/// implementation, so the container hash is independent of iteration order.
pub(crate) fn entry_digest<K: Hash + ?Sized, V: Hash + ?Sized>(key: &K, value: &V) -> u64 {
    let mut hasher = SelectedHasher::default();
    key.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::{BRANCHING_FACTOR, MAX_DEPTH, entry_digest, hash_index, hash_key};
    use rstest::rstest;

    #[rstest]
    fn test_hash_key_is_deterministic() {
        assert_eq!(hash_key("key"), hash_key("key"));
        assert_eq!(hash_key(&7_u64), hash_key(&7_u64));
    }

    #[rstest]
    fn test_hash_index_stays_within_branching_factor() {
        for depth in 0..=MAX_DEPTH {
            assert!(hash_index(u64::MAX, depth) < BRANCHING_FACTOR);
        }
    }

    #[rstest]
    fn test_hash_index_extracts_consecutive_chunks() {
        let hash = 0b00010_00001_u64;
        assert_eq!(hash_index(hash, 0), 1);
        assert_eq!(hash_index(hash, 1), 2);
        assert_eq!(hash_index(hash, 2), 0);
    }

    #[rstest]
    fn test_entry_digest_depends_on_both_components() {
        assert_eq!(entry_digest("a", &1), entry_digest("a", &1));
        assert_ne!(entry_digest("a", &1), entry_digest("a", &2));
        assert_ne!(entry_digest("a", &1), entry_digest("b", &1));
    }
}
