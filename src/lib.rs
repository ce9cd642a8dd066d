//! # hash-trie-map
//!
//! A persistent (immutable) hash map based on a hash array mapped trie
//! (HAMT) with structural sharing.
//!
//! ## Overview
//!
//! [`HashTrieMap`] is an associative container keyed by arbitrary hashable
//! values. Every edit returns a new map and leaves the original untouched;
//! unchanged subtrees are shared between versions instead of copied, so
//! insert, lookup and removal all run in O(log32 N) — effectively constant
//! time for practical sizes.
//!
//! - **Persistent**: `insert`/`remove` never mutate, they return new handles
//! - **Structurally shared**: only the path from the root to the edited slot
//!   is rebuilt
//! - **Hashable**: two maps with the same associations are equal and hash
//!   identically, regardless of insertion order, so maps can nest inside
//!   other hash-based containers
//!
//! ## Feature Flags
//!
//! - `arc`: share subtrees with `Arc` instead of `Rc` for use across threads
//! - `serde`: `Serialize`/`Deserialize` support
//! - `fxhash`: hash keys with `rustc_hash::FxHasher`
//! - `ahash`: hash keys with `ahash::AHasher` (takes precedence over
//!   `fxhash` when both are enabled)
//! - `full`: enable `arc`, `serde` and `ahash`
//!
//! ## Example
//!
//! ```rust
//! use hash_trie_map::HashTrieMap;
//!
//! let map = HashTrieMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2);
//! assert_eq!(map.get("one"), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer used for shared subtrees.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, which is
/// thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type Shared<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type Shared<T> = std::rc::Rc<T>;

mod error;
mod hash;
mod map;
mod node;

pub use error::MissingKeyError;
pub use map::HashTrieMap;
pub use map::IntoIter;
pub use map::Iter;
pub use map::Keys;
pub use map::Values;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod shared_tests {
    use super::Shared;
    use rstest::rstest;

    #[rstest]
    fn test_shared_clone() {
        let shared: Shared<i32> = Shared::new(42);
        let shared_clone = shared.clone();
        assert_eq!(*shared, *shared_clone);
    }

    #[rstest]
    fn test_shared_strong_count() {
        let shared: Shared<i32> = Shared::new(42);
        assert_eq!(Shared::strong_count(&shared), 1);
        let shared_clone = shared.clone();
        assert_eq!(Shared::strong_count(&shared), 2);
        drop(shared_clone);
        assert_eq!(Shared::strong_count(&shared), 1);
    }
}
