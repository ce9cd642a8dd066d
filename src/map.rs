//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`HashTrieMap`], an immutable hash map that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! `HashTrieMap` is based on Hash Array Mapped Trie (HAMT), a data structure
//! that provides efficient immutable operations. It uses a 32-way branching
//! trie where hash bits are used to navigate the tree.
//!
//! - O(log32 N) get (effectively O(1) for practical sizes)
//! - O(log32 N) insert
//! - O(log32 N) remove
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use hash_trie_map::HashTrieMap;
//!
//! let map = HashTrieMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2)
//!     .insert("three".to_string(), 3);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.get("two"), Some(&2));
//! assert_eq!(map.get("three"), Some(&3));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Some(&100)); // New version
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::Shared;
use crate::error::MissingKeyError;
use crate::hash::{entry_digest, hash_key};
use crate::node::{Node, NodeIter};

// =============================================================================
// HashTrieMap Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// `HashTrieMap` is an immutable data structure that uses structural sharing
/// to efficiently support functional programming patterns. Two maps holding
/// the same associations are equal and hash identically, independent of how
/// they were built, so maps can serve as keys or elements in other
/// hash-based containers.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log32 N)        |
/// | `insert`       | O(log32 N)        |
/// | `remove`       | O(log32 N)        |
/// | `contains_key` | O(log32 N)        |
/// | `len`          | O(1)              |
/// | `is_empty`     | O(1)              |
///
/// # Examples
///
/// ```rust
/// use hash_trie_map::HashTrieMap;
///
/// let map = HashTrieMap::singleton("key".to_string(), 42);
/// assert_eq!(map.get("key"), Some(&42));
/// ```
#[derive(Clone)]
pub struct HashTrieMap<K, V> {
    /// Root node of the trie
    root: Shared<Node<K, V>>,
    /// Number of entries
    length: usize,
}

impl<K, V> HashTrieMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map: HashTrieMap<String, i32> = HashTrieMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Shared::new(Node::Empty),
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let empty: HashTrieMap<String, i32> = HashTrieMap::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert("key".to_string(), 42);
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over key-value pairs.
    ///
    /// The iterator is lazy and restartable; independent calls produce
    /// independent iterators over the same immutable data. Iteration order
    /// follows the trie structure and carries no semantic guarantee.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{}: {}", key, value);
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: NodeIter::new(&self.root),
            remaining: self.length,
        }
    }

    /// Returns an iterator over keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    ///
    /// let mut keys: Vec<&String> = map.keys().collect();
    /// keys.sort();
    /// assert_eq!(keys, [&"a".to_string(), &"b".to_string()]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 3);
    /// ```
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Hash + Eq, V> HashTrieMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash`
    /// and `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("key".to_string(), 42);
    /// assert_eq!(
    ///     map.get_key_value("key"),
    ///     Some((&"key".to_string(), &42)),
    /// );
    /// ```
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_key(key);
        self.root.get(key, hash, 0)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("key".to_string(), 42);
    ///
    /// assert!(map.contains_key("key"));
    /// assert!(!map.contains_key("other"));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Returns a reference to the value for the key, or a
    /// [`MissingKeyError`] carrying the key's textual representation when
    /// the key has no association.
    ///
    /// # Errors
    ///
    /// Returns [`MissingKeyError`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("a".to_string(), 2);
    /// assert_eq!(map.fetch("a"), Ok(&2));
    ///
    /// let error = map.fetch("foo").unwrap_err();
    /// assert_eq!(error.to_string(), "missing key: \"foo\"");
    /// ```
    pub fn fetch<Q>(&self, key: &Q) -> Result<&V, MissingKeyError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.get(key).ok_or_else(|| MissingKeyError::new(key))
    }
}

impl<K: Clone + Hash + Eq, V: Clone> HashTrieMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::singleton("key".to_string(), 42);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("key"), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced and the
    /// length is unchanged.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map1 = HashTrieMap::new().insert("key".to_string(), 1);
    /// let map2 = map1.insert("key".to_string(), 2);
    ///
    /// assert_eq!(map1.get("key"), Some(&1)); // Original unchanged
    /// assert_eq!(map2.get("key"), Some(&2)); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = hash_key(&key);
        let (new_root, added) = self.root.insert(key, value, hash, 0);

        Self {
            root: Shared::new(new_root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Removes a key from the map, returning the new map.
    ///
    /// The receiver is left fully intact in either case; no partial
    /// mutation is possible since the trie is copy-on-write.
    ///
    /// # Errors
    ///
    /// Returns [`MissingKeyError`] carrying the key's textual representation
    /// if the key is absent. Use [`discard`](Self::discard) for
    /// absence-tolerant removal.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let removed = map.remove("a").unwrap();
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get("a"), None);
    ///
    /// let error = map.remove("c").unwrap_err();
    /// assert_eq!(error.to_string(), "missing key: \"c\"");
    /// ```
    pub fn remove<Q>(&self, key: &Q) -> Result<Self, MissingKeyError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let hash = hash_key(key);
        match self.root.remove(key, hash, 0) {
            Some(new_root) => Ok(Self {
                root: Shared::new(new_root),
                length: self.length.saturating_sub(1),
            }),
            None => Err(MissingKeyError::new(key)),
        }
    }

    /// Removes a key from the map if present, returning a clone of the map
    /// otherwise.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("a".to_string(), 1);
    ///
    /// assert_eq!(map.discard("a").len(), 0);
    /// assert_eq!(map.discard("b").len(), 1); // Absent key: no-op
    /// ```
    #[must_use]
    pub fn discard<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_key(key);
        match self.root.remove(key, hash, 0) {
            Some(new_root) => Self {
                root: Shared::new(new_root),
                length: self.length.saturating_sub(1),
            },
            None => self.clone(),
        }
    }

    /// Inserts, updates or removes a value for a key using an updater
    /// function.
    ///
    /// The updater receives `Some(&V)` if the key exists, or `None` if it
    /// doesn't. If the updater returns `Some(V)`, the value is inserted or
    /// updated; if it returns `None`, the key is removed (if it exists).
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map = HashTrieMap::new().insert("count".to_string(), 10);
    ///
    /// // Increment existing value
    /// let updated = map.update_with("count", |value| value.map(|count| count + 1));
    /// assert_eq!(updated.get("count"), Some(&11));
    ///
    /// // Insert if not exists
    /// let inserted = map.update_with("new_key", |value| value.copied().or(Some(100)));
    /// assert_eq!(inserted.get("new_key"), Some(&100));
    ///
    /// // Remove by returning None
    /// let removed = map.update_with("count", |_| None);
    /// assert_eq!(removed.get("count"), None);
    /// ```
    #[must_use]
    pub fn update_with<Q, F>(&self, key: &Q, updater: F) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        match updater(self.get(key)) {
            Some(value) => {
                // Reuse the stored key so an equal-but-distinct query key
                // does not replace it.
                let stored_key = self
                    .get_key_value(key)
                    .map_or_else(|| key.to_owned(), |(stored, _)| stored.clone());
                self.insert(stored_key, value)
            }
            None => self.discard(key),
        }
    }

    /// Merges two maps, with values from `other` taking precedence on key
    /// conflicts.
    ///
    /// # Complexity
    ///
    /// O(m log32 (n + m)) where n and m are the sizes of the two maps
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hash_trie_map::HashTrieMap;
    ///
    /// let map1 = HashTrieMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let map2 = HashTrieMap::new()
    ///     .insert("b".to_string(), 20)
    ///     .insert("c".to_string(), 3);
    ///
    /// let merged = map1.merge(&map2);
    ///
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&20)); // From map2
    /// assert_eq!(merged.get("c"), Some(&3));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (key, value) in other {
            result = result.insert(key.clone(), value.clone());
        }
        result
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// An iterator over key-value pairs of a [`HashTrieMap`].
pub struct Iter<'a, K, V> {
    entries: NodeIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An iterator over the keys of a [`HashTrieMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An iterator over the values of a [`HashTrieMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An owning iterator over key-value pairs of a [`HashTrieMap`].
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a, K, V> IntoIterator for &'a HashTrieMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone> IntoIterator for HashTrieMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        IntoIter {
            entries: entries.into_iter(),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for HashTrieMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for HashTrieMap<K, V> {
    /// Builds a map by successive insertion; later duplicate keys overwrite
    /// earlier ones.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map = map.insert(key, value);
        }
        map
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for HashTrieMap<K, V> {
    /// Two maps are equal iff they contain the same associations,
    /// independent of insertion history or trie shape.
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for HashTrieMap<K, V> {}

impl<K: Hash, V: Hash> Hash for HashTrieMap<K, V> {
    /// Hashes the map as a whole, consistent with equality.
    ///
    /// Per-entry digests are combined with a commutative operation, so two
    /// maps holding the same associations hash identically even though
    /// their iteration orders may differ.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for (key, value) in self.iter() {
            combined = combined.wrapping_add(entry_digest(key, value));
        }
        state.write_usize(self.length);
        state.write_u64(combined);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTrieMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for HashTrieMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct HashTrieMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> HashTrieMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for HashTrieMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = HashTrieMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = HashTrieMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for HashTrieMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(HashTrieMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
