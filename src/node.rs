//! Trie nodes and the path-copying algorithms over them.
//!
//! A [`Node`] is immutable once built. Every edit rebuilds only the nodes on
//! the path from the root to the changed slot and reuses all untouched
//! siblings, so maps produced from one another share most of their structure.
//!
//! Branches are bitmap-compressed: a 32-bit bitmap marks which child slots
//! are populated and `children` stores only those slots, ordered by slot
//! index. A branch never stores an empty child; `Empty` exists solely as the
//! root of a map with no entries.

use std::borrow::Borrow;

use crate::Shared;
use crate::hash::hash_index;

/// One node of the trie.
#[derive(Clone)]
pub(crate) enum Node<K, V> {
    /// No entries. Only ever the root of an empty map.
    Empty,
    /// Exactly one entry, tagged with its full hash code.
    Leaf { hash: u64, key: K, value: V },
    /// Two or more entries whose full hash codes coincide. Disambiguated by
    /// linear key comparison; always holds at least two entries.
    Collision {
        hash: u64,
        entries: Shared<[(K, V)]>,
    },
    /// An internal node holding the populated child slots in slot order.
    Branch {
        bitmap: u32,
        children: Shared<[Node<K, V>]>,
    },
}

impl<K, V> Node<K, V> {
    /// Looks up an entry by key, returning the stored key and value.
    pub(crate) fn get<'a, Q>(&'a self, key: &Q, hash: u64, depth: usize) -> Option<(&'a K, &'a V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Empty => None,
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value,
            } => (*leaf_hash == hash && leaf_key.borrow() == key).then_some((leaf_key, value)),
            Self::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash != hash {
                    return None;
                }
                entries
                    .iter()
                    .find(|(entry_key, _)| entry_key.borrow() == key)
                    .map(|(entry_key, value)| (entry_key, value))
            }
            Self::Branch { bitmap, children } => {
                let bit = 1_u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                let position = (bitmap & (bit - 1)).count_ones() as usize;
                children[position].get(key, hash, depth + 1)
            }
        }
    }
}

impl<K: Clone + Eq, V: Clone> Node<K, V> {
    /// Inserts or replaces an entry, rebuilding the path to it.
    ///
    /// Returns the new node and whether the entry count grew (`false` means
    /// an existing value was replaced).
    pub(crate) fn insert(&self, key: K, value: V, hash: u64, depth: usize) -> (Self, bool) {
        match self {
            Self::Empty => (Self::Leaf { hash, key, value }, true),
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value: leaf_value,
            } => {
                if *leaf_hash == hash && leaf_key == &key {
                    (Self::Leaf { hash, key, value }, false)
                } else if *leaf_hash == hash {
                    let entries = vec![(leaf_key.clone(), leaf_value.clone()), (key, value)];
                    (
                        Self::Collision {
                            hash,
                            entries: Shared::from(entries),
                        },
                        true,
                    )
                } else {
                    (
                        Self::split(self.clone(), *leaf_hash, key, value, hash, depth),
                        true,
                    )
                }
            }
            Self::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash == hash {
                    Self::insert_into_collision(hash, entries, key, value)
                } else {
                    (
                        Self::split(self.clone(), *collision_hash, key, value, hash, depth),
                        true,
                    )
                }
            }
            Self::Branch { bitmap, children } => {
                let bit = 1_u32 << hash_index(hash, depth);
                let position = (bitmap & (bit - 1)).count_ones() as usize;

                if bitmap & bit == 0 {
                    let mut new_children = children.to_vec();
                    new_children.insert(position, Self::Leaf { hash, key, value });
                    (
                        Self::Branch {
                            bitmap: bitmap | bit,
                            children: Shared::from(new_children),
                        },
                        true,
                    )
                } else {
                    let (child, added) = children[position].insert(key, value, hash, depth + 1);
                    let mut new_children = children.to_vec();
                    new_children[position] = child;
                    (
                        Self::Branch {
                            bitmap: *bitmap,
                            children: Shared::from(new_children),
                        },
                        added,
                    )
                }
            }
        }
    }

    /// Adds or replaces an entry in a collision node whose hash matches.
    fn insert_into_collision(
        hash: u64,
        entries: &Shared<[(K, V)]>,
        key: K,
        value: V,
    ) -> (Self, bool) {
        let mut new_entries = entries.to_vec();
        match new_entries
            .iter()
            .position(|(entry_key, _)| entry_key == &key)
        {
            Some(position) => {
                new_entries[position].1 = value;
                (
                    Self::Collision {
                        hash,
                        entries: Shared::from(new_entries),
                    },
                    false,
                )
            }
            None => {
                new_entries.push((key, value));
                (
                    Self::Collision {
                        hash,
                        entries: Shared::from(new_entries),
                    },
                    true,
                )
            }
        }
    }

    /// Pushes an existing leaf or collision node one level down to make room
    /// for a new entry whose hash differs.
    ///
    /// While the two hashes share a chunk at the current depth, single-child
    /// branches are stacked; at the first differing chunk both land in one
    /// branch as siblings. The hashes differ, so some chunk differs at depth
    /// `<= MAX_DEPTH` and the recursion terminates.
    fn split(node: Self, node_hash: u64, key: K, value: V, hash: u64, depth: usize) -> Self {
        debug_assert_ne!(node_hash, hash);

        let node_bit = 1_u32 << hash_index(node_hash, depth);
        let new_bit = 1_u32 << hash_index(hash, depth);

        if node_bit == new_bit {
            let child = Self::split(node, node_hash, key, value, hash, depth + 1);
            Self::Branch {
                bitmap: node_bit,
                children: Shared::from(vec![child]),
            }
        } else {
            let leaf = Self::Leaf { hash, key, value };
            let children = if node_bit < new_bit {
                vec![node, leaf]
            } else {
                vec![leaf, node]
            };
            Self::Branch {
                bitmap: node_bit | new_bit,
                children: Shared::from(children),
            }
        }
    }

    /// Removes an entry by key, rebuilding the path to it.
    ///
    /// Returns `None` when the key has no association; the caller surfaces
    /// that as a missing-key error. On success the replacement node is
    /// returned, with collapses already applied: a collision shrunk to one
    /// entry becomes a leaf, and a branch left with a single leaf or
    /// collision child becomes that child.
    pub(crate) fn remove<Q>(&self, key: &Q, hash: u64, depth: usize) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Empty => None,
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                ..
            } => (*leaf_hash == hash && leaf_key.borrow() == key).then_some(Self::Empty),
            Self::Collision {
                hash: collision_hash,
                entries,
            } => {
                if *collision_hash != hash {
                    return None;
                }
                let position = entries
                    .iter()
                    .position(|(entry_key, _)| entry_key.borrow() == key)?;
                let mut new_entries = entries.to_vec();
                new_entries.remove(position);

                if new_entries.len() == 1 {
                    let (remaining_key, remaining_value) = new_entries.remove(0);
                    Some(Self::Leaf {
                        hash: *collision_hash,
                        key: remaining_key,
                        value: remaining_value,
                    })
                } else {
                    Some(Self::Collision {
                        hash: *collision_hash,
                        entries: Shared::from(new_entries),
                    })
                }
            }
            Self::Branch { bitmap, children } => {
                let bit = 1_u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                let position = (bitmap & (bit - 1)).count_ones() as usize;
                let replacement = children[position].remove(key, hash, depth + 1)?;

                let mut new_children = children.to_vec();
                let new_bitmap = if matches!(replacement, Self::Empty) {
                    new_children.remove(position);
                    bitmap & !bit
                } else {
                    new_children[position] = replacement;
                    *bitmap
                };

                Some(Self::collapse(new_bitmap, new_children))
            }
        }
    }

    /// Rebuilds a branch after a removal, collapsing degenerate shapes so
    /// paths do not accumulate single-child branches.
    fn collapse(bitmap: u32, mut children: Vec<Self>) -> Self {
        if children.is_empty() {
            Self::Empty
        } else if children.len() == 1 && !matches!(children[0], Self::Branch { .. }) {
            children.remove(0)
        } else {
            Self::Branch {
                bitmap,
                children: Shared::from(children),
            }
        }
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Lazy depth-first traversal over the entries reachable from one node.
///
/// The traversal order follows the trie structure, a function of hash-chunk
/// values; it is stable for a given tree but carries no semantic guarantee.
pub(crate) struct NodeIter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    collision: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> NodeIter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>) -> Self {
        Self {
            stack: vec![root],
            collision: [].iter(),
        }
    }
}

impl<'a, K, V> Iterator for NodeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((key, value)) = self.collision.next() {
            return Some((key, value));
        }

        loop {
            match self.stack.pop()? {
                Node::Empty => {}
                Node::Leaf { key, value, .. } => return Some((key, value)),
                Node::Collision { entries, .. } => {
                    self.collision = entries.iter();
                    if let Some((key, value)) = self.collision.next() {
                        return Some((key, value));
                    }
                }
                Node::Branch { children, .. } => self.stack.extend(children.iter()),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
