//! Error types for map operations that signal on absent keys.

use std::fmt;

use thiserror::Error;

/// The error returned by [`HashTrieMap::fetch`] and [`HashTrieMap::remove`]
/// when the requested key has no association.
///
/// The error carries the `Debug` representation of the missing key, so a
/// caller can display a consistent message without retaining the key itself.
///
/// [`HashTrieMap::fetch`]: crate::HashTrieMap::fetch
/// [`HashTrieMap::remove`]: crate::HashTrieMap::remove
///
/// # Examples
///
/// ```rust
/// use hash_trie_map::HashTrieMap;
///
/// let map: HashTrieMap<String, i32> = HashTrieMap::new();
/// let error = map.fetch("foo").unwrap_err();
///
/// assert_eq!(error.key_repr(), "\"foo\"");
/// assert_eq!(error.to_string(), "missing key: \"foo\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("missing key: {key_repr}")]
pub struct MissingKeyError {
    key_repr: String,
}

impl MissingKeyError {
    /// Creates an error recording the `Debug` representation of `key`.
    pub fn new<Q: fmt::Debug + ?Sized>(key: &Q) -> Self {
        Self {
            key_repr: format!("{key:?}"),
        }
    }

    /// Returns the textual representation of the missing key, quoted the way
    /// the key's `Debug` implementation quotes it.
    #[must_use]
    pub fn key_repr(&self) -> &str {
        &self.key_repr
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::MissingKeyError;
    use rstest::rstest;

    #[rstest]
    fn test_string_key_is_quoted() {
        let error = MissingKeyError::new("foo");
        assert_eq!(error.key_repr(), "\"foo\"");
        assert_eq!(error.to_string(), "missing key: \"foo\"");
    }

    #[rstest]
    fn test_integer_key_is_unquoted() {
        let error = MissingKeyError::new(&42);
        assert_eq!(error.key_repr(), "42");
        assert_eq!(error.to_string(), "missing key: 42");
    }

    #[rstest]
    fn test_errors_for_equal_keys_are_equal() {
        assert_eq!(MissingKeyError::new("a"), MissingKeyError::new("a"));
        assert_ne!(MissingKeyError::new("a"), MissingKeyError::new("b"));
    }
}
