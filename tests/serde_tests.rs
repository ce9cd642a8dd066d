//! Serde round-trip tests for HashTrieMap (requires the `serde` feature).

use hash_trie_map::HashTrieMap;
use rstest::rstest;

#[rstest]
fn test_empty_map_serializes_to_empty_object() {
    let map: HashTrieMap<String, i32> = HashTrieMap::new();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "{}");
}

#[rstest]
fn test_single_entry_round_trip() {
    let map = HashTrieMap::singleton("a".to_string(), 2);

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "{\"a\":2}");

    let decoded: HashTrieMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, map);
}

#[rstest]
fn test_many_entries_round_trip() {
    let map: HashTrieMap<String, u32> = (0..100).map(|index| (index.to_string(), index)).collect();

    let json = serde_json::to_string(&map).unwrap();
    let decoded: HashTrieMap<String, u32> = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, map);
    assert_eq!(decoded.len(), 100);
}

#[rstest]
fn test_deserializing_duplicate_keys_keeps_last() {
    let decoded: HashTrieMap<String, i32> = serde_json::from_str("{\"a\":1,\"a\":2}").unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.get("a"), Some(&2));
}

#[rstest]
fn test_deserializing_non_map_fails() {
    let result: Result<HashTrieMap<String, i32>, _> = serde_json::from_str("[1, 2, 3]");
    assert!(result.is_err());
}
