//! Tests for the persistent Map
//!
//! These tests verify:
//! - Cached reads and writes reach the store only at close
//! - Key index stays in step with the live entries across reopen
//! - Const (uncached) access
//! - Non-traversable maps keep no index

use contractkv::{Map, MemoryStore, NonTraversableMap};

// =============================================================================
// Helper Functions
// =============================================================================

fn fill(store: &MemoryStore, name: &str, keys: impl IntoIterator<Item = u32>) {
    let mut map: Map<'_, u32, String> = Map::open(store, name).unwrap();
    for key in keys {
        map.insert(key, format!("v{}", key));
    }
    map.close().unwrap();
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_insert_close_reopen() {
    let store = MemoryStore::new();
    fill(&store, "balances", [1, 2, 3]);

    let mut map: Map<'_, u32, String> = Map::open(&store, "balances").unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&2).unwrap(), "v2");
    assert!(map.contains_key(&3));
    assert!(!map.contains_key(&4));
    map.close().unwrap();
}

#[test]
fn test_nothing_written_before_close() {
    let store = MemoryStore::new();
    let mut map: Map<'_, String, u64> = Map::open(&store, "m").unwrap();
    map.insert("alice".to_string(), 10);
    assert!(store.is_empty());

    map.close().unwrap();
    // index + one entry
    assert_eq!(store.len(), 2);
}

#[test]
fn test_get_mut_persists() {
    let store = MemoryStore::new();
    fill(&store, "m", [7]);

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    map.get_mut(&7).unwrap().push_str("-edited");
    map.close().unwrap();

    let map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    assert_eq!(map.get_const(&7).unwrap(), "v7-edited");
    map.close().unwrap();
}

#[test]
fn test_read_only_access_writes_entries_back_once() {
    let store = MemoryStore::new();
    fill(&store, "m", [1]);
    store.reset_stats();

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    map.get(&1).unwrap();
    map.get(&1).unwrap();
    map.close().unwrap();

    let stats = store.stats();
    // index load + one entry load
    assert_eq!(stats.size_queries, 2);
    // only the index is rewritten
    assert_eq!(stats.puts, 1);
}

#[test]
fn test_remove_deletes_from_store() {
    let store = MemoryStore::new();
    fill(&store, "m", [1, 2, 3]);

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    map.remove(&2);
    assert!(!map.contains_key(&2));
    assert_eq!(map.len(), 2);
    map.close().unwrap();

    assert_eq!(store.len(), 1 + 2);
    let map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(map.get_const(&2).unwrap(), "");
    map.close().unwrap();
}

#[test]
fn test_remove_then_insert_before_flush() {
    let store = MemoryStore::new();
    fill(&store, "m", [5]);

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    map.remove(&5);
    map.insert(5, "back".to_string());
    map.close().unwrap();

    let map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_const(&5).unwrap(), "back");
    map.close().unwrap();
}

// =============================================================================
// Traversal
// =============================================================================

#[test]
fn test_traversal_count_matches_len() {
    let store = MemoryStore::new();
    fill(&store, "m", 0..50);

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    for key in (0..50).step_by(2) {
        map.remove(&key);
    }
    map.insert(100, "new".to_string());
    assert_eq!(map.iter().count(), map.len());
    map.close().unwrap();

    let map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    assert_eq!(map.len(), 26);
    let entries: Vec<(u32, String)> = map
        .iter()
        .map(|item| item.map(|(k, v)| (*k, v)))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), map.len());
    assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(entries.iter().all(|(k, v)| *v == format!("v{}", k) || *k == 100));
    map.close().unwrap();
}

#[test]
fn test_reverse_iteration() {
    let store = MemoryStore::new();
    fill(&store, "m", [3, 1, 2]);

    let map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    let keys: Vec<u32> = map.iter().rev().map(|item| *item.unwrap().0).collect();
    assert_eq!(keys, vec![3, 2, 1]);
    map.close().unwrap();
}

#[test]
fn test_iter_sees_cached_changes() {
    let store = MemoryStore::new();
    fill(&store, "m", [1]);

    let mut map: Map<'_, u32, String> = Map::open(&store, "m").unwrap();
    *map.get_mut(&1).unwrap() = "changed".to_string();
    let (_, value) = map.iter().next().unwrap().unwrap();
    assert_eq!(value, "changed");
    map.close().unwrap();
}

// =============================================================================
// Const Access
// =============================================================================

#[test]
fn test_insert_const_writes_immediately() {
    let store = MemoryStore::new();
    let mut map: Map<'_, u32, u64> = Map::open(&store, "m").unwrap();
    map.insert_const(1, 500);

    assert_eq!(store.stats().puts, 1);
    assert_eq!(map.get_const(&1).unwrap(), 500);
    assert_eq!(map.len(), 1);
    map.close().unwrap();
}

#[test]
fn test_insert_const_refreshes_cached_entry() {
    let store = MemoryStore::new();
    let mut map: Map<'_, u32, u64> = Map::open(&store, "m").unwrap();
    map.insert(1, 1);
    map.insert_const(1, 2);
    assert_eq!(*map.get(&1).unwrap(), 2);
    map.close().unwrap();

    let map: Map<'_, u32, u64> = Map::open(&store, "m").unwrap();
    assert_eq!(map.get_const(&1).unwrap(), 2);
    map.close().unwrap();
}

#[test]
fn test_get_const_leaves_absent_key_absent() {
    let store = MemoryStore::new();
    let map: Map<'_, u32, u64> = Map::open(&store, "m").unwrap();
    assert_eq!(map.get_const(&42).unwrap(), 0);
    assert!(map.is_empty());
    map.close().unwrap();

    // only the (empty) index was written
    assert_eq!(store.len(), 1);
}

// =============================================================================
// Non-Traversable Maps
// =============================================================================

#[test]
fn test_non_traversable_keeps_no_index() {
    let store = MemoryStore::new();
    let mut map: NonTraversableMap<'_, String, u64> = NonTraversableMap::open(&store, "n").unwrap();
    map.insert("a".to_string(), 1);
    map.insert("b".to_string(), 2);
    map.close().unwrap();

    assert_eq!(store.len(), 2);
}

#[test]
fn test_non_traversable_point_operations() {
    let store = MemoryStore::new();
    {
        let mut map: NonTraversableMap<'_, String, u64> =
            NonTraversableMap::open(&store, "n").unwrap();
        map.insert("a".to_string(), 1);
        map.close().unwrap();
    }

    let mut map: NonTraversableMap<'_, String, u64> = NonTraversableMap::open(&store, "n").unwrap();
    assert!(map.contains_key(&"a".to_string()));
    assert!(!map.contains_key(&"z".to_string()));

    *map.get_mut(&"a".to_string()).unwrap() += 9;
    map.remove(&"a".to_string());
    assert!(!map.contains_key(&"a".to_string()));
    map.close().unwrap();

    assert!(store.is_empty());
}

#[test]
fn test_maps_with_different_names_are_independent() {
    let store = MemoryStore::new();
    fill(&store, "left", [1, 2]);
    fill(&store, "right", [9]);

    let left: Map<'_, u32, String> = Map::open(&store, "left").unwrap();
    let right: Map<'_, u32, String> = Map::open(&store, "right").unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(right.len(), 1);
    assert!(!left.contains_key(&9));
    left.close().unwrap();
    right.close().unwrap();
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "dropped without close()")]
fn test_unclosed_map_panics_in_debug() {
    let store = MemoryStore::new();
    let mut map: Map<'_, u32, u32> = Map::open(&store, "leaky").unwrap();
    map.insert(1, 1);
    drop(map);
}
