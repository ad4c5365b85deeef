//! State adapter tests
//!
//! Tests verify:
//! - Typed put/get/delete over the host store
//! - Not-found is a normal outcome
//! - Keys and values reach the host packed
//! - Decode errors propagate

use std::collections::BTreeMap;

use contractkv::state::has_state;
use contractkv::{
    decode, delete_state, encode, get_state, get_state_into, put_state, Error, HostStore,
    MemoryStore,
};

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_put_then_get() {
    let store = MemoryStore::new();
    put_state(&store, "owner", &String::from("alice"));

    let owner: Option<String> = get_state(&store, "owner").unwrap();
    assert_eq!(owner.as_deref(), Some("alice"));
}

#[test]
fn test_get_missing_is_none() {
    let store = MemoryStore::new();
    let value: Option<u64> = get_state(&store, "nothing").unwrap();
    assert_eq!(value, None);
}

#[test]
fn test_get_state_into_reports_length() {
    let store = MemoryStore::new();
    put_state(&store, &1u8, &vec![10u32, 20]);

    let mut out: Vec<u32> = Vec::new();
    let len = get_state_into(&store, &1u8, &mut out).unwrap();
    assert_eq!(len, 1 + 8);
    assert_eq!(out, vec![10, 20]);
}

#[test]
fn test_delete_removes_value() {
    let store = MemoryStore::new();
    put_state(&store, "k", &5i32);
    assert!(has_state(&store, "k"));

    delete_state(&store, "k");
    assert!(!has_state(&store, "k"));
    assert_eq!(get_state::<_, _, i32>(&store, "k").unwrap(), None);
    assert!(store.is_empty());
}

#[test]
fn test_overwrite() {
    let store = MemoryStore::new();
    put_state(&store, "n", &1u16);
    put_state(&store, "n", &2u16);
    assert_eq!(get_state::<_, _, u16>(&store, "n").unwrap(), Some(2));
    assert_eq!(store.len(), 1);
}

// =============================================================================
// Wire Form
// =============================================================================

#[test]
fn test_raw_bytes_key_is_length_prefixed() {
    let store = MemoryStore::new();
    put_state(&store, &b"abc".to_vec(), &0xffu8);

    assert_eq!(store.keys(), vec![vec![3, b'a', b'b', b'c']]);
    assert_eq!(store.raw_get(&[3, b'a', b'b', b'c']), Some(vec![0xff]));
}

#[test]
fn test_structured_key() {
    let store = MemoryStore::new();
    let key = (String::from("balance"), 42u64);
    let mut value = BTreeMap::new();
    value.insert(1u8, String::from("x"));
    put_state(&store, &key, &value);

    let raw_key = encode(&key);
    let raw_value = store.raw_get(&raw_key).unwrap();
    assert_eq!(decode::<BTreeMap<u8, String>>(&raw_value).unwrap(), value);
}

#[test]
fn test_adapter_calls_host_once_per_operation() {
    let store = MemoryStore::new();
    put_state(&store, "a", &1u8);
    let _: Option<u8> = get_state(&store, "a").unwrap();
    let _: Option<u8> = get_state(&store, "missing").unwrap();
    delete_state(&store, "a");

    let stats = store.stats();
    assert_eq!(stats.puts, 1);
    assert_eq!(stats.size_queries, 2);
    assert_eq!(stats.gets, 1);
    assert_eq!(stats.deletes, 1);
}

// =============================================================================
// Error Propagation
// =============================================================================

#[test]
fn test_type_mismatch_surfaces_error() {
    let store = MemoryStore::new();
    put_state(&store, "short", &1u8);

    let result: Result<Option<u64>, Error> = get_state(&store, "short");
    assert!(matches!(result, Err(Error::OutOfBounds { .. })));
}

#[test]
fn test_invalid_utf8_value() {
    let store = MemoryStore::new();
    store.put(&encode("bad"), &[2, 0xc3, 0x28]);

    let result: Result<Option<String>, Error> = get_state(&store, "bad");
    assert!(matches!(result, Err(Error::InvalidUtf8(_))));
}
