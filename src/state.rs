//! State adapter
//!
//! Typed access to the host store. Keys and values both go through the codec,
//! so a raw byte-string key `b"name"` reaches the host as `varint(4) + b"name"`.

use crate::codec::{decode, encode, Decode, Encode};
use crate::error::Result;
use crate::store::HostStore;

/// Store `value` under `key`
pub fn put_state<S, K, V>(store: &S, key: &K, value: &V)
where
    S: HostStore + ?Sized,
    K: Encode + ?Sized,
    V: Encode + ?Sized,
{
    let key = encode(key);
    let value = encode(value);
    store.put(&key, &value);
}

/// Load the value under `key` into `out`
///
/// Returns the stored length, or 0 when the key is absent, in which case
/// `out` is left untouched.
pub fn get_state_into<S, K, V>(store: &S, key: &K, out: &mut V) -> Result<usize>
where
    S: HostStore + ?Sized,
    K: Encode + ?Sized,
    V: Decode,
{
    let key = encode(key);
    let len = store.query_size(&key);
    if len == 0 {
        return Ok(0);
    }

    let mut buf = vec![0u8; len];
    store.get(&key, &mut buf);
    *out = decode(&buf)?;
    Ok(len)
}

/// Load the value under `key`, `None` if absent
pub fn get_state<S, K, V>(store: &S, key: &K) -> Result<Option<V>>
where
    S: HostStore + ?Sized,
    K: Encode + ?Sized,
    V: Decode,
{
    let key = encode(key);
    let len = store.query_size(&key);
    if len == 0 {
        return Ok(None);
    }

    let mut buf = vec![0u8; len];
    store.get(&key, &mut buf);
    decode(&buf).map(Some)
}

/// Whether anything is stored under `key`, without fetching it
pub fn has_state<S, K>(store: &S, key: &K) -> bool
where
    S: HostStore + ?Sized,
    K: Encode + ?Sized,
{
    store.query_size(&encode(key)) != 0
}

/// Remove `key`
pub fn delete_state<S, K>(store: &S, key: &K)
where
    S: HostStore + ?Sized,
    K: Encode + ?Sized,
{
    let key = encode(key);
    store.put(&key, &[]);
}
