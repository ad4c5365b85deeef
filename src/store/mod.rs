//! Host key-value store
//!
//! The host exposes three raw primitives over byte keys and byte values.
//! Nothing in the crate talks to them directly except the state adapter.
//!
//! ```text
//! put(key, value)        value.is_empty() deletes the key
//! query_size(key) -> n   0 means absent
//! get(key, out)          out is pre-sized to query_size(key)
//! ```

mod memory;
pub mod snapshot;

pub use memory::{MemoryStore, StoreStats};

/// Raw storage primitives provided by the execution host
///
/// Methods take `&self`: the host owns the store, and several containers can
/// hold a shared reference to it at once.
pub trait HostStore {
    /// Store `value` under `key`; an empty value deletes the key
    fn put(&self, key: &[u8], value: &[u8]);

    /// Length of the value under `key`, or 0 if absent
    fn query_size(&self, key: &[u8]) -> usize;

    /// Copy the value under `key` into `out`
    fn get(&self, key: &[u8], out: &mut [u8]);
}
