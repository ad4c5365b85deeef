//! Storage key layout for containers
//!
//! ```text
//! List slot:    "__list__"  + name + 'L' + slot (u64 LE)
//! Array slot:   "__array__" + name + 'A' + pos  (u64 LE)
//! Map entry:    MapKey { "__map__" + name, key }
//! ```
//!
//! Each key is a byte string that the state adapter packs once more before
//! handing it to the host.

use crate::codec::{Encode, Sink};

pub(crate) const MAP_PREFIX: &str = "__map__";
pub(crate) const LIST_PREFIX: &str = "__list__";
pub(crate) const ARRAY_PREFIX: &str = "__array__";

pub(crate) const LIST_TAG: u8 = b'L';
pub(crate) const ARRAY_TAG: u8 = b'A';

/// `prefix + name`, the base every container key starts from
pub(crate) fn qualified_name(prefix: &str, name: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + name.len());
    out.push_str(prefix);
    out.push_str(name);
    out
}

/// `base + tag + index as u64 little-endian`
pub(crate) fn slot_key(base: &str, tag: u8, index: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(base.len() + 1 + 8);
    key.extend_from_slice(base.as_bytes());
    key.push(tag);
    key.extend_from_slice(&(index as u64).to_le_bytes());
    key
}

/// `base + suffix`, for auxiliary values stored next to a container
pub(crate) fn aux_key(base: &str, suffix: &str) -> String {
    qualified_name(base, suffix)
}

/// Map entry key: the qualified map name followed by the packed user key
pub(crate) struct MapKey<'k, K: ?Sized> {
    pub(crate) name: &'k str,
    pub(crate) key: &'k K,
}

impl<K: Encode + ?Sized> Encode for MapKey<'_, K> {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        self.name.encode_into(sink);
        self.key.encode_into(sink);
    }
}
