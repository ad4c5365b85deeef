//! Persistent map
//!
//! Entries live under `MapKey { "__map__" + name, key }`. A traversable map
//! also keeps the ordered set of its keys under `"__map__" + name`, which is
//! what `len()` and iteration read; a non-traversable map has no such index
//! and only supports point operations.

use std::collections::btree_map::Entry;
use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::marker::PhantomData;

use crate::codec::Codec;
use crate::error::Result;
use crate::state::{delete_state, get_state, has_state, put_state};
use crate::store::{HostStore, MemoryStore};

use super::keys::{qualified_name, MapKey, MAP_PREFIX};
use super::{report_unclosed, CacheEntry, NonEmptyEncoding};

mod sealed {
    pub trait Sealed {}
}

/// Chooses whether a map maintains a key index
pub trait MapMode: sealed::Sealed {
    const TRAVERSABLE: bool;
}

/// Keeps a persisted key index; enables `len()` and iteration
#[derive(Debug, Clone, Copy, Default)]
pub struct Traversable;

/// Point operations only; cheaper to flush
#[derive(Debug, Clone, Copy, Default)]
pub struct NonTraversable;

impl sealed::Sealed for Traversable {}
impl sealed::Sealed for NonTraversable {}

impl MapMode for Traversable {
    const TRAVERSABLE: bool = true;
}

impl MapMode for NonTraversable {
    const TRAVERSABLE: bool = false;
}

/// Map without a key index
pub type NonTraversableMap<'a, K, V, S = MemoryStore> = Map<'a, K, V, NonTraversable, S>;

/// Key-value map persisted in the host store
#[must_use = "a Map must be closed to write its changes back"]
pub struct Map<'a, K, V, M = Traversable, S = MemoryStore> {
    store: &'a S,
    name: String,
    qualified: String,
    cache: BTreeMap<K, CacheEntry<V>>,
    index: BTreeSet<K>,
    closed: bool,
    _mode: PhantomData<M>,
}

impl<'a, K, V, M, S> Map<'a, K, V, M, S>
where
    K: Codec + Ord + Clone,
    V: Codec + Default + Clone,
    M: MapMode,
    S: HostStore,
{
    /// Open the map called `name`, loading its key index if it keeps one
    pub fn open(store: &'a S, name: &str) -> Result<Self> {
        let () = NonEmptyEncoding::<V>::CHECK;
        let qualified = qualified_name(MAP_PREFIX, name);
        let index = if M::TRAVERSABLE {
            get_state(store, &qualified)?.unwrap_or_default()
        } else {
            BTreeSet::new()
        };

        tracing::debug!(
            name,
            traversable = M::TRAVERSABLE,
            keys = index.len(),
            "map opened"
        );

        Ok(Self {
            store,
            name: name.to_string(),
            qualified,
            cache: BTreeMap::new(),
            index,
            closed: false,
            _mode: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set `key` to `value` in the cache
    pub fn insert(&mut self, key: K, value: V) {
        if M::TRAVERSABLE {
            self.index.insert(key.clone());
        }
        self.cache.insert(key, CacheEntry::Modified(value));
    }

    /// Value for `key`, loading it on first access
    ///
    /// An absent key is created with `V::default()` and will be written at
    /// flush.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        let entry = self.load(key)?;
        Ok(entry.revive_with(V::default))
    }

    /// Mutable value for `key`; the entry is written back at flush
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let entry = self.load(key)?;
        entry.mark_modified();
        Ok(entry.revive_with(V::default))
    }

    /// Value for `key` without caching it; `V::default()` if absent
    pub fn get_const(&self, key: &K) -> Result<V> {
        match self.cache.get(key) {
            Some(CacheEntry::Normal(v)) | Some(CacheEntry::Modified(v)) => Ok(v.clone()),
            Some(CacheEntry::Deleted) => Ok(V::default()),
            None => Ok(get_state(self.store, &self.map_key(key))?.unwrap_or_default()),
        }
    }

    /// Write `value` straight to the store
    ///
    /// The cache only changes if it already holds `key`.
    pub fn insert_const(&mut self, key: K, value: V) {
        if M::TRAVERSABLE {
            self.index.insert(key.clone());
        }
        put_state(
            self.store,
            &MapKey {
                name: &self.qualified,
                key: &key,
            },
            &value,
        );
        if let Some(entry) = self.cache.get_mut(&key) {
            *entry = match entry {
                CacheEntry::Modified(_) => CacheEntry::Modified(value),
                _ => CacheEntry::Normal(value),
            };
        }
    }

    /// Remove `key`; the store entry is deleted at flush
    pub fn remove(&mut self, key: &K) {
        if M::TRAVERSABLE {
            self.index.remove(key);
        }
        self.cache.insert(key.clone(), CacheEntry::Deleted);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        match self.cache.get(key) {
            Some(entry) => entry.value().is_some(),
            None if M::TRAVERSABLE => self.index.contains(key),
            None => has_state(self.store, &self.map_key(key)),
        }
    }

    /// Write back every touched entry and, if traversable, the key index
    pub fn flush(&mut self) -> Result<()> {
        let mut written = 0usize;
        let mut deleted = 0usize;

        for (key, entry) in &self.cache {
            let map_key = MapKey {
                name: &self.qualified,
                key,
            };
            match entry {
                CacheEntry::Modified(value) => {
                    put_state(self.store, &map_key, value);
                    written += 1;
                }
                CacheEntry::Deleted => {
                    delete_state(self.store, &map_key);
                    if M::TRAVERSABLE {
                        self.index.remove(key);
                    }
                    deleted += 1;
                }
                CacheEntry::Normal(_) => {}
            }
        }

        if M::TRAVERSABLE {
            put_state(self.store, &self.qualified, &self.index);
        }

        self.cache = std::mem::take(&mut self.cache)
            .into_iter()
            .filter_map(|(k, entry)| entry.settle().map(|entry| (k, entry)))
            .collect();

        tracing::debug!(name = %self.name, written, deleted, "map flushed");
        Ok(())
    }

    /// Flush and release the map
    pub fn close(mut self) -> Result<()> {
        let result = self.flush();
        self.closed = true;
        result
    }

    fn load(&mut self, key: &K) -> Result<&mut CacheEntry<V>> {
        let entry = match self.cache.entry(key.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let map_key = MapKey {
                    name: &self.qualified,
                    key,
                };
                let stored = get_state(self.store, &map_key)?;
                vacant.insert(stored.map_or(CacheEntry::Deleted, CacheEntry::Normal))
            }
        };
        if M::TRAVERSABLE {
            self.index.insert(key.clone());
        }
        Ok(entry)
    }

    fn map_key<'k>(&'k self, key: &'k K) -> MapKey<'k, K> {
        MapKey {
            name: &self.qualified,
            key,
        }
    }
}

impl<'a, K, V, S> Map<'a, K, V, Traversable, S>
where
    K: Codec + Ord + Clone,
    V: Codec + Default + Clone,
    S: HostStore,
{
    /// Number of keys in the index
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> btree_set::Iter<'_, K> {
        self.index.iter()
    }

    /// Entries in key order; values come from the cache or the store and are
    /// not cached
    pub fn iter(&self) -> MapIter<'_, 'a, K, V, S> {
        MapIter {
            map: self,
            keys: self.index.iter(),
        }
    }
}

impl<K, V, M, S> Drop for Map<'_, K, V, M, S> {
    fn drop(&mut self) {
        if !self.closed {
            report_unclosed("Map", &self.name);
        }
    }
}

/// Iterator over a traversable map
pub struct MapIter<'m, 'a, K, V, S> {
    map: &'m Map<'a, K, V, Traversable, S>,
    keys: btree_set::Iter<'m, K>,
}

impl<'m, K, V, S> Iterator for MapIter<'m, '_, K, V, S>
where
    K: Codec + Ord + Clone,
    V: Codec + Default + Clone,
    S: HostStore,
{
    type Item = Result<(&'m K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(self.map.get_const(key).map(|value| (key, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V, S> DoubleEndedIterator for MapIter<'_, '_, K, V, S>
where
    K: Codec + Ord + Clone,
    V: Codec + Default + Clone,
    S: HostStore,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let key = self.keys.next_back()?;
        Some(self.map.get_const(key).map(|value| (key, value)))
    }
}
