//! Persistent list
//!
//! Elements sit in physical slots that are never reused. A live/dead bitmap
//! maps the dense logical index space onto those slots:
//!
//! ```text
//! slot:     0   1   2   3   4        next slot = 5
//! bitmap:   1   0   1   1   0        len = 3
//! index:    0       1   2
//! ```
//!
//! Stored values:
//! - `"__list__" + name`              bitmap (`Vec<bool>`, bit-packed)
//! - `"__list__" + name + "maxNumber"` next slot (u64)
//! - `"__list__" + name + "size"`      live count (u64)
//! - `"__list__" + name + 'L' + slot`  element

use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::state::{delete_state, get_state, put_state};
use crate::store::{HostStore, MemoryStore};

use super::keys::{aux_key, qualified_name, slot_key, LIST_PREFIX, LIST_TAG};
use super::{report_unclosed, CacheEntry, NonEmptyEncoding};

const MAX_NUMBER_SUFFIX: &str = "maxNumber";
const SIZE_SUFFIX: &str = "size";

/// Ordered sequence persisted in the host store
#[must_use = "a List must be closed to write its changes back"]
pub struct List<'a, T, S = MemoryStore> {
    store: &'a S,
    name: String,
    qualified: String,
    cache: BTreeMap<usize, CacheEntry<T>>,
    mark: Vec<bool>,
    next_slot: usize,
    size: usize,
    closed: bool,
}

impl<'a, T, S> List<'a, T, S>
where
    T: Codec + Clone,
    S: HostStore,
{
    /// Open the list called `name`, loading its bitmap and counters
    pub fn open(store: &'a S, name: &str) -> Result<Self> {
        let () = NonEmptyEncoding::<T>::CHECK;
        let qualified = qualified_name(LIST_PREFIX, name);

        let mark: Vec<bool> = get_state(store, &qualified)?.unwrap_or_default();
        let next_slot: u64 =
            get_state(store, &aux_key(&qualified, MAX_NUMBER_SUFFIX))?.unwrap_or_default();
        let size: u64 = get_state(store, &aux_key(&qualified, SIZE_SUFFIX))?.unwrap_or_default();

        let mut next_slot = next_slot as usize;
        let mut size = size as usize;

        // The bitmap is authoritative
        if next_slot != mark.len() {
            tracing::warn!(
                name,
                next_slot,
                bitmap_len = mark.len(),
                "list slot counter disagrees with bitmap"
            );
            next_slot = mark.len();
        }
        let live = mark.iter().filter(|&&live| live).count();
        if size != live {
            tracing::warn!(name, size, live, "list size disagrees with bitmap");
            size = live;
        }

        tracing::debug!(name, len = size, slots = next_slot, "list opened");

        Ok(Self {
            store,
            name: name.to_string(),
            qualified,
            cache: BTreeMap::new(),
            mark,
            next_slot,
            size,
            closed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Append `value` in a fresh slot
    pub fn push(&mut self, value: T) {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.mark.push(true);
        self.cache.insert(slot, CacheEntry::Modified(value));
        self.size += 1;
    }

    /// Element at `index`
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn get(&mut self, index: usize) -> Result<&T> {
        let value = self.load(index, false)?;
        Ok(value)
    }

    /// Mutable element at `index`; written back at flush
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.load(index, true)
    }

    /// Element at `index` without caching it
    pub fn get_const(&self, index: usize) -> Result<T> {
        let slot = self.slot_of(index);
        self.read_slot(index, slot)
    }

    /// Write `value` at `index` straight to the store, dropping any cached copy
    pub fn set_const(&mut self, index: usize, value: &T) {
        let slot = self.slot_of(index);
        put_state(self.store, &self.slot_key(slot), value);
        self.cache.remove(&slot);
    }

    /// Remove the element at `index`; later elements shift down by one
    pub fn remove(&mut self, index: usize) {
        let slot = self.slot_of(index);
        self.kill(slot);
    }

    /// Remove every element equal to `value`, returning how many went
    pub fn remove_value(&mut self, value: &T) -> Result<usize>
    where
        T: PartialEq,
    {
        let mut removed = 0;
        let mut index = 0;
        for slot in 0..self.mark.len() {
            if !self.mark[slot] {
                continue;
            }
            if self.read_slot(index, slot)? == *value {
                self.kill(slot);
                removed += 1;
            } else {
                index += 1;
            }
        }
        Ok(removed)
    }

    /// Elements front to back, read without caching
    pub fn iter(&self) -> ListIter<'_, 'a, T, S> {
        ListIter {
            list: self,
            front: 0,
            back: self.size,
        }
    }

    /// Write back touched slots, then the bitmap and both counters
    pub fn flush(&mut self) -> Result<()> {
        let mut written = 0usize;
        let mut deleted = 0usize;

        for (&slot, entry) in &self.cache {
            let key = slot_key(&self.qualified, LIST_TAG, slot);
            match entry {
                CacheEntry::Modified(value) => {
                    put_state(self.store, &key, value);
                    written += 1;
                }
                CacheEntry::Deleted => {
                    delete_state(self.store, &key);
                    self.mark[slot] = false;
                    deleted += 1;
                }
                CacheEntry::Normal(_) => {}
            }
        }

        put_state(self.store, &self.qualified, &self.mark);
        put_state(
            self.store,
            &aux_key(&self.qualified, MAX_NUMBER_SUFFIX),
            &(self.next_slot as u64),
        );
        put_state(
            self.store,
            &aux_key(&self.qualified, SIZE_SUFFIX),
            &(self.size as u64),
        );

        self.cache = std::mem::take(&mut self.cache)
            .into_iter()
            .filter_map(|(slot, entry)| entry.settle().map(|entry| (slot, entry)))
            .collect();

        tracing::debug!(name = %self.name, len = self.size, written, deleted, "list flushed");
        Ok(())
    }

    /// Flush and release the list
    pub fn close(mut self) -> Result<()> {
        let result = self.flush();
        self.closed = true;
        result
    }

    /// Physical slot holding logical `index`, by linear bitmap scan
    fn slot_of(&self, index: usize) -> usize {
        let slot = if index < self.size {
            self.mark
                .iter()
                .enumerate()
                .filter(|(_, &live)| live)
                .nth(index)
                .map(|(slot, _)| slot)
        } else {
            None
        };
        match slot {
            Some(slot) => slot,
            None => panic!(
                "list `{}`: index {} out of range (len {})",
                self.name, index, self.size
            ),
        }
    }

    fn slot_key(&self, slot: usize) -> Vec<u8> {
        slot_key(&self.qualified, LIST_TAG, slot)
    }

    fn read_slot(&self, index: usize, slot: usize) -> Result<T> {
        if let Some(value) = self.cache.get(&slot).and_then(CacheEntry::value) {
            return Ok(value.clone());
        }
        get_state(self.store, &self.slot_key(slot))?.ok_or_else(|| Error::MissingSlot {
            name: self.name.clone(),
            index,
            slot,
        })
    }

    fn load(&mut self, index: usize, modify: bool) -> Result<&mut T> {
        let slot = self.slot_of(index);
        if !self.cache.contains_key(&slot) {
            let value = self.read_slot(index, slot)?;
            self.cache.insert(slot, CacheEntry::Normal(value));
        }
        if let Some(entry) = self.cache.get_mut(&slot) {
            if modify {
                entry.mark_modified();
            }
            if let Some(value) = entry.value_mut() {
                return Ok(value);
            }
        }
        Err(Error::MissingSlot {
            name: self.name.clone(),
            index,
            slot,
        })
    }

    fn kill(&mut self, slot: usize) {
        self.mark[slot] = false;
        self.size -= 1;
        self.cache.insert(slot, CacheEntry::Deleted);
    }
}

impl<T, S> Drop for List<'_, T, S> {
    fn drop(&mut self) {
        if !self.closed {
            report_unclosed("List", &self.name);
        }
    }
}

/// Double-ended iterator over a list's live elements
pub struct ListIter<'l, 'a, T, S> {
    list: &'l List<'a, T, S>,
    front: usize,
    back: usize,
}

impl<T, S> Iterator for ListIter<'_, '_, T, S>
where
    T: Codec + Clone,
    S: HostStore,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.list.get_const(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T, S> DoubleEndedIterator for ListIter<'_, '_, T, S>
where
    T: Codec + Clone,
    S: HostStore,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.list.get_const(self.back))
    }
}

impl<T, S> ExactSizeIterator for ListIter<'_, '_, T, S>
where
    T: Codec + Clone,
    S: HostStore,
{
}
