//! Persistent fixed-size array
//!
//! Position `p` is stored under `"__array__" + name + 'A' + p` (u64 LE).
//! Positions never written read as `T::default()`.

use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::error::Result;
use crate::state::{get_state, put_state};
use crate::store::{HostStore, MemoryStore};

use super::keys::{qualified_name, slot_key, ARRAY_PREFIX, ARRAY_TAG};
use super::{report_unclosed, NonEmptyEncoding};

/// `N` values persisted in the host store
#[must_use = "an Array must be closed to write its changes back"]
pub struct Array<'a, T, const N: usize, S = MemoryStore> {
    store: &'a S,
    name: String,
    qualified: String,
    cache: BTreeMap<usize, T>,
    closed: bool,
}

impl<'a, T, const N: usize, S> Array<'a, T, N, S>
where
    T: Codec + Default + Clone,
    S: HostStore,
{
    const NONZERO: () = assert!(N != 0, "Array capacity must be non-zero");

    /// Open the array called `name`; nothing is loaded until accessed
    pub fn open(store: &'a S, name: &str) -> Result<Self> {
        let () = Self::NONZERO;
        let () = NonEmptyEncoding::<T>::CHECK;

        tracing::debug!(name, capacity = N, "array opened");
        Ok(Self {
            store,
            name: name.to_string(),
            qualified: qualified_name(ARRAY_PREFIX, name),
            cache: BTreeMap::new(),
            closed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capacity, always `N`
    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value at `pos`, loading it on first access
    ///
    /// # Panics
    ///
    /// If `pos >= N`.
    pub fn get(&mut self, pos: usize) -> Result<&T> {
        let value = self.load(pos)?;
        Ok(value)
    }

    /// Mutable value at `pos`
    ///
    /// # Panics
    ///
    /// If `pos >= N`.
    pub fn get_mut(&mut self, pos: usize) -> Result<&mut T> {
        self.load(pos)
    }

    /// Replace the value at `pos` in the cache
    pub fn set(&mut self, pos: usize, value: T) {
        self.check(pos);
        self.cache.insert(pos, value);
    }

    /// Value at `pos` without caching it
    pub fn get_const(&self, pos: usize) -> Result<T> {
        self.check(pos);
        match self.cache.get(&pos) {
            Some(value) => Ok(value.clone()),
            None => Ok(get_state(self.store, &self.slot_key(pos))?.unwrap_or_default()),
        }
    }

    /// Write `value` at `pos` straight to the store, updating any cached copy
    pub fn set_const(&mut self, pos: usize, value: T) {
        self.check(pos);
        put_state(self.store, &self.slot_key(pos), &value);
        if let Some(cached) = self.cache.get_mut(&pos) {
            *cached = value;
        }
    }

    /// Every position in order, read without caching
    pub fn iter(&self) -> ArrayIter<'_, 'a, T, N, S> {
        ArrayIter {
            array: self,
            front: 0,
            back: N,
        }
    }

    /// Write every cached position
    pub fn flush(&mut self) -> Result<()> {
        for (&pos, value) in &self.cache {
            put_state(self.store, &slot_key(&self.qualified, ARRAY_TAG, pos), value);
        }
        tracing::debug!(name = %self.name, written = self.cache.len(), "array flushed");
        Ok(())
    }

    /// Flush and release the array
    pub fn close(mut self) -> Result<()> {
        let result = self.flush();
        self.closed = true;
        result
    }

    fn check(&self, pos: usize) {
        assert!(
            pos < N,
            "array `{}`: position {} out of range (capacity {})",
            self.name,
            pos,
            N
        );
    }

    fn slot_key(&self, pos: usize) -> Vec<u8> {
        slot_key(&self.qualified, ARRAY_TAG, pos)
    }

    fn load(&mut self, pos: usize) -> Result<&mut T> {
        self.check(pos);
        if !self.cache.contains_key(&pos) {
            let value = get_state(self.store, &self.slot_key(pos))?.unwrap_or_default();
            self.cache.insert(pos, value);
        }
        Ok(self.cache.entry(pos).or_default())
    }
}

impl<T, const N: usize, S> Drop for Array<'_, T, N, S> {
    fn drop(&mut self) {
        if !self.closed {
            report_unclosed("Array", &self.name);
        }
    }
}

/// Double-ended iterator over every array position
pub struct ArrayIter<'r, 'a, T, const N: usize, S> {
    array: &'r Array<'a, T, N, S>,
    front: usize,
    back: usize,
}

impl<T, const N: usize, S> Iterator for ArrayIter<'_, '_, T, N, S>
where
    T: Codec + Default + Clone,
    S: HostStore,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.array.get_const(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T, const N: usize, S> DoubleEndedIterator for ArrayIter<'_, '_, T, N, S>
where
    T: Codec + Default + Clone,
    S: HostStore,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.array.get_const(self.back))
    }
}

impl<T, const N: usize, S> ExactSizeIterator for ArrayIter<'_, '_, T, N, S>
where
    T: Codec + Default + Clone,
    S: HostStore,
{
}
