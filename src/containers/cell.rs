//! Single persisted value
//!
//! Stored under the packed cell name with no prefix. Operators act on the
//! in-memory copy; `close()` writes it back unconditionally.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{
    AddAssign, BitAndAssign, BitOrAssign, BitXorAssign, Deref, DerefMut, DivAssign, MulAssign,
    RemAssign, ShlAssign, ShrAssign, SubAssign,
};

use crate::codec::Codec;
use crate::error::Result;
use crate::state::{get_state, put_state};
use crate::store::{HostStore, MemoryStore};

use super::{CloseGuard, NonEmptyEncoding};

/// One value persisted under one name
#[must_use = "a StorageCell must be closed to write its value back"]
pub struct StorageCell<'a, T, S = MemoryStore> {
    store: &'a S,
    guard: CloseGuard,
    value: T,
}

impl<'a, T, S> StorageCell<'a, T, S>
where
    T: Codec,
    S: HostStore,
{
    /// Load the value stored under `name`, or start from `default`
    pub fn open(store: &'a S, name: &str, default: T) -> Result<Self> {
        let () = NonEmptyEncoding::<T>::CHECK;
        let stored: Option<T> = get_state(store, name)?;
        let found = stored.is_some();
        tracing::debug!(name, found, "storage cell opened");

        Ok(Self {
            store,
            guard: CloseGuard::new("StorageCell", name),
            value: stored.unwrap_or(default),
        })
    }

    /// `open` with `T::default()` as the fallback
    pub fn open_or_default(store: &'a S, name: &str) -> Result<Self>
    where
        T: Default,
    {
        Self::open(store, name, T::default())
    }

    pub fn name(&self) -> &str {
        self.guard.name()
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Write the value back
    pub fn flush(&mut self) -> Result<()> {
        put_state(self.store, self.guard.name(), &self.value);
        tracing::debug!(name = %self.guard.name(), "storage cell flushed");
        Ok(())
    }

    /// Write the value back and release the cell
    pub fn close(mut self) -> Result<()> {
        let result = self.flush();
        self.guard.close();
        result
    }

    /// Close the cell and hand back its value
    pub fn into_inner(mut self) -> Result<T> {
        let result = self.flush();
        self.guard.close();
        result.map(|()| self.value)
    }
}

impl<T, S> Deref for StorageCell<'_, T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, S> DerefMut for StorageCell<'_, T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug, S> fmt::Debug for StorageCell<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCell")
            .field("name", &self.guard.name())
            .field("value", &self.value)
            .finish()
    }
}

impl<T: PartialEq, S> PartialEq<T> for StorageCell<'_, T, S> {
    fn eq(&self, other: &T) -> bool {
        self.value == *other
    }
}

impl<T: PartialOrd, S> PartialOrd<T> for StorageCell<'_, T, S> {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

macro_rules! forward_assign_op {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl<T, R, S> $trait<R> for StorageCell<'_, T, S>
            where
                T: $trait<R>,
            {
                fn $method(&mut self, rhs: R) {
                    self.value.$method(rhs);
                }
            }
        )*
    };
}

forward_assign_op!(
    AddAssign::add_assign,
    SubAssign::sub_assign,
    MulAssign::mul_assign,
    DivAssign::div_assign,
    RemAssign::rem_assign,
    BitAndAssign::bitand_assign,
    BitOrAssign::bitor_assign,
    BitXorAssign::bitxor_assign,
    ShlAssign::shl_assign,
    ShrAssign::shr_assign,
);
