//! Persistent containers
//!
//! Collections that live in the host store and cache what they touch.
//!
//! ```text
//!            open()                      close()
//!   store ───────────► metadata ...  cache ───────────► store
//!            get()/get_mut()             flush: Modified → put
//!   store ───────────► cache                    Deleted  → delete
//! ```
//!
//! Every container borrows the store for its lifetime, must be closed
//! exactly once, and is the only handle for its name while open.
//!
//! An empty stored value means "absent", so element types must encode to at
//! least one byte. Zero-sized element types such as `()` are rejected when
//! `open` is compiled:
//!
//! ```compile_fail
//! use contractkv::{List, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let list: List<'_, ()> = List::open(&store, "units").unwrap();
//! list.close().unwrap();
//! ```

mod array;
mod cell;
mod keys;
mod list;
mod map;

pub use array::{Array, ArrayIter};
pub use cell::StorageCell;
pub use list::{List, ListIter};
pub use map::{Map, MapIter, MapMode, NonTraversable, NonTraversableMap, Traversable};

use std::marker::PhantomData;

/// Cached value and its reconciliation state
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CacheEntry<T> {
    /// Same as the store
    Normal(T),
    /// Written at flush
    Modified(T),
    /// Removed from the store at flush
    Deleted,
}

impl<T> CacheEntry<T> {
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            CacheEntry::Normal(v) | CacheEntry::Modified(v) => Some(v),
            CacheEntry::Deleted => None,
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            CacheEntry::Normal(v) | CacheEntry::Modified(v) => Some(v),
            CacheEntry::Deleted => None,
        }
    }

    /// Promote `Normal` to `Modified`; other states are unchanged
    pub(crate) fn mark_modified(&mut self) {
        if let CacheEntry::Normal(_) = self {
            if let CacheEntry::Normal(v) = std::mem::replace(self, CacheEntry::Deleted) {
                *self = CacheEntry::Modified(v);
            }
        }
    }

    /// Live value, replacing a `Deleted` entry with `Modified(fill())` first
    pub(crate) fn revive_with(&mut self, fill: impl FnOnce() -> T) -> &mut T {
        if let CacheEntry::Deleted = self {
            *self = CacheEntry::Modified(fill());
        }
        match self {
            CacheEntry::Normal(v) | CacheEntry::Modified(v) => v,
            CacheEntry::Deleted => unreachable!("deleted entry revived above"),
        }
    }

    /// Back to `Normal` after a successful flush; `None` for deleted entries
    pub(crate) fn settle(self) -> Option<Self> {
        match self {
            CacheEntry::Normal(v) | CacheEntry::Modified(v) => Some(CacheEntry::Normal(v)),
            CacheEntry::Deleted => None,
        }
    }
}

/// Compile-time rejection of zero-sized stored values
pub(crate) struct NonEmptyEncoding<T>(PhantomData<T>);

impl<T> NonEmptyEncoding<T> {
    pub(crate) const CHECK: () = assert!(
        std::mem::size_of::<T>() != 0,
        "zero-sized values encode to nothing and would read back as deleted"
    );
}

/// Tracks whether a container was closed; reports it on drop otherwise
pub(crate) struct CloseGuard {
    kind: &'static str,
    name: String,
    closed: bool,
}

impl CloseGuard {
    pub(crate) fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            closed: false,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        if !self.closed {
            report_unclosed(self.kind, &self.name);
        }
    }
}

/// Report a container that went out of scope without `close()`
///
/// Pending changes are lost at this point. Debug builds turn the mistake into
/// a panic unless the thread is already unwinding.
pub(crate) fn report_unclosed(kind: &'static str, name: &str) {
    if std::thread::panicking() {
        return;
    }
    tracing::error!(kind, name, "container dropped without close(), pending changes lost");
    if cfg!(debug_assertions) {
        panic!("{} `{}` dropped without close()", kind, name);
    }
}
