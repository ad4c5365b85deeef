//! # contractkv
//!
//! Storage toolkit for smart-contract code running against a host key-value
//! store:
//! - A compact, type-directed binary codec for keys and values
//! - Typed get/put/delete on top of the raw host primitives
//! - Persistent `Map`, `List`, `Array` and `StorageCell` containers that
//!   cache what they touch and write back once, on `close()`
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Contract Code                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │        Containers: Map / List / Array / StorageCell         │
//! │              (cache + Normal/Modified/Deleted)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │     State Adapter: put_state / get_state / delete_state     │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌───────────────────┐
//!   │      Codec      │               │     HostStore     │
//!   │ (ByteCursor +   │               │ (put / query_size │
//!   │  Encode/Decode) │               │  / get)           │
//!   └─────────────────┘               └───────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use contractkv::{List, MemoryStore};
//!
//! let store = MemoryStore::new();
//!
//! let mut todo: List<'_, String> = List::open(&store, "todo").unwrap();
//! todo.push("write tests".to_string());
//! todo.close().unwrap();
//!
//! let todo: List<'_, String> = List::open(&store, "todo").unwrap();
//! assert_eq!(todo.len(), 1);
//! todo.close().unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod types;
pub mod store;
pub mod state;
pub mod containers;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Error, Result};
pub use config::{Config, SyncStrategy};
pub use codec::{decode, encode, encoded_size, Codec, Decode, Encode};
pub use types::{Address, FixedHash, H128, H160, H256, H64};
pub use store::{HostStore, MemoryStore, StoreStats};
pub use state::{delete_state, get_state, get_state_into, put_state};
pub use containers::{
    Array, List, Map, MapMode, NonTraversable, NonTraversableMap, StorageCell, Traversable,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of contractkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
