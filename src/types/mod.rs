//! Value types shared by contracts
//!
//! Fixed-width hashes and addresses plus the hex and big-endian helpers they
//! are built on.

pub mod endian;
pub mod fixed_hash;
pub mod hex;

pub use fixed_hash::{Address, FixedHash, H128, H160, H256, H64};
