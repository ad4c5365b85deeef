//! Binary codec
//!
//! Type-directed serialization used for every key and value that reaches the
//! host store. Dispatch is static: each shape implements [`Encode`] and
//! [`Decode`], and the facade functions in [`pack`] drive them.
//!
//! ## Value Format
//!
//! ```text
//! fixed width:   ┌──────────────────────┐
//!                │ little-endian bytes  │
//!                └──────────────────────┘
//!
//! variable:      ┌───────────────┬──────────────────────────┐
//!                │ LEB128 length │ elements / pairs / bytes │
//!                └───────────────┴──────────────────────────┘
//!
//! aggregates:    ┌─────────┬─────────┬─────┬─────────┐
//!                │ field 0 │ field 1 │ ... │ field n │   (no prefix, no tags)
//!                └─────────┴─────────┴─────┴─────────┘
//! ```

pub mod cursor;
pub mod impls;
pub mod macros;
pub mod pack;
pub mod traits;
pub mod varint;

pub use cursor::{ByteCursor, SizeCounter, Sink, Source};
pub use pack::{decode, encode, encode_to_slice, encoded_size};
pub use traits::{Codec, Decode, Encode};
pub use varint::VarUint;
