//! Pack/unpack facade
//!
//! Whole-value entry points on top of the cursor and the codec traits.

use crate::error::{Error, Result};

use super::cursor::{ByteCursor, Sink, SizeCounter};
use super::traits::{Decode, Encode};

/// Number of bytes `encode` would produce, computed without allocating
pub fn encoded_size<T: Encode + ?Sized>(value: &T) -> usize {
    let mut counter = SizeCounter::new();
    value.encode_into(&mut counter);
    counter.tell()
}

/// Encode into an exactly-sized buffer
pub fn encode<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = vec![0u8; encoded_size(value)];
    {
        let mut cursor = ByteCursor::new(&mut buf[..]);
        value.encode_into(&mut cursor);
    }
    buf
}

/// Encode into a caller buffer, returning the number of bytes written
///
/// Fails up front, without writing, when `out` is too small.
pub fn encode_to_slice<T: Encode + ?Sized>(value: &T, out: &mut [u8]) -> Result<usize> {
    let size = encoded_size(value);
    if size > out.len() {
        return Err(Error::OutOfBounds {
            requested: size,
            remaining: out.len(),
        });
    }
    let mut cursor = ByteCursor::new(out);
    value.encode_into(&mut cursor);
    Ok(size)
}

/// Decode a `T` from the front of `bytes`
///
/// Trailing bytes after the value are ignored.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut cursor = ByteCursor::new(bytes);
    T::decode_from(&mut cursor)
}
