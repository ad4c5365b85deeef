//! Variable-length unsigned integers
//!
//! Length prefixes use unsigned LEB128: seven payload bits per byte, least
//! significant group first, high bit set on every byte except the last.
//!
//! ```text
//! 300 = 0b1_0010_1100  →  [1010_1100] [0000_0010]
//!                           ▲ more      ▲ last
//! ```

use crate::error::{Error, Result};

use super::cursor::{Sink, Source};
use super::traits::{Decode, Encode};

/// Longest encoding of a `u64`: ceil(64 / 7) = 10 bytes
pub const MAX_VARINT_LEN: usize = 10;

/// Write `value` as LEB128
pub fn write_varint<S: Sink>(sink: &mut S, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            sink.put(byte);
            return;
        }
        sink.put(byte | 0x80);
    }
}

/// Read a LEB128 value, rejecting encodings longer than 64 bits
pub fn read_varint<S: Source>(src: &mut S) -> Result<u64> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = src.get()?;
        let shift = 7 * i as u32;

        // Last group only has room for the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(Error::VarintOverflow {
                max_bytes: MAX_VARINT_LEN,
            });
        }

        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::VarintOverflow {
        max_bytes: MAX_VARINT_LEN,
    })
}

/// Number of bytes `write_varint` emits for `value`
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Write a collection length prefix
pub fn write_len<S: Sink>(sink: &mut S, len: usize) {
    write_varint(sink, len as u64);
}

/// Read a collection length prefix
pub fn read_len<S: Source>(src: &mut S) -> Result<usize> {
    let value = read_varint(src)?;
    usize::try_from(value).map_err(|_| Error::VarintOverflow {
        max_bytes: MAX_VARINT_LEN,
    })
}

/// Read a length prefix and check it against a statically known size
pub fn expect_len<S: Source>(src: &mut S, expected: usize) -> Result<()> {
    let actual = read_len(src)?;
    if actual != expected {
        return Err(Error::LengthMismatch { expected, actual });
    }
    Ok(())
}

// =============================================================================
// VarUint
// =============================================================================

/// A `u64` that encodes as LEB128 instead of eight fixed bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarUint(pub u64);

impl From<u64> for VarUint {
    fn from(value: u64) -> Self {
        VarUint(value)
    }
}

impl From<VarUint> for u64 {
    fn from(value: VarUint) -> Self {
        value.0
    }
}

impl Encode for VarUint {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_varint(sink, self.0);
    }
}

impl Decode for VarUint {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        read_varint(src).map(VarUint)
    }
}
