//! Fixed-width byte strings: hashes and addresses

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::str::FromStr;

use crate::codec::varint::{expect_len, write_len};
use crate::codec::{Decode, Encode, Sink, Source};
use crate::error::{Error, Result};

use super::endian::to_big_endian;
use super::hex::{from_hex, to_hex};

/// `N` raw bytes compared lexicographically
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedHash<const N: usize>([u8; N]);

pub type H256 = FixedHash<32>;
pub type H160 = FixedHash<20>;
pub type H128 = FixedHash<16>;
pub type H64 = FixedHash<8>;
pub type Address = FixedHash<20>;

impl<const N: usize> FixedHash<N> {
    pub const SIZE: usize = N;

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub const fn zero() -> Self {
        Self([0u8; N])
    }

    /// Copy from a slice of exactly `N` bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; N] = bytes.try_into().map_err(|_| Error::LengthMismatch {
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Parse hex text into the leading bytes, zero-filling the rest
    ///
    /// Accepts an optional `0x` prefix and an odd digit count. Text that
    /// decodes to more than `N` bytes is rejected.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = from_hex(text)?;
        if bytes.len() > N {
            return Err(Error::InvalidHex(format!(
                "{} decodes to {} bytes, expected at most {}",
                text,
                bytes.len(),
                N
            )));
        }
        let mut out = [0u8; N];
        out[..bytes.len()].copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Whether every one-bit of `other` is also set in `self`
    pub fn contains(&self, other: &Self) -> bool {
        (*self & *other) == *other
    }

    /// Add one, treating the bytes as a big-endian integer; wraps at the top
    pub fn increment(&mut self) {
        for byte in self.0.iter_mut().rev() {
            let (next, carry) = byte.overflowing_add(1);
            *byte = next;
            if !carry {
                break;
            }
        }
    }
}

impl<const N: usize> Default for FixedHash<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<[u8; N]> for FixedHash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

/// Big-endian, right-aligned
impl<const N: usize> From<u32> for FixedHash<N> {
    fn from(value: u32) -> Self {
        let mut out = [0u8; N];
        to_big_endian(u128::from(value), &mut out);
        Self(out)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedHash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> FromStr for FixedHash<N> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl<const N: usize> fmt::Display for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

impl<const N: usize> fmt::LowerHex for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&to_hex(&self.0))
    }
}

impl<const N: usize> fmt::Debug for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedHash<{}>({:#x})", N, self)
    }
}

// =============================================================================
// Bitwise Operators
// =============================================================================

macro_rules! impl_bitwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<const N: usize> $assign_trait for FixedHash<N> {
            fn $assign_method(&mut self, rhs: Self) {
                for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
                    *a $op *b;
                }
            }
        }

        impl<const N: usize> $trait for FixedHash<N> {
            type Output = Self;

            fn $method(mut self, rhs: Self) -> Self {
                self.$assign_method(rhs);
                self
            }
        }
    };
}

impl_bitwise!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^=);
impl_bitwise!(BitOr, bitor, BitOrAssign, bitor_assign, |=);
impl_bitwise!(BitAnd, bitand, BitAndAssign, bitand_assign, &=);

impl<const N: usize> Not for FixedHash<N> {
    type Output = Self;

    fn not(mut self) -> Self {
        for b in self.0.iter_mut() {
            *b = !*b;
        }
        self
    }
}

// =============================================================================
// Codec
// =============================================================================

impl<const N: usize> Encode for FixedHash<N> {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_len(sink, N);
        sink.write(&self.0);
    }
}

impl<const N: usize> Decode for FixedHash<N> {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        expect_len(src, N)?;
        let mut out = [0u8; N];
        src.read(&mut out)?;
        Ok(Self(out))
    }
}
