//! Codec implementations for std shapes
//!
//! | Shape                  | Wire form                                   |
//! |------------------------|---------------------------------------------|
//! | integers, floats, char | fixed width, little-endian                  |
//! | usize / isize          | 8 bytes, as u64 / i64                       |
//! | bool                   | 1 byte, non-zero decodes as true            |
//! | str / String           | varint(len) + UTF-8 bytes                   |
//! | Vec<T> / [T]           | varint(len) + elements                      |
//! | Vec<bool>              | varint(bits) + varint(bytes) + packed bits  |
//! | [T; N]                 | varint(N) + elements                        |
//! | BTreeSet / BTreeMap    | varint(len) + elements / pairs, in order    |
//! | tuples, ()             | components in order, no prefix              |

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

use super::cursor::{Sink, Source};
use super::traits::{check_item_count, Decode, Encode};
use super::varint::{expect_len, read_len, write_len};

// =============================================================================
// Primitives
// =============================================================================

macro_rules! impl_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode_into<S: Sink>(&self, sink: &mut S) {
                    sink.write(&self.to_le_bytes());
                }
            }

            impl Decode for $ty {
                fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    src.read(&mut bytes)?;
                    Ok(<$ty>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_primitive!(u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl Encode for u8 {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        sink.put(*self);
    }

    fn encode_items<S: Sink>(items: &[Self], sink: &mut S) {
        sink.write(items);
    }
}

impl Decode for u8 {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        src.get()
    }

    fn decode_items<S: Source>(n: usize, src: &mut S) -> Result<Vec<Self>> {
        Ok(src.take(n)?.to_vec())
    }
}

impl Encode for usize {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        (*self as u64).encode_into(sink);
    }
}

impl Decode for usize {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let value = u64::decode_from(src)?;
        usize::try_from(value).map_err(|_| Error::IntegerOverflow {
            type_name: "usize",
            value: i128::from(value),
        })
    }
}

impl Encode for isize {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        (*self as i64).encode_into(sink);
    }
}

impl Decode for isize {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let value = i64::decode_from(src)?;
        isize::try_from(value).map_err(|_| Error::IntegerOverflow {
            type_name: "isize",
            value: i128::from(value),
        })
    }
}

impl Encode for char {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        u32::from(*self).encode_into(sink);
    }
}

impl Decode for char {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let value = u32::decode_from(src)?;
        char::from_u32(value).ok_or(Error::InvalidChar(value))
    }
}

// =============================================================================
// Bool
// =============================================================================

impl Encode for bool {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        sink.put(u8::from(*self));
    }

    fn encode_seq<S: Sink>(items: &[Self], sink: &mut S) {
        write_len(sink, items.len());
        write_len(sink, items.len().div_ceil(8));
        for group in items.chunks(8) {
            let byte = group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, &set)| acc | (u8::from(set) << bit));
            sink.put(byte);
        }
    }
}

impl Decode for bool {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        Ok(src.get()? != 0)
    }

    fn decode_seq<S: Source>(src: &mut S) -> Result<Vec<Self>> {
        let bits = read_len(src)?;
        let byte_count = read_len(src)?;
        let expected = bits.div_ceil(8);
        if byte_count != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: byte_count,
            });
        }

        let packed = src.take(byte_count)?;
        Ok((0..bits)
            .map(|i| packed[i / 8] & (1 << (i % 8)) != 0)
            .collect())
    }
}

// =============================================================================
// Strings
// =============================================================================

impl Encode for str {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_len(sink, self.len());
        sink.write(self.as_bytes());
    }
}

impl Encode for String {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        self.as_str().encode_into(sink);
    }
}

impl Decode for String {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let len = read_len(src)?;
        let bytes = src.take(len)?.to_vec();
        Ok(String::from_utf8(bytes)?)
    }
}

// =============================================================================
// Sequences
// =============================================================================

impl<T: Encode> Encode for [T] {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        T::encode_seq(self, sink);
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        T::encode_seq(self, sink);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        T::decode_seq(src)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_len(sink, N);
        T::encode_items(self, sink);
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        expect_len(src, N)?;
        let items = T::decode_items(N, src)?;
        items.try_into().map_err(|items: Vec<T>| Error::LengthMismatch {
            expected: N,
            actual: items.len(),
        })
    }
}

// =============================================================================
// Ordered collections
// =============================================================================

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_len(sink, self.len());
        for item in self {
            item.encode_into(sink);
        }
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let len = read_len(src)?;
        check_item_count::<T>(len)?;
        let mut set = BTreeSet::new();
        for _ in 0..len {
            set.insert(T::decode_from(src)?);
        }
        Ok(set)
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode_into<S: Sink>(&self, sink: &mut S) {
        write_len(sink, self.len());
        for (key, value) in self {
            key.encode_into(sink);
            value.encode_into(sink);
        }
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
        let len = read_len(src)?;
        check_item_count::<(K, V)>(len)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = K::decode_from(src)?;
            let value = V::decode_from(src)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

// =============================================================================
// Tuples
// =============================================================================

impl Encode for () {
    fn encode_into<S: Sink>(&self, _sink: &mut S) {}
}

impl Decode for () {
    fn decode_from<S: Source>(_src: &mut S) -> Result<Self> {
        Ok(())
    }
}

macro_rules! impl_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Encode),+> Encode for ($($name,)+) {
            fn encode_into<S: Sink>(&self, sink: &mut S) {
                $(self.$idx.encode_into(sink);)+
            }
        }

        impl<$($name: Decode),+> Decode for ($($name,)+) {
            fn decode_from<S: Source>(src: &mut S) -> Result<Self> {
                Ok(($($name::decode_from(src)?,)+))
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);
