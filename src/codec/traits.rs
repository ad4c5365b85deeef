//! Encode/Decode traits
//!
//! Every supported shape implements `Encode` (writing is infallible, see
//! [`Sink`]) and `Decode` (reading returns a `Result`). Sequence containers
//! do not loop over elements themselves: they call the element type's slice
//! hooks, so `u8` can copy a whole run at once and `bool` can bit-pack.

use crate::error::{Error, Result};

use super::cursor::{Sink, Source};
use super::varint::{read_len, write_len};

/// Cap on a decoded run of zero-sized items, which consume no input
pub const MAX_ZERO_SIZED_ITEMS: usize = 1 << 16;

/// Reject a length prefix that would loop without reading for zero-sized `T`
pub(crate) fn check_item_count<T>(n: usize) -> Result<()> {
    if std::mem::size_of::<T>() == 0 && n > MAX_ZERO_SIZED_ITEMS {
        return Err(Error::SequenceTooLong {
            len: n,
            max: MAX_ZERO_SIZED_ITEMS,
        });
    }
    Ok(())
}

/// Types that can be written to a [`Sink`]
pub trait Encode {
    /// Write `self` to the sink
    fn encode_into<S: Sink>(&self, sink: &mut S);

    /// Write a run of elements with no length prefix
    fn encode_items<S: Sink>(items: &[Self], sink: &mut S)
    where
        Self: Sized,
    {
        for item in items {
            item.encode_into(sink);
        }
    }

    /// Write a length-prefixed sequence
    fn encode_seq<S: Sink>(items: &[Self], sink: &mut S)
    where
        Self: Sized,
    {
        write_len(sink, items.len());
        Self::encode_items(items, sink);
    }
}

/// Types that can be read back from a [`Source`]
pub trait Decode: Sized {
    /// Read one value
    fn decode_from<S: Source>(src: &mut S) -> Result<Self>;

    /// Read exactly `n` elements with no length prefix
    fn decode_items<S: Source>(n: usize, src: &mut S) -> Result<Vec<Self>> {
        check_item_count::<Self>(n)?;
        // A hostile prefix must not drive the allocation
        let mut items = Vec::with_capacity(n.min(src.remaining()));
        for _ in 0..n {
            items.push(Self::decode_from(src)?);
        }
        Ok(items)
    }

    /// Read a length-prefixed sequence
    fn decode_seq<S: Source>(src: &mut S) -> Result<Vec<Self>> {
        let n = read_len(src)?;
        Self::decode_items(n, src)
    }
}

/// Shorthand bound for types that go both ways
pub trait Codec: Encode + Decode {}

impl<T: Encode + Decode> Codec for T {}
