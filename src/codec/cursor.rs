//! Byte cursors
//!
//! `ByteCursor` is a bounded, position-tracking view over a byte buffer.
//! `SizeCounter` exposes the same write surface but only accumulates a total,
//! which is how buffers get pre-sized before a real encode.
//!
//! ```text
//! start                position              end
//!   │                     │                    │
//!   ▼                     ▼                    ▼
//!   ┌─────────────────────┬────────────────────┐
//!   │   consumed/written  │     remaining      │
//!   └─────────────────────┴────────────────────┘
//! ```

use crate::error::{Error, Result};

// =============================================================================
// Traits
// =============================================================================

/// Destination for encoded bytes
///
/// Writes are infallible from the encoder's point of view: a real cursor is
/// always pre-sized with `encoded_size`, so an overrun is a sizing bug and
/// aborts.
pub trait Sink {
    /// Append raw bytes
    fn write(&mut self, data: &[u8]);

    /// Append a single byte
    fn put(&mut self, byte: u8) {
        self.write(&[byte]);
    }

    /// Bytes written so far
    fn tell(&self) -> usize;
}

/// Origin of encoded bytes
pub trait Source {
    /// Fill `out` completely from the stream
    fn read(&mut self, out: &mut [u8]) -> Result<()>;

    /// Borrow the next `n` bytes and advance past them
    fn take(&mut self, n: usize) -> Result<&[u8]>;

    /// Read a single byte
    fn get(&mut self) -> Result<u8>;

    /// Bytes left before the end of the stream
    fn remaining(&self) -> usize;
}

// =============================================================================
// ByteCursor
// =============================================================================

/// Bounded cursor over a caller-owned buffer
///
/// Invariant: `0 <= position <= buf.len()`. Every operation that would move
/// the position outside that range fails without moving it.
#[derive(Debug)]
pub struct ByteCursor<B> {
    buf: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> ByteCursor<B> {
    /// Create a cursor positioned at the start of `buf`
    pub fn new(buf: B) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Bytes between the current position and the end
    pub fn remaining(&self) -> usize {
        self.end() - self.pos
    }

    /// Whether the position lies within `[start, end]`
    pub fn is_valid(&self) -> bool {
        self.pos <= self.end()
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.end() {
            return Err(Error::SeekOutOfRange {
                position,
                len: self.end(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Advance without reading or writing
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    /// Give the buffer back
    pub fn into_inner(self) -> B {
        self.buf
    }

    fn end(&self) -> usize {
        self.buf.as_ref().len()
    }

    fn check(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::OutOfBounds {
                requested: n,
                remaining,
            });
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteCursor<B> {
    /// Write `data` at the current position, failing if it does not fit
    pub fn try_write(&mut self, data: &[u8]) -> Result<()> {
        self.check(data.len())?;
        let start = self.pos;
        self.buf.as_mut()[start..start + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }

    /// Write one byte at the current position, failing at the end
    pub fn try_put(&mut self, byte: u8) -> Result<()> {
        self.try_write(&[byte])
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Sink for ByteCursor<B> {
    fn write(&mut self, data: &[u8]) {
        if let Err(e) = self.try_write(data) {
            panic!("fatal bounds violation while encoding: {}", e);
        }
    }

    fn tell(&self) -> usize {
        self.pos
    }
}

impl<B: AsRef<[u8]>> Source for ByteCursor<B> {
    fn read(&mut self, out: &mut [u8]) -> Result<()> {
        let bytes = self.take(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.check(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf.as_ref()[start..start + n])
    }

    fn get(&mut self) -> Result<u8> {
        self.check(1)?;
        let byte = self.buf.as_ref()[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    fn remaining(&self) -> usize {
        ByteCursor::remaining(self)
    }
}

// =============================================================================
// SizeCounter
// =============================================================================

/// Size-only cursor: counts bytes, never touches memory
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeCounter {
    size: usize,
}

impl SizeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from a non-zero offset
    pub fn with_initial(size: usize) -> Self {
        Self { size }
    }

    /// Count `n` bytes without writing them
    pub fn skip(&mut self, n: usize) {
        self.size += n;
    }

    /// Reset the running total
    pub fn seek(&mut self, position: usize) {
        self.size = position;
    }

    /// Always zero: a counter has no backing buffer
    pub fn remaining(&self) -> usize {
        0
    }

    /// Always true
    pub fn is_valid(&self) -> bool {
        true
    }
}

impl Sink for SizeCounter {
    fn write(&mut self, data: &[u8]) {
        self.size += data.len();
    }

    fn put(&mut self, _byte: u8) {
        self.size += 1;
    }

    fn tell(&self) -> usize {
        self.size
    }
}
