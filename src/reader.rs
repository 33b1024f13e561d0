//! Chain reader: streaming access to an entry's key and value bytes.

use crate::bytes::BytesSink;
use crate::chain::{self, Cursor};
use crate::error::CoreError;
use crate::layout::{self, Layout};
use crate::memory::RawMemory;

/// Largest value length a single streaming write can bound, mirroring
/// §4.3's overflow condition on `write_value`.
pub const MAX_STREAMABLE_VALUE: u64 = i32::MAX as u64;

/// Reads the full key into `dst`, which must be exactly `key_length` bytes
/// long.
///
/// # Panics
///
/// Panics if `dst.len()` does not match the entry's stored key length.
pub fn read_key<M: RawMemory>(mem: &M, layout: &Layout, head: u64, dst: &mut [u8]) {
    let key_len = chain::key_length(mem, head);
    assert_eq!(
        dst.len() as u64,
        key_len,
        "read_key buffer does not match stored key_length"
    );
    let mut cursor = Cursor::at_head_payload(head, layout);
    cursor.read(mem, layout, dst);
}

/// Builds a cursor positioned at the start of the value region: past the
/// key bytes and the zero-padding up to the next 8-byte boundary, per
/// §4.3's value cursor positioning algorithm.
fn value_cursor<M: RawMemory>(mem: &M, layout: &Layout, head: u64) -> Cursor {
    let key_len = chain::key_length(mem, head);
    let mut cursor = Cursor::at_head_payload(head, layout);
    let skip = layout::roundup8(key_len) as usize;
    cursor.advance(mem, layout, skip);
    cursor
}

/// A streaming reader over an entry's value bytes.
pub struct ValueReader<'m, M: RawMemory> {
    mem: &'m M,
    layout: Layout,
    cursor: Cursor,
    remaining: u64,
}

impl<'m, M: RawMemory> ValueReader<'m, M> {
    /// Opens a value reader positioned at the start of `head`'s value
    /// region.
    pub fn open(mem: &'m M, layout: &Layout, head: u64) -> Self {
        let cursor = value_cursor(mem, layout, head);
        ValueReader {
            mem,
            layout: *layout,
            cursor,
            remaining: chain::value_length(mem, head),
        }
    }

    /// Bytes not yet read from the value.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Reads up to `dst.len()` bytes, returning the number actually read
    /// (less than `dst.len()` only once the value is exhausted).
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let n = (dst.len() as u64).min(self.remaining) as usize;
        self.cursor.read(self.mem, &self.layout, &mut dst[..n]);
        self.remaining -= n as u64;
        n
    }

    /// Reads the next byte, or `None` once the value is exhausted.
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let b = self.cursor.read_byte(self.mem, &self.layout);
        self.remaining -= 1;
        Some(b)
    }
}

/// Copies an entry's entire value into `sink` in one call.
///
/// Sizes `sink` to the stored value length first. Returns
/// `Err(CoreError::ValueTooLarge)` if that length exceeds
/// [`MAX_STREAMABLE_VALUE`] without touching `sink`.
pub fn write_value_to_sink<M: RawMemory>(
    mem: &M,
    layout: &Layout,
    head: u64,
    sink: &mut dyn BytesSink,
) -> Result<(), CoreError> {
    let value_len = chain::value_length(mem, head);
    if value_len > MAX_STREAMABLE_VALUE {
        return Err(CoreError::ValueTooLarge);
    }
    sink.set_size(value_len as usize);
    let mut cursor = value_cursor(mem, layout, head);
    if sink.has_array() {
        let arr = sink.array_mut();
        cursor.read(mem, layout, &mut arr[..value_len as usize]);
    } else {
        for i in 0..value_len as usize {
            let b = cursor.read_byte(mem, layout);
            sink.put_byte(i, b);
        }
    }
    Ok(())
}

/// A streaming writer into an entry's pre-reserved value region, for use
/// after [`crate::writer::create_entry`] was called with
/// `ValueInit::Reserved`.
pub struct ValueWriter<'m, M: RawMemory> {
    mem: &'m M,
    layout: Layout,
    cursor: Cursor,
    remaining: u64,
}

impl<'m, M: RawMemory> ValueWriter<'m, M> {
    /// Opens a value writer positioned at the start of `head`'s reserved
    /// value region.
    pub fn open(mem: &'m M, layout: &Layout, head: u64) -> Self {
        let cursor = value_cursor(mem, layout, head);
        ValueWriter {
            mem,
            layout: *layout,
            cursor,
            remaining: chain::value_length(mem, head),
        }
    }

    /// Bytes not yet written.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Writes `src`, consuming it from the remaining value budget.
    ///
    /// # Errors
    ///
    /// Returns `Err(CoreError::LengthMismatch)` if `src` is longer than
    /// what remains of the reserved value region.
    pub fn write(&mut self, src: &[u8]) -> Result<(), CoreError> {
        if src.len() as u64 > self.remaining {
            return Err(CoreError::LengthMismatch);
        }
        self.cursor.write(self.mem, &self.layout, src);
        self.remaining -= src.len() as u64;
        Ok(())
    }
}
