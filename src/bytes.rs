//! Byte source/sink contracts.
//!
//! `BytesSource` is what the writer reads keys and values from; `BytesSink`
//! is what the reader writes values into. Both expose an optional
//! contiguous-array fast path so callers backed by a plain slice avoid a
//! byte-at-a-time copy, matching the host-array fast path §4.3/§4.4 call for
//! in the streaming and comparison code.

/// A readable source of bytes of known length.
///
/// Implementors that are backed by a single contiguous slice should
/// override `has_array`/`array`/`array_offset` so callers can take the
/// bulk-copy fast path instead of calling `get_byte` in a loop.
pub trait BytesSource {
    /// Total number of bytes available from this source.
    fn size(&self) -> u64;

    /// Reads a single byte at `index`.
    ///
    /// # Panics
    ///
    /// May panic if `index >= self.size()`.
    fn get_byte(&self, index: u64) -> u8;

    /// Whether this source is backed by one contiguous in-memory array.
    fn has_array(&self) -> bool {
        false
    }

    /// The backing array, when `has_array()` is true.
    ///
    /// # Panics
    ///
    /// Panics if `has_array()` is false.
    fn array(&self) -> &[u8] {
        panic!("BytesSource::array called on a source with no backing array")
    }

    /// Offset of this source's first byte within `array()`.
    fn array_offset(&self) -> usize {
        0
    }
}

impl BytesSource for [u8] {
    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn get_byte(&self, index: u64) -> u8 {
        self[index as usize]
    }

    fn has_array(&self) -> bool {
        true
    }

    fn array(&self) -> &[u8] {
        self
    }
}

impl BytesSource for &[u8] {
    fn size(&self) -> u64 {
        (*self).len() as u64
    }

    fn get_byte(&self, index: u64) -> u8 {
        (*self)[index as usize]
    }

    fn has_array(&self) -> bool {
        true
    }

    fn array(&self) -> &[u8] {
        self
    }
}

/// A writable sink of bytes that can be sized up front.
///
/// Implementors backed by a contiguous array should override `has_array`
/// so bulk writers can copy directly instead of calling `put_byte` per
/// byte.
pub trait BytesSink {
    /// Reserves room for exactly `size` bytes; called once before any
    /// `put_byte` call.
    fn set_size(&mut self, size: usize);

    /// Writes a single byte at `index`.
    ///
    /// # Panics
    ///
    /// May panic if `index >= size` as given to the preceding `set_size`.
    fn put_byte(&mut self, index: usize, value: u8);

    /// Whether this sink is backed by one contiguous in-memory array that
    /// bulk writers can copy into directly.
    fn has_array(&self) -> bool {
        false
    }

    /// Mutable access to the backing array, when `has_array()` is true.
    ///
    /// # Panics
    ///
    /// Panics if `has_array()` is false.
    fn array_mut(&mut self) -> &mut [u8] {
        panic!("BytesSink::array_mut called on a sink with no backing array")
    }
}

impl BytesSink for alloc::vec::Vec<u8> {
    fn set_size(&mut self, size: usize) {
        self.clear();
        self.resize(size, 0);
    }

    fn put_byte(&mut self, index: usize, value: u8) {
        self[index] = value;
    }

    fn has_array(&self) -> bool {
        true
    }

    fn array_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}
