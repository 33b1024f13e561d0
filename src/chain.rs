//! Head-block header field accessors and chain-walking cursor primitives.
//!
//! Shared by the writer, reader and lookup modules so the offset
//! arithmetic from [`crate::layout`] lives in exactly one place.

use crate::layout::{
    self, ENTRY_LOCK_OFFSET, HASH_OFFSET, KEY_LENGTH_OFFSET, LRU_NEXT_OFFSET, LRU_PREV_OFFSET,
    NEXT_BLOCK_OFFSET, VALUE_LENGTH_OFFSET,
};
use crate::memory::RawMemory;

/// Address of the next block in the chain, or 0 if `addr` is the last
/// block. Valid on every block, head or continuation.
pub fn next_block<M: RawMemory>(mem: &M, addr: u64) -> u64 {
    mem.get_long_acquire(addr + NEXT_BLOCK_OFFSET) as u64
}

/// Sets the next-block link at `addr`.
pub fn set_next_block<M: RawMemory>(mem: &M, addr: u64, next: u64) {
    mem.put_long_release(addr + NEXT_BLOCK_OFFSET, next as i64);
}

/// Reads the stored key hash from an entry head at `head`.
pub fn hash<M: RawMemory>(mem: &M, head: u64) -> u64 {
    mem.get_long_acquire(head + HASH_OFFSET) as u64
}

/// Sets the key hash on an entry head.
pub fn set_hash<M: RawMemory>(mem: &M, head: u64, hash: u64) {
    mem.put_long_release(head + HASH_OFFSET, hash as i64);
}

/// Reads the `lru_prev` link (0 marks the partition's LRU head entry).
pub fn lru_prev<M: RawMemory>(mem: &M, head: u64) -> u64 {
    mem.get_long_acquire(head + LRU_PREV_OFFSET) as u64
}

/// Sets the `lru_prev` link.
pub fn set_lru_prev<M: RawMemory>(mem: &M, head: u64, prev: u64) {
    mem.put_long_release(head + LRU_PREV_OFFSET, prev as i64);
}

/// Reads the `lru_next` link (0 marks the partition's LRU tail entry).
pub fn lru_next<M: RawMemory>(mem: &M, head: u64) -> u64 {
    mem.get_long_acquire(head + LRU_NEXT_OFFSET) as u64
}

/// Sets the `lru_next` link.
pub fn set_lru_next<M: RawMemory>(mem: &M, head: u64, next: u64) {
    mem.put_long_release(head + LRU_NEXT_OFFSET, next as i64);
}

/// Reads the serialized key length.
pub fn key_length<M: RawMemory>(mem: &M, head: u64) -> u64 {
    mem.get_long_acquire(head + KEY_LENGTH_OFFSET) as u64
}

/// Sets the serialized key length.
pub fn set_key_length<M: RawMemory>(mem: &M, head: u64, len: u64) {
    mem.put_long_release(head + KEY_LENGTH_OFFSET, len as i64);
}

/// Reads the serialized value length.
pub fn value_length<M: RawMemory>(mem: &M, head: u64) -> u64 {
    mem.get_long_acquire(head + VALUE_LENGTH_OFFSET) as u64
}

/// Sets the serialized value length.
pub fn set_value_length<M: RawMemory>(mem: &M, head: u64, len: u64) {
    mem.put_long_release(head + VALUE_LENGTH_OFFSET, len as i64);
}

/// Address of the entry lock word, for use with [`RawMemory::lock`]/
/// [`RawMemory::unlock`].
pub fn entry_lock_addr(head: u64) -> u64 {
    head + ENTRY_LOCK_OFFSET
}

/// A cursor over a chain's payload, tracking the current block, the byte
/// offset within it, and how many payload bytes remain before the cursor
/// must cross into the next block.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub block_addr: u64,
    pub offset: usize,
    pub remaining_in_block: usize,
}

impl Cursor {
    /// A cursor positioned at the start of the head block's payload
    /// (offset 64), used to begin reading/writing/comparing the key.
    pub fn at_head_payload(head: u64, layout: &layout::Layout) -> Self {
        Cursor {
            block_addr: head,
            offset: layout::HEAD_HEADER_SIZE,
            remaining_in_block: layout.first_block_payload(),
        }
    }

    /// Crosses into the next block if the cursor has exhausted the current
    /// block's payload.
    fn cross_if_needed<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout) {
        if self.remaining_in_block == 0 {
            self.block_addr = next_block(mem, self.block_addr);
            self.offset = layout::LINK_HEADER_SIZE;
            self.remaining_in_block = layout.next_block_payload();
        }
    }

    /// Advances the cursor by `n` bytes without reading or writing
    /// anything, crossing block boundaries as needed. Used to skip the
    /// key-to-value padding region.
    pub fn advance<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout, mut n: usize) {
        while n > 0 {
            self.cross_if_needed(mem, layout);
            let step = n.min(self.remaining_in_block);
            self.offset += step;
            self.remaining_in_block -= step;
            n -= step;
        }
    }

    /// Writes `src` at the cursor position, advancing it, copying in the
    /// largest contiguous runs the block boundaries allow.
    pub fn write<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout, src: &[u8]) {
        let mut pos = 0usize;
        while pos < src.len() {
            self.cross_if_needed(mem, layout);
            let run = (src.len() - pos).min(self.remaining_in_block);
            mem.copy_from_slice(
                &src[pos..pos + run],
                self.block_addr + self.offset as u64,
            );
            self.offset += run;
            self.remaining_in_block -= run;
            pos += run;
        }
    }

    /// Writes a single byte at the cursor position, advancing it.
    pub fn write_byte<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout, byte: u8) {
        self.cross_if_needed(mem, layout);
        mem.put_byte(self.block_addr + self.offset as u64, byte);
        self.offset += 1;
        self.remaining_in_block -= 1;
    }

    /// Reads into `dst` from the cursor position, advancing it, copying in
    /// the largest contiguous runs the block boundaries allow.
    pub fn read<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout, dst: &mut [u8]) {
        let mut pos = 0usize;
        while pos < dst.len() {
            self.cross_if_needed(mem, layout);
            let run = (dst.len() - pos).min(self.remaining_in_block);
            mem.copy_to_slice(
                self.block_addr + self.offset as u64,
                &mut dst[pos..pos + run],
            );
            self.offset += run;
            self.remaining_in_block -= run;
            pos += run;
        }
    }

    /// Reads a single byte from the cursor position, advancing it.
    pub fn read_byte<M: RawMemory>(&mut self, mem: &M, layout: &layout::Layout) -> u8 {
        self.cross_if_needed(mem, layout);
        let b = mem.get_byte(self.block_addr + self.offset as u64);
        self.offset += 1;
        self.remaining_in_block -= 1;
        b
    }
}
