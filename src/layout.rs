//! Block chain layout
//!
//! Defines the on-memory schema of a hash entry: an 8-byte link header in
//! every block, plus the wider head-block header that carries hash, LRU
//! links, lengths and the entry lock. All offsets are fixed; only the block
//! size (and therefore the payload capacities) is configured at startup.
//!
//! ```text
//! head block                              continuation block
//! ┌──────────────┬─────────────────┐       ┌────────┬─────────────────┐
//! │ header (64B) │ payload          │  ...  │ 8B link│ payload          │
//! └──────────────┴─────────────────┘       └────────┴─────────────────┘
//! ```

/// Offset of the `next_block` link, present in every block.
pub const NEXT_BLOCK_OFFSET: u64 = 0;
/// Offset of the 64-bit key hash, head block only.
pub const HASH_OFFSET: u64 = 8;
/// Offset of the `lru_prev` link, head block only.
pub const LRU_PREV_OFFSET: u64 = 16;
/// Offset of the `lru_next` link, head block only.
pub const LRU_NEXT_OFFSET: u64 = 24;
/// Offset of the serialized key length, head block only.
pub const KEY_LENGTH_OFFSET: u64 = 32;
/// Offset of the serialized value length, head block only.
pub const VALUE_LENGTH_OFFSET: u64 = 40;
/// Offset of the entry lock word, head block only.
pub const ENTRY_LOCK_OFFSET: u64 = 48;
/// Reserved alignment padding, head block only.
pub const RESERVED_OFFSET: u64 = 56;

/// Size of the head-block header (bytes 0..64).
pub const HEAD_HEADER_SIZE: usize = 64;
/// Size of a continuation block's link header (bytes 0..8).
pub const LINK_HEADER_SIZE: usize = 8;

/// Rounds `n` up to the next multiple of 8.
#[inline]
pub const fn roundup8(n: u64) -> u64 {
    (n + 7) & !7
}

/// Derived per-block payload capacities for a fixed `block_size`.
///
/// Computed once at startup and shared by the writer, reader and lookup
/// code. `block_size` must be a power of two and large enough to hold the
/// head header plus at least one byte of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    block_size: usize,
    first_block_payload: usize,
    next_block_payload: usize,
}

impl Layout {
    /// Minimum usable block size: the head header plus some payload.
    pub const MIN_BLOCK_SIZE: usize = 128;

    /// Builds a `Layout` for the given block size.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is not a power of two or is smaller than
    /// [`Layout::MIN_BLOCK_SIZE`]. Both are startup-time invariants, not
    /// recoverable runtime conditions.
    pub fn new(block_size: usize) -> Self {
        assert!(
            block_size.is_power_of_two(),
            "block_size must be a power of two, got {block_size}"
        );
        assert!(
            block_size >= Self::MIN_BLOCK_SIZE,
            "block_size must be >= {}, got {block_size}",
            Self::MIN_BLOCK_SIZE
        );
        Layout {
            block_size,
            first_block_payload: block_size - HEAD_HEADER_SIZE,
            next_block_payload: block_size - LINK_HEADER_SIZE,
        }
    }

    /// Size in bytes of every block in the arena.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Usable payload bytes in the head block (`block_size - 64`).
    #[inline]
    pub fn first_block_payload(&self) -> usize {
        self.first_block_payload
    }

    /// Usable payload bytes in a continuation block (`block_size - 8`).
    #[inline]
    pub fn next_block_payload(&self) -> usize {
        self.next_block_payload
    }

    /// Number of blocks required to hold `key_len` + `value_len` bytes of
    /// content, per §4.2's framing formula.
    ///
    /// # Panics
    ///
    /// Panics if the computation yields zero blocks, which would indicate
    /// an internal invariant violation (it cannot happen for valid inputs
    /// since `first_block_payload >= 1`).
    pub fn blocks_for(&self, key_len: u64, value_len: u64) -> usize {
        let total = roundup8(key_len) + value_len;
        let blocks = if total <= self.first_block_payload as u64 {
            1
        } else {
            let rem = total - self.first_block_payload as u64;
            let continuations = rem.div_ceil(self.next_block_payload as u64);
            1 + continuations as usize
        };
        assert!(blocks > 0, "blocks_for computed zero blocks");
        blocks
    }
}
