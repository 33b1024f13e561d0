//! Key comparison and hash + key lookup within a partition's LRU list.

use crate::bytes::BytesSource;
use crate::chain::{self, Cursor};
use crate::layout::{self, Layout};
use crate::memory::{load_u64_ne, RawMemory};
use crate::partition::PartitionGuard;

/// Compares `key` against the key bytes stored at `head`, assuming the
/// caller already matched `key_length`.
///
/// Takes the word-aligned fast path (an 8-byte chain-side load compared
/// against an 8-byte host-array load) whenever both sides have at least 8
/// bytes left and the chain-side offset is 8-aligned; falls back to a
/// byte-wise comparison otherwise, including the last <8 bytes of any key.
pub fn compare_key<M: RawMemory>(
    mem: &M,
    layout: &Layout,
    head: u64,
    key_len: u64,
    key: &dyn BytesSource,
) -> bool {
    let mut cursor = Cursor::at_head_payload(head, layout);
    let mut pos: u64 = 0;
    let host_array = key.has_array().then(|| (key.array(), key.array_offset()));

    while pos < key_len {
        if cursor.remaining_in_block == 0 {
            cursor = advance_cursor_one_block(mem, layout, cursor);
        }
        let chain_addr = cursor.block_addr + cursor.offset as u64;
        let word_aligned = cursor.offset % 8 == 0 && cursor.remaining_in_block >= 8;
        let key_has_word = key_len - pos >= 8;

        if word_aligned && key_has_word {
            if let Some((arr, off)) = host_array {
                let host_word = load_u64_ne(arr, off + pos as usize);
                let chain_word = mem.get_long(chain_addr) as u64;
                if host_word != chain_word {
                    return false;
                }
                cursor.offset += 8;
                cursor.remaining_in_block -= 8;
                pos += 8;
                continue;
            }
        }

        let chain_byte = mem.get_byte(chain_addr);
        if chain_byte != key.get_byte(pos) {
            return false;
        }
        cursor.offset += 1;
        cursor.remaining_in_block -= 1;
        pos += 1;
    }
    true
}

fn advance_cursor_one_block<M: RawMemory>(mem: &M, layout: &Layout, cursor: Cursor) -> Cursor {
    let next = chain::next_block(mem, cursor.block_addr);
    Cursor {
        block_addr: next,
        offset: layout::LINK_HEADER_SIZE,
        remaining_in_block: layout.next_block_payload(),
    }
}

/// Searches a partition's LRU list for an entry matching `hash` and `key`.
///
/// Returns the matching entry's head address, or 0 if none is found.
/// Detects an LRU cycle (the walk returning to its own starting point) and
/// treats it as a corrupted-heap invariant violation rather than looping
/// forever. When the walk traverses `warn_threshold` or more links, logs a
/// rate-limited warning via the `log` facade.
pub fn find_entry<M: RawMemory>(
    mem: &M,
    layout: &Layout,
    guard: &PartitionGuard<'_>,
    hash: u64,
    key: &dyn BytesSource,
    warn_threshold: u64,
) -> u64 {
    let start = guard.get_lru_head();
    if start == 0 {
        return 0;
    }
    let key_len = key.size();
    let mut cur = start;
    let mut steps: u64 = 0;
    loop {
        steps += 1;
        if chain::hash(mem, cur) == hash
            && chain::key_length(mem, cur) == key_len
            && compare_key(mem, layout, cur, key_len, key)
        {
            maybe_warn(guard.index(), steps, warn_threshold);
            return cur;
        }
        let next = chain::lru_next(mem, cur);
        if next == 0 {
            break;
        }
        assert!(
            next != start,
            "LRU cycle detected in partition {}",
            guard.index()
        );
        cur = next;
    }
    maybe_warn(guard.index(), steps, warn_threshold);
    0
}

#[cfg(feature = "std")]
mod rate_limit {
    use parking_lot::Mutex;
    use std::time::{Duration, Instant};

    static LAST_WARNING: Mutex<Option<Instant>> = Mutex::new(None);
    const SUPPRESS_FOR: Duration = Duration::from_secs(10);

    pub fn should_emit() -> bool {
        let mut slot = LAST_WARNING.lock();
        let now = Instant::now();
        match *slot {
            Some(last) if now.duration_since(last) < SUPPRESS_FOR => false,
            _ => {
                *slot = Some(now);
                true
            }
        }
    }
}

fn maybe_warn(partition_index: usize, steps: u64, warn_threshold: u64) {
    if steps < warn_threshold {
        return;
    }
    #[cfg(feature = "std")]
    {
        if rate_limit::should_emit() {
            log::warn!(
                "partition {partition_index}: find_entry traversed {steps} LRU links (threshold {warn_threshold})"
            );
        }
    }
    #[cfg(not(feature = "std"))]
    {
        log::warn!(
            "partition {partition_index}: find_entry traversed {steps} LRU links (threshold {warn_threshold})"
        );
    }
}
