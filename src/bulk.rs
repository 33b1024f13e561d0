//! Bulk and iteration operations: clearing a partition table, reporting
//! LRU list lengths, and visiting the hottest entries of a partition.

use crate::allocator::BlockAllocator;
use crate::chain;
use crate::lock;
use crate::memory::RawMemory;
use crate::partition::{PartitionGuard, PartitionTable};

/// Clears every partition and frees all of their chains.
///
/// Each partition's head is snapshotted and reset to empty while the
/// partition lock is held, then the chains are walked and freed without
/// holding any lock, so a long eviction sweep does not block lookups
/// against partitions it has already moved past. Per §4.7, each entry is
/// locked before it is freed (but never unlocked — the memory is returned
/// to the allocator regardless): this closes out a concurrent holder of
/// only the entry lock (e.g. a `ValueReader`/`ValueWriter`, which per §4.6
/// does not need the partition lock) before the chain's blocks become
/// available for reuse.
pub fn remove_all<M, A>(mem: &M, table: &PartitionTable, allocator: &A)
where
    M: RawMemory,
    A: BlockAllocator,
{
    for index in 0..table.partition_count() {
        let head = {
            let mut guard = table.lock_index(index);
            let head = guard.get_lru_head();
            guard.set_lru_head(0);
            head
        };
        let mut cur = head;
        while cur != 0 {
            let next = chain::lru_next(mem, cur);
            lock::lock_entry(mem, cur);
            allocator.free_chain(cur);
            cur = next;
        }
    }
}

/// Reports the current LRU list length of every partition, in partition
/// index order.
///
/// Each partition is locked only for the duration of its own walk.
pub fn lru_lengths<M: RawMemory>(mem: &M, table: &PartitionTable) -> alloc::vec::Vec<u64> {
    (0..table.partition_count())
        .map(|index| {
            let guard = table.lock_index(index);
            let mut cur = guard.get_lru_head();
            let mut len = 0u64;
            while cur != 0 {
                len += 1;
                cur = chain::lru_next(mem, cur);
            }
            len
        })
        .collect()
}

/// Visits up to `n` of the hottest (most recently used) entries in the
/// partition `guard` holds, front to back, calling `callback` with each
/// entry's head address.
pub fn hot_n<M: RawMemory>(
    mem: &M,
    guard: &PartitionGuard<'_>,
    n: usize,
    mut callback: impl FnMut(u64),
) {
    let mut cur = guard.get_lru_head();
    let mut visited = 0usize;
    while cur != 0 && visited < n {
        callback(cur);
        cur = chain::lru_next(mem, cur);
        visited += 1;
    }
}
