//! Per-partition LRU list maintenance.
//!
//! The list is intrusive: `lru_prev`/`lru_next` live in each entry's own
//! head-block header rather than in a separate collection, and the
//! partition only remembers the head address. All operations here assume
//! the caller already holds the partition's lock (via
//! [`crate::partition::PartitionGuard`]).

use crate::chain;
use crate::memory::RawMemory;
use crate::partition::PartitionGuard;

/// Links `head` in as the new front of the partition's LRU list.
///
/// `head` must not already be part of any LRU list.
pub fn add_as_head<M: RawMemory>(mem: &M, guard: &mut PartitionGuard<'_>, head: u64) {
    let old_head = guard.get_lru_head();
    chain::set_lru_prev(mem, head, 0);
    chain::set_lru_next(mem, head, old_head);
    if old_head != 0 {
        chain::set_lru_prev(mem, old_head, head);
    }
    guard.set_lru_head(head);
}

/// Removes `head` from the partition's LRU list, relinking its neighbors.
///
/// `head` must currently be part of the list the guard covers.
pub fn unlink<M: RawMemory>(mem: &M, guard: &mut PartitionGuard<'_>, head: u64) {
    let prev = chain::lru_prev(mem, head);
    let next = chain::lru_next(mem, head);

    if prev != 0 {
        chain::set_lru_next(mem, prev, next);
    } else {
        guard.set_lru_head(next);
    }
    if next != 0 {
        chain::set_lru_prev(mem, next, prev);
    }
}

/// Moves `head` to the front of the partition's LRU list.
///
/// A no-op if `head` is already the head. Equivalent to `unlink` followed
/// by `add_as_head`, implemented directly to avoid redundant header
/// writes when `head` has no predecessor.
pub fn promote_to_head<M: RawMemory>(mem: &M, guard: &mut PartitionGuard<'_>, head: u64) {
    if guard.get_lru_head() == head {
        return;
    }
    unlink(mem, guard, head);
    add_as_head(mem, guard, head);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::memory::HeapArena;
    use crate::partition::PartitionTable;

    fn make_heads(arena: &HeapArena, layout: &Layout, n: usize) -> alloc::vec::Vec<u64> {
        (0..n)
            .map(|i| {
                let addr = arena.base_addr() + i as u64 * layout.block_size() as u64;
                chain::set_lru_prev(arena, addr, 0);
                chain::set_lru_next(arena, addr, 0);
                addr
            })
            .collect()
    }

    #[test]
    fn add_as_head_builds_list_front_to_back() {
        let layout = Layout::new(128);
        let arena = HeapArena::new(128 * 3);
        let heads = make_heads(&arena, &layout, 3);
        let table = PartitionTable::new(1);
        let mut guard = table.lock_for_hash(0);

        add_as_head(&arena, &mut guard, heads[0]);
        add_as_head(&arena, &mut guard, heads[1]);
        add_as_head(&arena, &mut guard, heads[2]);

        assert_eq!(guard.get_lru_head(), heads[2]);
        assert_eq!(chain::lru_next(&arena, heads[2]), heads[1]);
        assert_eq!(chain::lru_next(&arena, heads[1]), heads[0]);
        assert_eq!(chain::lru_next(&arena, heads[0]), 0);
        assert_eq!(chain::lru_prev(&arena, heads[0]), heads[1]);
    }

    #[test]
    fn unlink_middle_entry_relinks_neighbors() {
        let layout = Layout::new(128);
        let arena = HeapArena::new(128 * 3);
        let heads = make_heads(&arena, &layout, 3);
        let table = PartitionTable::new(1);
        let mut guard = table.lock_for_hash(0);
        for &h in &heads {
            add_as_head(&arena, &mut guard, h);
        }
        // list is heads[2] -> heads[1] -> heads[0]
        unlink(&arena, &mut guard, heads[1]);
        assert_eq!(guard.get_lru_head(), heads[2]);
        assert_eq!(chain::lru_next(&arena, heads[2]), heads[0]);
        assert_eq!(chain::lru_prev(&arena, heads[0]), heads[2]);
    }

    #[test]
    fn unlink_head_updates_partition_head() {
        let layout = Layout::new(128);
        let arena = HeapArena::new(128 * 2);
        let heads = make_heads(&arena, &layout, 2);
        let table = PartitionTable::new(1);
        let mut guard = table.lock_for_hash(0);
        add_as_head(&arena, &mut guard, heads[0]);
        add_as_head(&arena, &mut guard, heads[1]);

        unlink(&arena, &mut guard, heads[1]);
        assert_eq!(guard.get_lru_head(), heads[0]);
        assert_eq!(chain::lru_prev(&arena, heads[0]), 0);
    }

    #[test]
    fn promote_to_head_moves_tail_entry_to_front() {
        let layout = Layout::new(128);
        let arena = HeapArena::new(128 * 3);
        let heads = make_heads(&arena, &layout, 3);
        let table = PartitionTable::new(1);
        let mut guard = table.lock_for_hash(0);
        for &h in &heads {
            add_as_head(&arena, &mut guard, h);
        }
        // list is heads[2] -> heads[1] -> heads[0]
        promote_to_head(&arena, &mut guard, heads[0]);
        assert_eq!(guard.get_lru_head(), heads[0]);
        assert_eq!(chain::lru_next(&arena, heads[0]), heads[2]);
        assert_eq!(chain::lru_next(&arena, heads[2]), heads[1]);
        assert_eq!(chain::lru_next(&arena, heads[1]), 0);
    }

    #[test]
    fn promote_to_head_on_current_head_is_a_no_op() {
        let layout = Layout::new(128);
        let arena = HeapArena::new(128 * 2);
        let heads = make_heads(&arena, &layout, 2);
        let table = PartitionTable::new(1);
        let mut guard = table.lock_for_hash(0);
        add_as_head(&arena, &mut guard, heads[0]);
        add_as_head(&arena, &mut guard, heads[1]);

        promote_to_head(&arena, &mut guard, heads[1]);
        assert_eq!(guard.get_lru_head(), heads[1]);
        assert_eq!(chain::lru_next(&arena, heads[1]), heads[0]);
    }
}
