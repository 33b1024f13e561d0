//! Block allocator contract and a free-list reference implementation.

use parking_lot::Mutex;

use crate::layout::Layout;
use crate::memory::RawMemory;

/// Supplies and reclaims chains of blocks.
///
/// `allocate_chain` must return blocks already pre-linked by their
/// `next_block` headers, per §4.2's requirement that the writer only needs
/// to fill in the head header and payload, not thread the chain together
/// itself.
pub trait BlockAllocator {
    /// Allocates `count` blocks linked into one chain, returning the head
    /// block's address, or `None` if fewer than `count` blocks are free.
    fn allocate_chain(&self, count: usize) -> Option<u64>;

    /// Returns every block in the chain starting at `head` to the free
    /// pool.
    fn free_chain(&self, head: u64);
}

/// A reference allocator that threads unused blocks into a singly-linked
/// free list using the same `next_block` header word the chain layout
/// already defines.
///
/// Carves a `HeapArena`-sized region into `block_count` fixed-size blocks
/// at construction time and links them all together as the initial free
/// list; `allocate_chain`/`free_chain` pop/push a prefix of that list under
/// a single `parking_lot::Mutex` guarding the free-list head.
pub struct FreeListAllocator<'m, M: RawMemory> {
    memory: &'m M,
    layout: Layout,
    free_head: Mutex<u64>,
}

impl<'m, M: RawMemory> FreeListAllocator<'m, M> {
    /// Builds a free-list allocator over `block_count` blocks starting at
    /// `base_addr`, linking them into one chain.
    ///
    /// # Panics
    ///
    /// Panics if `block_count` is zero.
    pub fn new(memory: &'m M, layout: Layout, base_addr: u64, block_count: usize) -> Self {
        assert!(block_count > 0, "FreeListAllocator needs at least one block");
        let block_size = layout.block_size() as u64;
        for i in 0..block_count {
            let addr = base_addr + i as u64 * block_size;
            let next = if i + 1 < block_count {
                addr + block_size
            } else {
                0
            };
            memory.put_long(addr + crate::layout::NEXT_BLOCK_OFFSET, next as i64);
        }
        FreeListAllocator {
            memory,
            layout,
            free_head: Mutex::new(base_addr),
        }
    }
}

impl<M: RawMemory> BlockAllocator for FreeListAllocator<'_, M> {
    fn allocate_chain(&self, count: usize) -> Option<u64> {
        assert!(count > 0, "allocate_chain requires count > 0");
        let mut head_slot = self.free_head.lock();
        if *head_slot == 0 {
            return None;
        }
        // Walk `count` blocks from the free list, remembering the last one
        // so we can splice the remainder back as the new free-list head.
        let mut addrs = alloc::vec::Vec::with_capacity(count);
        let mut cur = *head_slot;
        for _ in 0..count {
            if cur == 0 {
                // Not enough free blocks: put back what we scanned before
                // giving up, since nothing was actually removed yet.
                return None;
            }
            addrs.push(cur);
            cur = self.memory.get_long(cur + crate::layout::NEXT_BLOCK_OFFSET) as u64;
        }
        *head_slot = cur;
        drop(head_slot);

        for i in 0..addrs.len() {
            let next = if i + 1 < addrs.len() { addrs[i + 1] } else { 0 };
            self.memory
                .put_long(addrs[i] + crate::layout::NEXT_BLOCK_OFFSET, next as i64);
        }
        Some(addrs[0])
    }

    fn free_chain(&self, head: u64) {
        if head == 0 {
            return;
        }
        let mut tail = head;
        loop {
            let next = self.memory.get_long(tail + crate::layout::NEXT_BLOCK_OFFSET) as u64;
            if next == 0 {
                break;
            }
            tail = next;
        }
        let mut head_slot = self.free_head.lock();
        self.memory
            .put_long(tail + crate::layout::NEXT_BLOCK_OFFSET, *head_slot as i64);
        *head_slot = head;
    }
}
