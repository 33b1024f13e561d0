//! Partition table: hash-striped locks guarding per-partition LRU heads.
//!
//! Mirrors the teacher's `ConcurrentLruCache` segment-per-lock design
//! (`segments: Box<[Mutex<LruSegment<K, V, S>>]>`), except each segment
//! here only guards a single `u64` LRU-head pointer into off-heap memory
//! rather than an owned `HashMap` + intrusive list.

use parking_lot::{Mutex, MutexGuard};

struct Partition {
    lru_head: Mutex<u64>,
}

/// A fixed set of lock-striped partitions, indexed by `hash mod
/// partition_count`.
#[derive(Debug)]
pub struct PartitionTable {
    partitions: alloc::boxed::Box<[Partition]>,
    mask: u64,
}

impl core::fmt::Debug for Partition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Partition").finish_non_exhaustive()
    }
}

impl PartitionTable {
    /// Builds a table of `partition_count` empty partitions.
    ///
    /// # Panics
    ///
    /// Panics if `partition_count` is not a power of two.
    pub fn new(partition_count: usize) -> Self {
        assert!(
            partition_count.is_power_of_two(),
            "partition_count must be a power of two, got {partition_count}"
        );
        let partitions = (0..partition_count)
            .map(|_| Partition {
                lru_head: Mutex::new(0),
            })
            .collect::<alloc::vec::Vec<_>>()
            .into_boxed_slice();
        PartitionTable {
            partitions,
            mask: partition_count as u64 - 1,
        }
    }

    /// Number of partitions in the table.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Partition index a given hash routes to.
    #[inline]
    pub fn index_for_hash(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// Locks the partition that `hash` routes to, returning an RAII guard.
    pub fn lock_for_hash(&self, hash: u64) -> PartitionGuard<'_> {
        self.lock_index(self.index_for_hash(hash))
    }

    /// Locks the partition at `index` directly.
    ///
    /// # Panics
    ///
    /// Panics if `index >= partition_count()`.
    pub fn lock_index(&self, index: usize) -> PartitionGuard<'_> {
        PartitionGuard {
            guard: self.partitions[index].lru_head.lock(),
            index,
        }
    }
}

/// An RAII guard holding a partition's lock for the guard's lifetime.
///
/// An idiomatic-Rust stand-in for the explicit
/// `lock_partition_for_hash`/`unlock_partition` pair: the partition
/// unlocks automatically when the guard drops instead of requiring a
/// matching manual call.
pub struct PartitionGuard<'a> {
    guard: MutexGuard<'a, u64>,
    index: usize,
}

impl PartitionGuard<'_> {
    /// Index of the partition this guard holds.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current LRU head address for this partition, or 0 if empty.
    pub fn get_lru_head(&self) -> u64 {
        *self.guard
    }

    /// Sets the LRU head address for this partition.
    pub fn set_lru_head(&mut self, addr: u64) {
        *self.guard = addr;
    }
}

impl core::fmt::Debug for PartitionGuard<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartitionGuard")
            .field("index", &self.index)
            .field("lru_head", &*self.guard)
            .finish()
    }
}
