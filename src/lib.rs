//! An off-heap, partitioned, LRU-ordered hash-entry cache core.
//!
//! Entries of arbitrary byte length live outside the managed heap as
//! chains of fixed-size blocks, indexed by hash into lock-striped
//! partitions, each maintaining its own intrusive doubly-linked LRU list.
//! The goal is large-capacity caching without burdening a garbage
//! collector and with predictable low-latency lookups.
//!
//! This crate covers exactly the hash-entry engine: the chain layout, the
//! chain writer and streaming reader, per-partition LRU maintenance,
//! entry-level locking, and bulk eviction. It does not provide a
//! production block allocator, a true off-heap/mmap memory accessor, or a
//! user-facing cache API — those are left to callers, with a reference
//! implementation of each shipped so the engine is usable and testable on
//! its own:
//!
//! ```text
//!  caller-owned                           this crate
//! ┌───────────────┐   allocate_chain   ┌───────────────────┐
//! │ BlockAllocator │ ─────────────────▶│ writer::create_entry│
//! └───────────────┘                    └───────────────────┘
//! ┌───────────────┐   get/put_long     ┌───────────────────┐
//! │   RawMemory    │◀──────────────────│ chain / reader /    │
//! └───────────────┘                    │ lookup / lru        │
//! ┌───────────────┐   lock_for_hash    └───────────────────┘
//! │ PartitionTable │ ─────────────────▶ lru::*, lookup::find_entry
//! └───────────────┘
//! ```
//!
//! Selecting a configuration: pick `block_size` as a power of two sized to
//! the common entry size in your workload (larger blocks waste less chain
//! overhead for big values, smaller blocks waste less space for small
//! ones), and `partition_count` as a power of two sized to the expected
//! concurrency (more partitions reduce lock contention at the cost of a
//! less precise global LRU order, since eviction order is only maintained
//! within each partition).

#![no_std]
#![warn(missing_debug_implementations)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod allocator;
pub mod bulk;
pub mod bytes;
pub mod chain;
pub mod config;
pub mod error;
pub mod layout;
pub mod lock;
pub mod lookup;
pub mod lru;
pub mod memory;
pub mod partition;
pub mod reader;
pub mod writer;

pub use allocator::{BlockAllocator, FreeListAllocator};
pub use bytes::{BytesSink, BytesSource};
pub use config::CoreConfig;
pub use error::CoreError;
pub use layout::Layout;
pub use lock::{lock_entry, unlock_entry, EntryLockGuard};
pub use lookup::{compare_key, find_entry};
pub use lru::{add_as_head, promote_to_head, unlink};
pub use memory::{HeapArena, RawMemory};
pub use partition::{PartitionGuard, PartitionTable};
pub use reader::{read_key, write_value_to_sink, ValueReader, ValueWriter};
pub use writer::{create_entry, ValueInit};

#[cfg(test)]
mod tests {
    //! End-to-end scenarios wiring every component together through the
    //! public API, covering S1-S6 of the testable-properties catalog.

    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    struct Engine {
        arena: HeapArena,
        layout: Layout,
        allocator: FreeListAllocator<'static, HeapArena>,
        table: PartitionTable,
    }

    impl Engine {
        fn new(block_size: usize, block_count: usize, partition_count: usize) -> Box<Self> {
            let layout = Layout::new(block_size);
            let arena = HeapArena::new(block_size * block_count);
            let base = arena.base_addr();
            // SAFETY: `Engine` keeps `arena` pinned behind a `Box` for its
            // whole lifetime and never moves or drops it before
            // `allocator`, so the 'static borrow taken here stays valid
            // for as long as `allocator` does.
            let arena_ref: &'static HeapArena = unsafe { &*(&arena as *const HeapArena) };
            let allocator = FreeListAllocator::new(arena_ref, layout, base, block_count);
            let table = PartitionTable::new(partition_count);
            Box::new(Engine {
                arena,
                layout,
                allocator,
                table,
            })
        }

        fn put(&self, hash: u64, key: &[u8], value: &[u8]) -> Result<u64, CoreError> {
            let head = create_entry(
                &self.arena,
                &self.allocator,
                &self.layout,
                hash,
                &key,
                ValueInit::Bytes(&value),
            )?;
            let mut guard = self.table.lock_for_hash(hash);
            add_as_head(&self.arena, &mut guard, head);
            Ok(head)
        }

        fn get(&self, hash: u64, key: &[u8]) -> Option<Vec<u8>> {
            let mut guard = self.table.lock_for_hash(hash);
            let head = find_entry(&self.arena, &self.layout, &guard, hash, &key, 1_000_000);
            if head == 0 {
                return None;
            }
            promote_to_head(&self.arena, &mut guard, head);
            let mut out = Vec::new();
            write_value_to_sink(&self.arena, &self.layout, head, &mut out).unwrap();
            Some(out)
        }
    }

    #[test]
    fn s1_single_block_entry_round_trips() {
        let engine = Engine::new(256, 4, 1);
        engine.put(1, b"abc", b"xy").unwrap();
        assert_eq!(engine.get(1, b"abc"), Some(b"xy".to_vec()));
    }

    #[test]
    fn s2_multi_block_entry_round_trips() {
        let engine = Engine::new(128, 8, 1);
        let key: Vec<u8> = (0u8..200).collect();
        let value: Vec<u8> = (0u8..=255).cycle().take(400).collect();
        engine.put(5, &key, &value).unwrap();
        assert_eq!(engine.get(5, &key), Some(value));
    }

    #[test]
    fn s3_lookup_promotes_entry_to_lru_head() {
        let engine = Engine::new(256, 4, 1);
        let h1 = engine.put(1, b"a", b"1").unwrap();
        let h2 = engine.put(1, b"b", b"2").unwrap();
        // after two puts, list head is h2 (most recently inserted)
        {
            let guard = engine.table.lock_for_hash(1);
            assert_eq!(guard.get_lru_head(), h2);
        }
        engine.get(1, b"a").unwrap();
        {
            let guard = engine.table.lock_for_hash(1);
            assert_eq!(guard.get_lru_head(), h1);
        }
    }

    #[test]
    fn s4_hash_collision_with_key_mismatch_is_disambiguated() {
        let engine = Engine::new(256, 4, 1);
        engine.put(7, b"alpha", b"1").unwrap();
        engine.put(7, b"bravo", b"2").unwrap();
        assert_eq!(engine.get(7, b"alpha"), Some(b"1".to_vec()));
        assert_eq!(engine.get(7, b"bravo"), Some(b"2".to_vec()));
        assert_eq!(engine.get(7, b"charlie"), None);
    }

    #[test]
    fn s5_remove_all_clears_every_partition() {
        let engine = Engine::new(256, 4, 2);
        engine.put(1, b"a", b"1").unwrap();
        engine.put(2, b"b", b"2").unwrap();
        bulk::remove_all(&engine.arena, &engine.table, &engine.allocator);
        assert_eq!(engine.get(1, b"a"), None);
        assert_eq!(engine.get(2, b"b"), None);
        assert_eq!(bulk::lru_lengths(&engine.arena, &engine.table), vec![0, 0]);
    }

    #[test]
    fn s6_oversize_value_reports_error_without_mutating_sink() {
        let arena = HeapArena::new(256);
        let layout = Layout::new(256);
        let head = arena.base_addr();
        chain::set_key_length(&arena, head, 0);
        chain::set_value_length(&arena, head, reader::MAX_STREAMABLE_VALUE + 1);
        let mut sink: Vec<u8> = vec![0xAA, 0xBB];
        let result = write_value_to_sink(&arena, &layout, head, &mut sink);
        assert_eq!(result, Err(CoreError::ValueTooLarge));
        assert_eq!(sink, vec![0xAA, 0xBB]);
    }

    #[test]
    fn property_empty_partition_lookup_returns_zero() {
        let engine = Engine::new(256, 4, 1);
        assert_eq!(engine.get(1, b"missing"), None);
    }

    #[test]
    fn property_unlink_then_relookup_does_not_find_entry() {
        let engine = Engine::new(256, 4, 1);
        let head = engine.put(3, b"k", b"v").unwrap();
        {
            let mut guard = engine.table.lock_for_hash(3);
            unlink(&engine.arena, &mut guard, head);
        }
        assert_eq!(engine.get(3, b"k"), None);
    }
}
