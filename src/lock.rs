//! Entry-level locking.
//!
//! Distinct from the partition lock: this guards a single entry's
//! contents (e.g. while its value is being overwritten in place) without
//! blocking lookups against other entries in the same partition. The
//! partition lock may be acquired first and then an entry lock, but never
//! the reverse, and entry locks do not nest.

use crate::chain::entry_lock_addr;
use crate::memory::RawMemory;

/// Acquires the entry lock for `head`, spinning until it is free.
pub fn lock_entry<M: RawMemory>(mem: &M, head: u64) {
    mem.lock(entry_lock_addr(head));
}

/// Releases the entry lock for `head`.
///
/// # Panics
///
/// May panic (debug builds) if the lock was not held.
pub fn unlock_entry<M: RawMemory>(mem: &M, head: u64) {
    mem.unlock(entry_lock_addr(head));
}

/// An RAII guard holding an entry's lock for the guard's lifetime.
pub struct EntryLockGuard<'m, M: RawMemory> {
    mem: &'m M,
    head: u64,
}

impl<'m, M: RawMemory> EntryLockGuard<'m, M> {
    /// Acquires the entry lock for `head` and returns a guard that
    /// releases it on drop.
    pub fn acquire(mem: &'m M, head: u64) -> Self {
        lock_entry(mem, head);
        EntryLockGuard { mem, head }
    }
}

impl<M: RawMemory> Drop for EntryLockGuard<'_, M> {
    fn drop(&mut self) {
        unlock_entry(self.mem, self.head);
    }
}
