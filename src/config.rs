//! Validated configuration for a hash-entry engine instance.

/// Startup configuration: block size, partition count, and the LRU
/// traversal length above which `find_entry` logs a rate-limited warning.
///
/// Constructed only through [`CoreConfig::new`], which enforces the power
/// of two requirements the layout and partition table both depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreConfig {
    block_size: usize,
    partition_count: usize,
    lru_warn_threshold: u64,
}

impl CoreConfig {
    /// Builds a validated configuration.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` or `partition_count` is not a power of two,
    /// or if `block_size` is below [`crate::layout::Layout::MIN_BLOCK_SIZE`].
    pub fn new(block_size: usize, partition_count: usize, lru_warn_threshold: u64) -> Self {
        assert!(
            partition_count.is_power_of_two(),
            "partition_count must be a power of two, got {partition_count}"
        );
        // Layout::new itself validates block_size; constructing it here
        // both validates and fails fast at config time rather than later.
        let _ = crate::layout::Layout::new(block_size);
        CoreConfig {
            block_size,
            partition_count,
            lru_warn_threshold,
        }
    }

    /// Size in bytes of every block in the arena.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of partitions the hash space is split across.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    /// Number of LRU links `find_entry` may traverse before it logs a
    /// rate-limited warning.
    pub fn lru_warn_threshold(&self) -> u64 {
        self.lru_warn_threshold
    }

    /// The derived block layout for this configuration.
    pub fn layout(&self) -> crate::layout::Layout {
        crate::layout::Layout::new(self.block_size)
    }
}
