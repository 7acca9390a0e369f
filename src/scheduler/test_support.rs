/*!
 * Scheduler Test Support
 * Memory that claims free space but never places a block
 */

use crate::core::types::{Pid, Size};
use crate::memory::{
    Allocator, BlockExtent, BlockHandle, BlockInfo, Defragmenter, MemoryError, MemoryInfo,
    MemoryResult, MemoryStats,
};

/// Reports its whole capacity as free while every allocation misses
///
/// Models a corrupt partition: the admission ladder sees enough free
/// capacity, runs both repair passes and still gets `NoFit`.
#[derive(Debug)]
pub(super) struct NeverFits {
    capacity: Size,
    attempts: u32,
    coalesce_count: u64,
    compact_count: u64,
}

impl NeverFits {
    pub(super) fn new(capacity: Size) -> Self {
        Self {
            capacity,
            attempts: 0,
            coalesce_count: 0,
            compact_count: 0,
        }
    }

    /// Allocation calls seen so far
    pub(super) fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Allocator for NeverFits {
    fn allocate(&mut self, amount: Size, _owner: Pid) -> MemoryResult<BlockHandle> {
        self.attempts += 1;
        Err(MemoryError::NoFit {
            requested: amount,
            free: self.capacity,
            largest_free: 0,
        })
    }

    fn free(&mut self, _handle: BlockHandle) -> MemoryResult<()> {
        Ok(())
    }

    fn capacity(&self) -> Size {
        self.capacity
    }

    fn free_capacity(&self) -> Size {
        self.capacity
    }
}

impl Defragmenter for NeverFits {
    fn coalesce(&mut self) {
        self.coalesce_count += 1;
    }

    fn compact(&mut self) {
        self.compact_count += 1;
    }
}

impl MemoryInfo for NeverFits {
    fn stats(&self) -> MemoryStats {
        MemoryStats {
            capacity: self.capacity,
            free: self.capacity,
            allocated: 0,
            blocks: 0,
            free_blocks: 0,
            largest_free: 0,
            usage_percentage: 0.0,
        }
    }

    fn layout(&self) -> Vec<BlockInfo> {
        Vec::new()
    }

    fn extent_of(&self, _handle: BlockHandle) -> Option<BlockExtent> {
        None
    }

    fn coalesce_count(&self) -> u64 {
        self.coalesce_count
    }

    fn compact_count(&self) -> u64 {
        self.compact_count
    }
}
