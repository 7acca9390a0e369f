/*!
 * Memory Management
 *
 * Partitioned address space with pluggable placement strategies.
 *
 * ## Layout
 *
 * The partition is an ordered list of blocks that tiles `[0, capacity)`
 * exactly: sizes sum to the capacity, offsets start at zero and each block
 * begins where the previous one ends. Every structural change (split, merge,
 * compaction) is followed by a layout pass that recomputes offsets, so a
 * block's extent is always consistent with its position.
 *
 * ## Ownership
 *
 * The manager is the sole owner of block storage. Processes hold a
 * [`BlockHandle`] that names a block by its stable ID. Allocated blocks keep
 * their ID across coalescing and compaction; a merged free block takes the ID
 * of the first block in its run.
 */

mod allocator;
mod defrag;

use super::strategy::Strategy;
use super::traits::{Allocator, Defragmenter, MemoryInfo};
use super::types::*;
use crate::core::types::{Pid, Size};
use tracing::info;

/// Memory manager
#[derive(Debug, Clone)]
pub struct MemoryManager {
    capacity: Size,
    strategy: Strategy,
    partition: Vec<MemoryBlock>,
    // Next-fit scan position, persisted across allocations
    cursor: usize,
    ids: BlockIds,
    coalesce_count: u64,
    compact_count: u64,
}

impl MemoryManager {
    /// Create a manager with a single free block spanning `capacity`
    pub fn new(capacity: Size, strategy: Strategy) -> MemoryResult<Self> {
        if capacity == 0 {
            return Err(MemoryError::ZeroCapacity);
        }

        let mut ids = BlockIds::new();
        let partition = vec![MemoryBlock::new(ids.next_id(), capacity)];

        info!(capacity, strategy = %strategy, "Memory manager initialized");
        Ok(Self {
            capacity,
            strategy,
            partition,
            cursor: 0,
            ids,
            coalesce_count: 0,
            compact_count: 0,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Read-only access to the ordered partition
    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.partition
    }

    /// Next-fit scan position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Owner of the block behind a handle, if it is still allocated
    pub fn owner_of(&self, handle: BlockHandle) -> Option<Pid> {
        self.position_of(handle)
            .and_then(|idx| self.partition[idx].owner().pid())
    }

    pub(super) fn position_of(&self, handle: BlockHandle) -> Option<usize> {
        self.partition.iter().position(|b| b.id() == handle.id())
    }

    /// Assign offsets from block order
    pub(super) fn recompute_offsets(&mut self) {
        let mut offset = 0;
        for block in &mut self.partition {
            block.place(offset);
            offset += block.size();
        }
    }

    fn largest_free(&self) -> Size {
        self.partition
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size())
            .max()
            .unwrap_or(0)
    }

    /// Verify the structural invariants of the partition
    ///
    /// Adjacent free blocks are legal between defragmentation passes, so they
    /// are not checked here; see [`MemoryManager::is_coalesced`].
    pub fn check_invariants(&self) -> MemoryResult<()> {
        let mut expected = 0;
        for (idx, block) in self.partition.iter().enumerate() {
            if block.size() == 0 {
                return Err(MemoryError::CorruptionDetected(format!(
                    "block {} at index {} has zero size",
                    block.id(),
                    idx
                )));
            }
            if block.offset() != expected {
                return Err(MemoryError::CorruptionDetected(format!(
                    "block {} at index {} has offset {}, expected {}",
                    block.id(),
                    idx,
                    block.offset(),
                    expected
                )));
            }
            expected += block.size();
        }
        if expected != self.capacity {
            return Err(MemoryError::CorruptionDetected(format!(
                "block sizes sum to {}, capacity is {}",
                expected, self.capacity
            )));
        }
        Ok(())
    }

    /// True when no two adjacent blocks are both free
    pub fn is_coalesced(&self) -> bool {
        self.partition
            .windows(2)
            .all(|pair| !(pair[0].is_free() && pair[1].is_free()))
    }

    pub fn stats(&self) -> MemoryStats {
        let free = self.free_capacity();
        let allocated = self.capacity - free;
        MemoryStats {
            capacity: self.capacity,
            free,
            allocated,
            blocks: self.partition.len(),
            free_blocks: self.partition.iter().filter(|b| b.is_free()).count(),
            largest_free: self.largest_free(),
            usage_percentage: allocated as f64 / self.capacity as f64 * 100.0,
        }
    }

    pub fn layout(&self) -> Vec<BlockInfo> {
        self.partition.iter().map(MemoryBlock::info).collect()
    }

    pub fn extent_of(&self, handle: BlockHandle) -> Option<BlockExtent> {
        self.position_of(handle)
            .map(|idx| &self.partition[idx])
            .filter(|b| !b.is_free())
            .map(MemoryBlock::location)
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    pub fn free_capacity(&self) -> Size {
        self.partition
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size())
            .sum()
    }
}

impl Allocator for MemoryManager {
    fn allocate(&mut self, amount: Size, owner: Pid) -> MemoryResult<BlockHandle> {
        MemoryManager::allocate(self, amount, owner)
    }

    fn free(&mut self, handle: BlockHandle) -> MemoryResult<()> {
        MemoryManager::free(self, handle)
    }

    fn capacity(&self) -> Size {
        MemoryManager::capacity(self)
    }

    fn free_capacity(&self) -> Size {
        MemoryManager::free_capacity(self)
    }
}

impl Defragmenter for MemoryManager {
    fn coalesce(&mut self) {
        MemoryManager::coalesce(self)
    }

    fn compact(&mut self) {
        MemoryManager::compact(self)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn layout(&self) -> Vec<BlockInfo> {
        MemoryManager::layout(self)
    }

    fn extent_of(&self, handle: BlockHandle) -> Option<BlockExtent> {
        MemoryManager::extent_of(self, handle)
    }

    fn coalesce_count(&self) -> u64 {
        self.coalesce_count
    }

    fn compact_count(&self) -> u64 {
        self.compact_count
    }
}
