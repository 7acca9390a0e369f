/*!
 * Memory Allocator Implementation
 * Allocation and deallocation logic
 */

use super::MemoryManager;
use crate::core::types::{Pid, Size};
use crate::memory::types::{AllocationError, BlockHandle, MemoryError, MemoryResult};
use tracing::{debug, warn};

impl MemoryManager {
    /// Allocate `amount` units for `owner` with the configured strategy
    ///
    /// `NoFit` is the expected failure and leaves the partition untouched;
    /// only the next-fit cursor may have moved.
    pub fn allocate(&mut self, amount: Size, owner: Pid) -> MemoryResult<BlockHandle> {
        if amount == 0 {
            return Err(AllocationError::ZeroSize.into());
        }

        let Some(idx) = self.strategy.select(&self.partition, amount, &mut self.cursor) else {
            let free = self.free_capacity();
            let largest_free = self.largest_free();
            debug!(
                pid = owner,
                requested = amount,
                free,
                largest_free,
                strategy = %self.strategy,
                "No fit"
            );
            return Err(MemoryError::NoFit {
                requested: amount,
                free,
                largest_free,
            });
        };

        let (allocated, remainder) = self.partition[idx].split(amount, owner, &mut self.ids)?;
        let handle = BlockHandle::new(allocated.id());
        self.partition
            .splice(idx..=idx, std::iter::once(allocated).chain(remainder));
        self.recompute_offsets();

        debug!(
            pid = owner,
            size = amount,
            block = %handle.id(),
            index = idx,
            "Allocated block"
        );
        debug_assert!(self.check_invariants().is_ok());

        Ok(handle)
    }

    /// Mark the block behind `handle` free; neighbours are left unmerged
    pub fn free(&mut self, handle: BlockHandle) -> MemoryResult<()> {
        let Some(idx) = self.position_of(handle) else {
            warn!(block = %handle.id(), "Free of unknown block");
            return Err(MemoryError::InvalidHandle(handle.id()));
        };

        let block = &mut self.partition[idx];
        let Some(pid) = block.owner().pid() else {
            warn!(block = %handle.id(), "Free of already released block");
            return Err(MemoryError::InvalidHandle(handle.id()));
        };

        block.free();
        debug!(pid, block = %handle.id(), size = block.size(), "Freed block");
        Ok(())
    }
}
