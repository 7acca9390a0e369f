/*!
 * Defragmentation
 * Coalescing and compaction of the partition
 */

use super::MemoryManager;
use crate::memory::types::MemoryBlock;
use tracing::debug;

impl MemoryManager {
    /// Merge every maximal run of adjacent free blocks
    ///
    /// Allocated blocks keep their relative order; the merged block keeps the
    /// ID of the first block in its run.
    pub fn coalesce(&mut self) {
        let before = self.partition.len();
        let mut merged: Vec<MemoryBlock> = Vec::with_capacity(before);

        for block in self.partition.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.is_free() && block.is_free() => prev.grow(block.size()),
                _ => merged.push(block),
            }
        }

        self.partition = merged;
        self.recompute_offsets();
        self.coalesce_count += 1;

        debug!(
            blocks_before = before,
            blocks_after = self.partition.len(),
            passes = self.coalesce_count,
            "Coalesced free blocks"
        );
        debug_assert!(self.check_invariants().is_ok());
    }

    /// Move every allocated block to the low end of the address space
    ///
    /// The partition becomes the allocated blocks in their original order
    /// followed by one free block holding all free capacity, or no free block
    /// at all when memory is full.
    pub fn compact(&mut self) {
        let free = self.free_capacity();
        let trailing_id = self.partition.iter().find(|b| b.is_free()).map(|b| b.id());

        self.partition.retain(|b| !b.is_free());
        if let Some(id) = trailing_id {
            self.partition.push(MemoryBlock::new(id, free));
        }
        self.recompute_offsets();
        self.compact_count += 1;

        debug!(
            allocated_blocks = self.partition.len() - usize::from(trailing_id.is_some()),
            trailing_free = free,
            passes = self.compact_count,
            "Compacted partition"
        );
        debug_assert!(self.check_invariants().is_ok());
    }
}
