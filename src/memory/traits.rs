/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::types::{Pid, Size};

/// Memory allocator interface
pub trait Allocator {
    /// Allocate `amount` units for a process using the configured strategy
    fn allocate(&mut self, amount: Size, owner: Pid) -> MemoryResult<BlockHandle>;

    /// Release the block behind a handle
    fn free(&mut self, handle: BlockHandle) -> MemoryResult<()>;

    /// Total capacity of the address space
    fn capacity(&self) -> Size;

    /// Sum of the sizes of all free blocks
    fn free_capacity(&self) -> Size;

    /// Sum of the sizes of all allocated blocks
    fn allocated_capacity(&self) -> Size {
        self.capacity() - self.free_capacity()
    }
}

/// Fragmentation repair
pub trait Defragmenter {
    /// Merge every run of adjacent free blocks
    fn coalesce(&mut self);

    /// Move allocated blocks to the front, leaving one trailing free block
    fn compact(&mut self);
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Ordered view of every block in the partition
    fn layout(&self) -> Vec<BlockInfo>;

    /// Current extent of an allocated block
    fn extent_of(&self, handle: BlockHandle) -> Option<BlockExtent>;

    /// Number of coalesce passes run so far
    fn coalesce_count(&self) -> u64;

    /// Number of compaction passes run so far
    fn compact_count(&self) -> u64;
}

/// Memory manager trait combining all interfaces
pub trait ManagedMemory: Allocator + Defragmenter + MemoryInfo {}

/// Implement ManagedMemory for types that implement all required traits
impl<T> ManagedMemory for T where T: Allocator + Defragmenter + MemoryInfo {}
