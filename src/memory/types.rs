/*!
 * Memory Types
 * Blocks, handles and errors for the partitioned address space
 */

use crate::core::types::{Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Block-level errors raised by [`MemoryBlock::split`]
///
/// These indicate a caller logic error and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum AllocationError {
    #[error("Cannot allocate zero units of memory")]
    #[diagnostic(code(memory::zero_size))]
    ZeroSize,

    #[error("Cannot allocate {requested} units of memory from block of size {available}")]
    #[diagnostic(code(memory::oversized))]
    Oversized { requested: Size, available: Size },

    #[error("Block is already allocated (PID = {owner})")]
    #[diagnostic(code(memory::already_owned))]
    AlreadyOwned { owner: Pid },
}

/// Allocator-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    /// Expected and recoverable: retry after coalescing or compacting
    #[error(
        "No free block of {requested} units (free: {free}, largest free block: {largest_free})"
    )]
    #[diagnostic(
        code(memory::no_fit),
        help("Coalesce or compact the partition and retry.")
    )]
    NoFit {
        requested: Size,
        free: Size,
        largest_free: Size,
    },

    #[error("Block split failed: {0}")]
    #[diagnostic(code(memory::split_failed))]
    Allocation(#[from] AllocationError),

    #[error("Invalid or already released block handle: {0}")]
    #[diagnostic(
        code(memory::invalid_handle),
        help("Handles are only valid while their block is allocated.")
    )]
    InvalidHandle(BlockId),

    #[error("Address space capacity must be positive")]
    #[diagnostic(code(memory::zero_capacity))]
    ZeroCapacity,

    #[error("Partition corruption detected: {0}")]
    #[diagnostic(
        code(memory::corruption_detected),
        help("A structural mutation broke the partition invariants. Please report this issue.")
    )]
    CorruptionDetected(String),
}

/// Stable identifier of a block, unique for the lifetime of a memory manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic block ID source
#[derive(Debug, Default, Clone)]
pub struct BlockIds {
    next: u64,
}

impl BlockIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next += 1;
        id
    }
}

/// Lease on an allocated block
///
/// Only meaningful when looked up against the memory manager that issued it;
/// the manager stays the sole owner of block storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHandle(BlockId);

impl BlockHandle {
    pub(crate) fn new(id: BlockId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> BlockId {
        self.0
    }
}

/// Block ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Free,
    Process(Pid),
}

impl Owner {
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Owner::Free)
    }

    #[inline]
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Owner::Free => None,
            Owner::Process(pid) => Some(*pid),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Free => write!(f, "free"),
            Owner::Process(pid) => write!(f, "pid {}", pid),
        }
    }
}

/// Inclusive `[start, end]` extent of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExtent {
    pub start: Size,
    pub end: Size,
}

impl BlockExtent {
    pub fn overlaps(&self, other: &BlockExtent) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn span(&self) -> Size {
        self.end - self.start + 1
    }
}

impl fmt::Display for BlockExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// One contiguous extent of the address space and its ownership
///
/// The offset is derived from the block's position in its partition and is
/// only written by the memory manager when it recomputes the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    id: BlockId,
    size: Size,
    owner: Owner,
    offset: Size,
}

impl MemoryBlock {
    /// Create a free block, not yet placed in a partition
    pub fn new(id: BlockId, size: Size) -> Self {
        Self {
            id,
            size,
            owner: Owner::Free,
            offset: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    #[inline]
    pub fn offset(&self) -> Size {
        self.offset
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_free()
    }

    /// Release the block. Idempotent; size and position are untouched.
    pub fn free(&mut self) {
        self.owner = Owner::Free;
    }

    /// Inclusive extent at the currently assigned offset
    pub fn location(&self) -> BlockExtent {
        BlockExtent {
            start: self.offset,
            end: self.offset + self.size - 1,
        }
    }

    /// Carve `amount` units for `pid` out of this free block
    ///
    /// Returns the allocated block followed by the free remainder. The
    /// remainder is `None` when the request consumes the whole block, so no
    /// zero-size block is ever produced. Both blocks still need a layout pass.
    pub fn split(
        &self,
        amount: Size,
        pid: Pid,
        ids: &mut BlockIds,
    ) -> Result<(MemoryBlock, Option<MemoryBlock>), AllocationError> {
        if let Owner::Process(owner) = self.owner {
            return Err(AllocationError::AlreadyOwned { owner });
        }
        if amount == 0 {
            return Err(AllocationError::ZeroSize);
        }
        if amount > self.size {
            return Err(AllocationError::Oversized {
                requested: amount,
                available: self.size,
            });
        }

        let allocated = MemoryBlock {
            id: ids.next_id(),
            size: amount,
            owner: Owner::Process(pid),
            offset: self.offset,
        };
        let remainder = (amount < self.size).then(|| MemoryBlock {
            id: ids.next_id(),
            size: self.size - amount,
            owner: Owner::Free,
            offset: self.offset + amount,
        });

        Ok((allocated, remainder))
    }

    pub(crate) fn place(&mut self, offset: Size) {
        self.offset = offset;
    }

    pub(crate) fn grow(&mut self, extra: Size) {
        self.size += extra;
    }

    pub fn info(&self) -> BlockInfo {
        BlockInfo {
            id: self.id,
            offset: self.offset,
            size: self.size,
            extent: self.location(),
            owner: self.owner.pid(),
        }
    }
}

/// Read-only view of a block, as exposed to collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub id: BlockId,
    pub offset: Size,
    pub size: Size,
    pub extent: BlockExtent,
    /// `None` for free blocks
    pub owner: Option<Pid>,
}

impl BlockInfo {
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub capacity: Size,
    pub free: Size,
    pub allocated: Size,
    pub blocks: usize,
    pub free_blocks: usize,
    pub largest_free: Size,
    pub usage_percentage: f64,
}

impl MemoryStats {
    /// Share of free capacity lying outside the largest free block (0.0..=1.0)
    pub fn fragmentation(&self) -> f64 {
        if self.free == 0 {
            return 0.0;
        }
        (self.free - self.largest_free) as f64 / self.free as f64
    }
}
