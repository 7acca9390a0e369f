/*!
 * Snapshot
 * Point-in-time view of allocator and scheduler state
 */

use crate::core::limits::DEFAULT_RENDER_SCALE;
use crate::core::types::{Pid, Size, Tick};
use crate::memory::{BlockExtent, BlockInfo, Strategy};
use crate::render::render_snapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An active process as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProcess {
    pub pid: Pid,
    /// Occupied extent; always present for a well-formed simulation
    pub extent: Option<BlockExtent>,
    pub remaining: Tick,
}

/// Serializable simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: Tick,
    pub capacity: Size,
    pub strategy: Strategy,
    pub free: Size,
    pub allocated: Size,
    /// Partition in address order
    pub blocks: Vec<BlockInfo>,
    /// Active set in round-robin order
    pub active: Vec<ActiveProcess>,
    pub pending: usize,
    pub coalesce_count: u64,
    pub compact_count: u64,
    pub rejected: Vec<Pid>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_snapshot(self, DEFAULT_RENDER_SCALE))
    }
}
