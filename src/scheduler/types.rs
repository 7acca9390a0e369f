/*!
 * Scheduler Types
 * Domain types for time-stepped scheduling
 */

use crate::core::limits::DEFAULT_QUANTUM;
use crate::core::types::{Pid, Size, Tick};
use crate::memory::{BlockInfo, MemoryError};
use crate::process::ProcessError;
use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchedulerError {
    /// Allocation failed after coalescing and compacting with enough free capacity
    #[error(
        "Invariant violation at t={time}: PID {pid} could not be placed ({demand} units) \
         after compaction with {free} units free"
    )]
    #[diagnostic(
        code(scheduler::invariant_violation),
        help("The partition is corrupt. This is a bug in the allocator, please report it.")
    )]
    InvariantViolation {
        pid: Pid,
        demand: Size,
        free: Size,
        time: Tick,
    },

    #[error("Duplicate process ID: {0}")]
    #[diagnostic(
        code(scheduler::duplicate_pid),
        help("Process IDs must be unique within a workload.")
    )]
    DuplicatePid(Pid),

    #[error("Process {pid} has a memory demand of zero")]
    #[diagnostic(
        code(scheduler::invalid_demand),
        help("Every process must request at least one unit of memory.")
    )]
    InvalidDemand { pid: Pid },

    #[error("Invalid quantum: {0}")]
    #[diagnostic(
        code(scheduler::invalid_quantum),
        help("A tick must advance the clock by at least one time unit.")
    )]
    InvalidQuantum(Tick),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),
}

/// Permanent rejection of a process whose demand exceeds total capacity
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("Process {pid} needs {demand} units but the system only has {capacity}")]
pub struct CapacityExceeded {
    pub pid: Pid,
    pub demand: Size,
    pub capacity: Size,
}

/// Time quantum: time advanced per tick and run time granted per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quantum(Tick);

impl Quantum {
    /// Create new time quantum
    pub fn new(ticks: Tick) -> SchedulerResult<Self> {
        if ticks == 0 {
            return Err(SchedulerError::InvalidQuantum(ticks));
        }
        Ok(Self(ticks))
    }

    #[inline(always)]
    pub const fn as_ticks(&self) -> Tick {
        self.0
    }
}

impl Default for Quantum {
    fn default() -> Self {
        Self(DEFAULT_QUANTUM)
    }
}

impl<'de> Deserialize<'de> for Quantum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ticks = Tick::deserialize(deserializer)?;
        Self::new(ticks).map_err(serde::de::Error::custom)
    }
}

/// How an admitted process obtained its block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    /// First allocation attempt succeeded
    Direct,
    /// Succeeded after coalescing
    Coalesced,
    /// Succeeded after compacting
    Compacted,
}

/// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted(Recovery),
    /// Not enough free capacity right now; stays queued
    Deferred,
    Rejected(CapacityExceeded),
}

/// Repair pass run while admitting a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefragKind {
    Coalesce,
    Compact,
}

impl fmt::Display for DefragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefragKind::Coalesce => f.write_str("Coalescing"),
            DefragKind::Compact => f.write_str("Compacting"),
        }
    }
}

/// Partition layout on either side of one coalesce or compact pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefragEvent {
    pub kind: DefragKind,
    /// Process whose admission needed the pass
    pub pid: Pid,
    pub demand: Size,
    pub before: Vec<BlockInfo>,
    pub after: Vec<BlockInfo>,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Clock value the tick ran at
    pub time: Tick,
    pub admitted: Vec<Pid>,
    pub rejected: Vec<CapacityExceeded>,
    /// Process that received this tick's quantum
    pub executed: Option<Pid>,
    pub completed: Option<Pid>,
    /// Coalesce and compact passes in the order they ran
    pub defrag: Vec<DefragEvent>,
}

impl StepReport {
    pub(super) fn at(time: Tick) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Coalesce passes run this tick
    pub fn coalesced(&self) -> usize {
        self.count(DefragKind::Coalesce)
    }

    /// Compaction passes run this tick
    pub fn compacted(&self) -> usize {
        self.count(DefragKind::Compact)
    }

    fn count(&self, kind: DefragKind) -> usize {
        self.defrag.iter().filter(|e| e.kind == kind).count()
    }
}
