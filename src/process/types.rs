/*!
 * Process Types
 * Common types for simulated processes
 */

use crate::core::types::{Pid, Size, Tick};
use crate::memory::BlockHandle;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Invalid state transition for PID {pid}: {from:?} -> {to:?}")]
    #[diagnostic(code(process::invalid_transition))]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
}

/// Process descriptor as supplied by the workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: Pid,
    /// Memory demand, in units
    pub memory: Size,
    pub arrival: Tick,
    pub run_length: Tick,
}

impl ProcessSpec {
    pub fn new(id: Pid, memory: Size, arrival: Tick, run_length: Tick) -> Self {
        Self {
            id,
            memory,
            arrival,
            run_length,
        }
    }
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in the pending queue for arrival or free memory
    Queued,
    /// Holding a block and eligible for execution
    Active,
    /// Ran to completion; its block has been released
    Completed,
    /// Demand exceeds total capacity; never admitted
    Rejected,
}

/// A simulated process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub(super) id: Pid,
    pub(super) memory_demand: Size,
    pub(super) arrival_time: Tick,
    pub(super) remaining_time: Tick,
    pub(super) lease: Option<BlockHandle>,
    pub(super) state: ProcessState,
}

impl Process {
    pub fn new(spec: ProcessSpec) -> Self {
        Self {
            id: spec.id,
            memory_demand: spec.memory,
            arrival_time: spec.arrival,
            remaining_time: spec.run_length,
            lease: None,
            state: ProcessState::Queued,
        }
    }

    #[inline]
    pub fn id(&self) -> Pid {
        self.id
    }

    #[inline]
    pub fn memory_demand(&self) -> Size {
        self.memory_demand
    }

    #[inline]
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    #[inline]
    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    /// Handle of the granted block while active
    #[inline]
    pub fn lease(&self) -> Option<BlockHandle> {
        self.lease
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn has_arrived(&self, now: Tick) -> bool {
        self.arrival_time <= now
    }
}

impl From<ProcessSpec> for Process {
    fn from(spec: ProcessSpec) -> Self {
        Self::new(spec)
    }
}
