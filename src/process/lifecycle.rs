/*!
 * Process Lifecycle
 * State transitions: admission, execution slices and completion
 */

use super::types::{Process, ProcessError, ProcessResult, ProcessState};
use crate::core::types::Tick;
use crate::memory::{Allocator, BlockHandle, MemoryResult};
use tracing::debug;

impl Process {
    /// Attach a granted block and become active
    pub fn start(&mut self, handle: BlockHandle) -> ProcessResult<()> {
        self.transition(ProcessState::Active)?;
        self.lease = Some(handle);
        debug!(pid = self.id, block = %handle.id(), "Process started");
        Ok(())
    }

    /// Mark the process as permanently rejected
    pub fn reject(&mut self) -> ProcessResult<()> {
        self.transition(ProcessState::Rejected)
    }

    /// Run for one quantum
    ///
    /// No-op unless active. When the remaining time reaches zero the process
    /// completes and hands its block back to `allocator`.
    pub fn tick<A>(&mut self, quantum: Tick, allocator: &mut A) -> MemoryResult<ProcessState>
    where
        A: Allocator + ?Sized,
    {
        if self.state != ProcessState::Active {
            return Ok(self.state);
        }

        self.remaining_time = self.remaining_time.saturating_sub(quantum);
        if self.remaining_time == 0 {
            if let Some(handle) = self.lease {
                allocator.free(handle)?;
            }
            self.lease = None;
            self.state = ProcessState::Completed;
            debug!(pid = self.id, "Process completed");
        }

        Ok(self.state)
    }

    fn transition(&mut self, to: ProcessState) -> ProcessResult<()> {
        if self.state != ProcessState::Queued {
            return Err(ProcessError::InvalidStateTransition {
                pid: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
