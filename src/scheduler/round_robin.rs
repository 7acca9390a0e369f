/*!
 * Round-Robin Scheduler
 * Time-stepped admission and single-process execution
 *
 * Each tick runs an admission pass over the whole pending queue in input
 * order, then gives exactly one active process a quantum, then advances the
 * clock. The round-robin cursor moves before selection, so with `n` active
 * processes every process is served once per `n` ticks.
 */

use super::admission::admit;
use super::types::{
    Admission, CapacityExceeded, Quantum, SchedulerError, SchedulerResult, StepReport,
};
use crate::core::types::{Pid, Tick};
use crate::memory::ManagedMemory;
use crate::monitoring::span_tick;
use crate::process::{Process, ProcessSpec, ProcessState};
use std::collections::HashSet;
use tracing::{debug, info};

/// Scheduler state
#[derive(Debug, Clone)]
pub struct Scheduler {
    time: Tick,
    quantum: Quantum,
    /// Input order, never sorted by arrival
    pending: Vec<Process>,
    /// Admission order
    active: Vec<Process>,
    cursor: usize,
    rejected: Vec<CapacityExceeded>,
    completed: Vec<Pid>,
}

impl Scheduler {
    /// Build a scheduler over a workload
    ///
    /// Process IDs must be unique and every demand positive.
    pub fn new<I>(quantum: Quantum, specs: I) -> SchedulerResult<Self>
    where
        I: IntoIterator<Item = ProcessSpec>,
    {
        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for spec in specs {
            if !seen.insert(spec.id) {
                return Err(SchedulerError::DuplicatePid(spec.id));
            }
            if spec.memory == 0 {
                return Err(SchedulerError::InvalidDemand { pid: spec.id });
            }
            pending.push(Process::new(spec));
        }

        info!(
            processes = pending.len(),
            quantum = quantum.as_ticks(),
            "Scheduler initialized"
        );
        Ok(Self {
            time: 0,
            quantum,
            pending,
            active: Vec::new(),
            cursor: 0,
            rejected: Vec::new(),
            completed: Vec::new(),
        })
    }

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn quantum(&self) -> Quantum {
        self.quantum
    }

    pub fn pending(&self) -> &[Process] {
        &self.pending
    }

    pub fn active(&self) -> &[Process] {
        &self.active
    }

    /// Round-robin position in the active set
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rejected(&self) -> &[CapacityExceeded] {
        &self.rejected
    }

    /// PIDs in completion order
    pub fn completed(&self) -> &[Pid] {
        &self.completed
    }

    /// Nothing left to admit or run
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }

    /// Run one tick: admission pass, execution pass, clock advance
    pub fn step_once<M>(&mut self, memory: &mut M) -> SchedulerResult<StepReport>
    where
        M: ManagedMemory + ?Sized,
    {
        let _span = span_tick(self.time).entered();
        let mut report = StepReport::at(self.time);

        self.admission_pass(&mut *memory, &mut report)?;
        self.execution_pass(&mut *memory, &mut report)?;
        self.time += self.quantum.as_ticks();

        debug!(
            time = self.time,
            pending = self.pending.len(),
            active = self.active.len(),
            "Tick finished"
        );
        Ok(report)
    }

    /// Run up to `steps` ticks, stopping early once the workload is complete
    pub fn run<M>(&mut self, memory: &mut M, steps: u64) -> SchedulerResult<Vec<StepReport>>
    where
        M: ManagedMemory + ?Sized,
    {
        let mut reports = Vec::new();
        for _ in 0..steps {
            if self.is_complete() {
                break;
            }
            reports.push(self.step_once(&mut *memory)?);
        }
        Ok(reports)
    }

    /// Scan the whole queue once; the queue is rebuilt from whatever stays
    fn admission_pass<M>(
        &mut self,
        memory: &mut M,
        report: &mut StepReport,
    ) -> SchedulerResult<()>
    where
        M: ManagedMemory + ?Sized,
    {
        let queue = std::mem::take(&mut self.pending);
        let mut waiting = Vec::with_capacity(queue.len());
        let mut queue = queue.into_iter();

        while let Some(mut process) = queue.next() {
            if !process.has_arrived(self.time) {
                waiting.push(process);
                continue;
            }

            match admit(&mut process, &mut *memory, self.time, &mut report.defrag) {
                Ok(Admission::Deferred) => waiting.push(process),
                Ok(Admission::Admitted(_)) => {
                    report.admitted.push(process.id());
                    self.active.push(process);
                }
                Ok(Admission::Rejected(rejection)) => {
                    report.rejected.push(rejection);
                    self.rejected.push(rejection);
                }
                Err(e) => {
                    // Leave the queue intact for inspection
                    waiting.push(process);
                    waiting.extend(queue);
                    self.pending = waiting;
                    return Err(e);
                }
            }
        }

        self.pending = waiting;
        Ok(())
    }

    /// Give exactly one active process a quantum
    fn execution_pass<M>(
        &mut self,
        memory: &mut M,
        report: &mut StepReport,
    ) -> SchedulerResult<()>
    where
        M: ManagedMemory + ?Sized,
    {
        if self.active.is_empty() {
            return Ok(());
        }

        self.cursor = (self.cursor + 1) % self.active.len();
        let quantum = self.quantum.as_ticks();
        let process = &mut self.active[self.cursor];
        report.executed = Some(process.id());

        if process.tick(quantum, &mut *memory)? == ProcessState::Completed {
            let done = self.active.remove(self.cursor);
            info!(pid = done.id(), time = self.time, "Process completed");
            report.completed = Some(done.id());
            self.completed.push(done.id());
        }
        Ok(())
    }
}
