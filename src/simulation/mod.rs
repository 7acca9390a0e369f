/*!
 * Simulation
 * Allocator and scheduler driven together, tick by tick
 */

mod shared;
mod snapshot;

pub use shared::SharedSimulation;
pub use snapshot::{ActiveProcess, Snapshot};

use crate::config::SimConfig;
use crate::core::errors::SimResult;
use crate::core::types::{Pid, Tick};
use crate::memory::{MemoryInfo, MemoryManager};
use crate::monitoring::span_batch;
use crate::process::ProcessSpec;
use crate::scheduler::{Scheduler, SchedulerResult, StepReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Outcome of a batch of ticks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    /// Clock after the last executed tick
    pub time: Tick,
    pub complete: bool,
}

impl RunReport {
    pub fn executed(&self) -> usize {
        self.steps.len()
    }
}

/// Final figures once a workload has drained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub time: Tick,
    pub completed: Vec<Pid>,
    pub rejected: Vec<Pid>,
    pub coalesce_count: u64,
    pub compact_count: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final system time: {}", self.time)?;
        writeln!(f, "Number of coalesce operations performed: {}", self.coalesce_count)?;
        write!(f, "Number of compact operations performed: {}", self.compact_count)
    }
}

/// A configured memory manager plus the scheduler feeding it
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    memory: MemoryManager,
    scheduler: Scheduler,
}

impl Simulation {
    pub fn new(config: SimConfig, specs: Vec<ProcessSpec>) -> SimResult<Self> {
        config.validate()?;
        let memory = MemoryManager::new(config.capacity, config.strategy)?;
        let scheduler = Scheduler::new(config.quantum()?, specs)?;

        info!(
            capacity = config.capacity,
            strategy = %config.strategy,
            quantum = config.quantum,
            processes = scheduler.pending().len(),
            "Simulation ready"
        );
        Ok(Self {
            config,
            memory,
            scheduler,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn time(&self) -> Tick {
        self.scheduler.time()
    }

    pub fn is_complete(&self) -> bool {
        self.scheduler.is_complete()
    }

    pub fn step_once(&mut self) -> SchedulerResult<StepReport> {
        self.scheduler.step_once(&mut self.memory)
    }

    /// Run up to `steps` ticks; stops early once the workload is complete
    pub fn run(&mut self, steps: u64) -> SchedulerResult<RunReport> {
        let span = span_batch(steps);
        let _guard = span.enter();

        let steps = self.scheduler.run(&mut self.memory, steps)?;
        span.record("executed", steps.len() as u64);

        Ok(RunReport {
            steps,
            time: self.time(),
            complete: self.is_complete(),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        let stats = self.memory.stats();
        let active = self
            .scheduler
            .active()
            .iter()
            .map(|p| ActiveProcess {
                pid: p.id(),
                extent: p.lease().and_then(|h| self.memory.extent_of(h)),
                remaining: p.remaining_time(),
            })
            .collect();

        Snapshot {
            time: self.scheduler.time(),
            capacity: stats.capacity,
            strategy: self.memory.strategy(),
            free: stats.free,
            allocated: stats.allocated,
            blocks: self.memory.layout(),
            active,
            pending: self.scheduler.pending().len(),
            coalesce_count: self.memory.coalesce_count(),
            compact_count: self.memory.compact_count(),
            rejected: self.scheduler.rejected().iter().map(|r| r.pid).collect(),
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            time: self.scheduler.time(),
            completed: self.scheduler.completed().to_vec(),
            rejected: self.scheduler.rejected().iter().map(|r| r.pid).collect(),
            coalesce_count: self.memory.coalesce_count(),
            compact_count: self.memory.compact_count(),
        }
    }
}
