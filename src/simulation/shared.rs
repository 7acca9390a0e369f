/*!
 * Shared Simulation
 * Thread-safe handle that serializes the simulation per tick
 *
 * Coalescing and compaction rewrite the whole partition, so a tick's
 * admission and execution passes always run under one exclusive lock.
 * Multi-tick requests take the lock once per tick, letting concurrent
 * callers interleave between ticks but never inside one.
 */

use super::{RunReport, Simulation, Snapshot, Summary};
use crate::scheduler::{SchedulerResult, StepReport};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a simulation shared between threads
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    pub fn step_once(&self) -> SchedulerResult<StepReport> {
        self.inner.lock().step_once()
    }

    /// Run up to `steps` ticks, locking once per tick
    ///
    /// Unlike `Simulation::run` the lock is released between ticks, so other
    /// handles can step or snapshot in between.
    pub fn run(&self, steps: u64) -> SchedulerResult<RunReport> {
        let mut report = RunReport::default();
        for _ in 0..steps {
            let mut sim = self.inner.lock();
            if sim.is_complete() {
                break;
            }
            report.steps.push(sim.step_once()?);
        }

        let sim = self.inner.lock();
        report.time = sim.time();
        report.complete = sim.is_complete();
        Ok(report)
    }

    pub fn is_complete(&self) -> bool {
        self.inner.lock().is_complete()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    pub fn summary(&self) -> Summary {
        self.inner.lock().summary()
    }

    /// Run a closure against the simulation under the lock
    pub fn with<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.inner.lock())
    }
}
