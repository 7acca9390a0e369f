/*!
 * Admission
 * Capacity checks and the coalesce/compact retry ladder
 */

use super::types::{
    Admission, CapacityExceeded, DefragEvent, DefragKind, Recovery, SchedulerError,
    SchedulerResult,
};
use crate::core::types::{Pid, Size, Tick};
use crate::memory::{ManagedMemory, MemoryError};
use crate::process::Process;
use tracing::{error, info, warn};

/// Try to give `process` a block
///
/// Demand above total capacity is a permanent rejection; demand above current
/// free capacity defers the process. Otherwise allocation is retried after a
/// coalesce and then after a compaction, each pass recorded in `defrag`.
/// Failing after compaction means the partition is corrupt.
pub(super) fn admit<M>(
    process: &mut Process,
    memory: &mut M,
    now: Tick,
    defrag: &mut Vec<DefragEvent>,
) -> SchedulerResult<Admission>
where
    M: ManagedMemory + ?Sized,
{
    let pid = process.id();
    let demand = process.memory_demand();
    let capacity = memory.capacity();

    if demand > capacity {
        process.reject()?;
        warn!(
            pid,
            demand,
            capacity,
            time = now,
            "Rejected: demand exceeds total capacity"
        );
        return Ok(Admission::Rejected(CapacityExceeded {
            pid,
            demand,
            capacity,
        }));
    }

    let free = memory.free_capacity();
    if demand > free {
        return Ok(Admission::Deferred);
    }

    let mut recovery = Recovery::Direct;
    let handle = loop {
        match memory.allocate(demand, pid) {
            Ok(handle) => break handle,
            Err(MemoryError::NoFit { largest_free, .. }) => {
                recovery = match recovery {
                    Recovery::Direct => {
                        info!(
                            pid,
                            demand,
                            largest_free,
                            "No block large enough, coalescing memory"
                        );
                        defrag.push(repair(memory, DefragKind::Coalesce, pid, demand));
                        Recovery::Coalesced
                    }
                    Recovery::Coalesced => {
                        info!(
                            pid,
                            demand,
                            largest_free,
                            "No block large enough, compacting memory"
                        );
                        defrag.push(repair(memory, DefragKind::Compact, pid, demand));
                        Recovery::Compacted
                    }
                    Recovery::Compacted => {
                        error!(
                            pid,
                            demand,
                            free,
                            time = now,
                            "Allocation failed after compaction"
                        );
                        return Err(SchedulerError::InvariantViolation {
                            pid,
                            demand,
                            free,
                            time: now,
                        });
                    }
                };
            }
            Err(e) => return Err(e.into()),
        }
    };

    process.start(handle)?;
    info!(
        pid,
        demand,
        time = now,
        extent = ?memory.extent_of(handle),
        recovery = ?recovery,
        "Started process"
    );
    Ok(Admission::Admitted(recovery))
}

/// Run one repair pass and capture the layout on either side of it
fn repair<M>(memory: &mut M, kind: DefragKind, pid: Pid, demand: Size) -> DefragEvent
where
    M: ManagedMemory + ?Sized,
{
    let before = memory.layout();
    match kind {
        DefragKind::Coalesce => memory.coalesce(),
        DefragKind::Compact => memory.compact(),
    }
    DefragEvent {
        kind,
        pid,
        demand,
        before,
        after: memory.layout(),
    }
}
