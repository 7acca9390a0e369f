/*!
 * Workload Generator
 * Random process descriptors for demos and benchmarks
 */

use super::{to_csv, WorkloadError, WorkloadResult};
use crate::core::limits::{
    WORKLOAD_ARRIVAL_RANGE, WORKLOAD_MEMORY_RANGE, WORKLOAD_PROCESS_RANGE, WORKLOAD_ROUNDING,
    WORKLOAD_RUN_RANGE,
};
use crate::core::types::{Pid, Size, Tick};
use crate::process::ProcessSpec;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

/// Inclusive value ranges for generated workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadParams {
    pub processes: (u32, u32),
    pub memory: (Size, Size),
    pub arrival: (Tick, Tick),
    pub run_length: (Tick, Tick),
    /// Memory, arrival and run length are rounded down to a multiple of this
    pub rounding: u64,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            processes: WORKLOAD_PROCESS_RANGE,
            memory: WORKLOAD_MEMORY_RANGE,
            arrival: WORKLOAD_ARRIVAL_RANGE,
            run_length: WORKLOAD_RUN_RANGE,
            rounding: WORKLOAD_ROUNDING,
        }
    }
}

#[inline]
fn round_down(value: u64, step: u64) -> u64 {
    if step <= 1 {
        value
    } else {
        value / step * step
    }
}

/// Draw one workload; IDs are assigned in line order starting at zero
pub fn generate_workload<R>(rng: &mut R, params: &WorkloadParams) -> Vec<ProcessSpec>
where
    R: Rng + ?Sized,
{
    let count = rng.gen_range(params.processes.0..=params.processes.1);

    (0..count)
        .map(|id: Pid| {
            let memory = rng.gen_range(params.memory.0..=params.memory.1) as u64;
            let arrival = rng.gen_range(params.arrival.0..=params.arrival.1);
            let run_length = rng.gen_range(params.run_length.0..=params.run_length.1);
            ProcessSpec::new(
                id,
                round_down(memory, params.rounding) as Size,
                round_down(arrival, params.rounding),
                round_down(run_length, params.rounding),
            )
        })
        .collect()
}

/// Write `files` generated workloads as `demo_<i>.txt` under `dir`
pub fn write_workload_files<R: Rng + ?Sized>(
    rng: &mut R,
    params: &WorkloadParams,
    dir: impl AsRef<Path>,
    files: usize,
) -> WorkloadResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| WorkloadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(files);
    for i in 0..files {
        let path = dir.join(format!("demo_{}.txt", i));
        let specs = generate_workload(rng, params);
        std::fs::write(&path, to_csv(&specs)).map_err(|source| WorkloadError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), processes = specs.len(), "Wrote workload");
        written.push(path);
    }
    Ok(written)
}
