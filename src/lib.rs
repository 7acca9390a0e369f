/*!
 * memsim
 * Time-stepped memory allocator and round-robin process scheduler simulator
 *
 * A fixed-capacity address space is partitioned into blocks and handed out
 * to simulated processes by one of four placement strategies. A discrete
 * clock admits arriving processes (coalescing, then compacting when
 * fragmentation blocks an allocation) and runs one process per tick.
 */

pub mod config;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod workload;

// Re-exports
pub use config::{ConfigError, SimConfig};
pub use core::errors::{SimError, SimResult};
pub use core::types::{Pid, Size, Tick};
pub use memory::{
    Allocator, BlockExtent, BlockHandle, BlockInfo, Defragmenter, ManagedMemory, MemoryError,
    MemoryInfo, MemoryManager, MemoryStats, Strategy,
};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessSpec, ProcessState};
pub use scheduler::{
    CapacityExceeded, DefragEvent, DefragKind, Quantum, Scheduler, SchedulerError, StepReport,
};
pub use simulation::{RunReport, SharedSimulation, Simulation, Snapshot, Summary};
pub use workload::{
    generate_workload, load_workload, parse_workload, WorkloadError, WorkloadParams,
};
