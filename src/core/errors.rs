/*!
 * Error Types
 * Top-level error aggregating every subsystem, with miette diagnostics
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::memory::{AllocationError, MemoryError};
pub use crate::process::ProcessError;
pub use crate::scheduler::SchedulerError;
pub use crate::workload::WorkloadError;

/// Simulator error
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Workload error: {0}")]
    #[diagnostic(transparent)]
    Workload(#[from] WorkloadError),

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(
        code(memsim::io_error),
        help("Check that the path exists and is writable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    #[diagnostic(code(memsim::serialization_error))]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(memsim::invalid_input),
        help("Press enter for a single step, or type a positive number of steps.")
    )]
    InvalidInput(String),
}

/// Result type for simulator operations
pub type SimResult<T> = std::result::Result<T, SimError>;
