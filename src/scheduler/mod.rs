/*!
 * Scheduler Module
 * Admission and round-robin execution over a simulated clock
 */

mod admission;
pub mod round_robin;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use round_robin::Scheduler;
pub use types::{
    Admission, CapacityExceeded, DefragEvent, DefragKind, Quantum, Recovery, SchedulerError,
    SchedulerResult, StepReport,
};
