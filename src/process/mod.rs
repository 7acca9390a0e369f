/*!
 * Process Module
 * Simulated processes and their lifecycle
 */

mod lifecycle;
pub mod types;

// Re-export for convenience
pub use types::{Process, ProcessError, ProcessResult, ProcessSpec, ProcessState};
