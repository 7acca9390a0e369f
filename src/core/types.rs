/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type (assigned by input order)
pub type Pid = u32;

/// Size type for memory operations (abstract memory units)
pub type Size = usize;

/// Simulation time, in abstract time units
pub type Tick = u64;
