/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults and magic numbers, grouped by domain.
 */

use super::types::{Size, Tick};

// =============================================================================
// MEMORY
// =============================================================================

/// Default address-space capacity when none is configured
pub const DEFAULT_CAPACITY: Size = 1000;

/// Units of memory per character cell in the rendered block bar
pub const DEFAULT_RENDER_SCALE: Size = 10;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Time advanced per tick, and the run time granted to one process per tick
pub const DEFAULT_QUANTUM: Tick = 10;

/// Ticks executed per request when the caller does not ask for more
pub const DEFAULT_STEP_BATCH: u64 = 1;

// =============================================================================
// SYNTHETIC WORKLOADS
// =============================================================================

/// Processes per generated workload file
pub const WORKLOAD_PROCESS_RANGE: (u32, u32) = (10, 20);

/// Memory demand per generated process
pub const WORKLOAD_MEMORY_RANGE: (Size, Size) = (10, 500);

/// Arrival time per generated process
pub const WORKLOAD_ARRIVAL_RANGE: (Tick, Tick) = (0, 1000);

/// Run length per generated process
pub const WORKLOAD_RUN_RANGE: (Tick, Tick) = (10, 200);

/// Generated values are rounded down to a multiple of this
pub const WORKLOAD_ROUNDING: u64 = 10;
