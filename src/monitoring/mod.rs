/*!
 * Monitoring Module
 * Tracing setup and spans
 */

pub mod tracer;

pub use tracer::{init_tracing, span_batch, span_tick, TRACE_JSON_ENV};
