/*!
 * Tracing
 * Structured logging for the simulator using the tracing crate
 *
 * Library code only emits events; installing a subscriber is the binary's
 * (or a test's) decision.
 */

use tracing::{info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable that switches the fmt layer to JSON output
pub const TRACE_JSON_ENV: &str = "MEMSIM_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: `default_directive`)
/// - MEMSIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` without touching anything when a global subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);

    let json = json_requested();
    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::NONE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = json, "Structured tracing initialized");
    }
    installed
}

fn json_requested() -> bool {
    std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Span covering one simulation tick
pub fn span_tick(time: u64) -> Span {
    span!(Level::DEBUG, "tick", time)
}

/// Span covering one batch of ticks requested by the driver
pub fn span_batch(steps: u64) -> Span {
    span!(Level::INFO, "batch", steps, executed = tracing::field::Empty)
}
