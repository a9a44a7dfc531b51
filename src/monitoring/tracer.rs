/*!
 * Structured Tracing
 * Structured tracing for hand-off runs and workers using the tracing crate
 *
 * Features:
 * - Run IDs for correlating every worker of one run
 * - JSON-formatted logs for structured parsing
 * - Per-worker spans recording parity, result and duration
 * - All output goes to stderr so stdout only carries worker lines
 */

use std::time::Instant;
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Environment variable switching tracing output to JSON
pub const TRACE_JSON_ENV: &str = "HANDOFF_TRACE_JSON";

/// Workers that hold up the run longer than this are reported at warn level
const SLOW_WORKER_MS: u128 = 100;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: warn)
/// - HANDOFF_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling this more than once is harmless; later calls keep the first subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Generate a unique run ID for correlating worker logs
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Span covering one worker from creation to termination
pub struct WorkerSpan {
    span: tracing::Span,
    start: Instant,
    index: usize,
}

impl WorkerSpan {
    pub fn new(run_id: Uuid, index: usize, parity: &'static str) -> Self {
        let span = span!(
            Level::DEBUG,
            "worker",
            run_id = %run_id,
            index = index,
            parity = parity,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            index,
        }
    }

    /// Enter the span context for the calling thread
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Record the worker result
    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    /// Record an error
    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }
}

impl Drop for WorkerSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_WORKER_MS {
            warn!(
                index = self.index,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow worker detected"
            );
        } else {
            debug!(
                index = self.index,
                duration_us = duration.as_micros() as u64,
                "worker finished"
            );
        }
    }
}
