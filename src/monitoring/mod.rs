/*!
 * Monitoring
 * Structured tracing setup and spans
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, WorkerSpan, TRACE_JSON_ENV};
