/*!
 * Hand-off Barrier
 *
 * N worker threads print "hello" (even index) or "world" (odd index), strictly
 * alternating. The right to print is handed from worker to worker through two
 * binary signals instead of two mutexes, so no worker ever releases something
 * it does not own.
 */

mod barrier;
mod config;
mod output;
mod shared;
mod worker;

pub use barrier::{HandoffBarrier, RunReport};
pub use config::{detect_worker_count, parse_worker_count, FaultInjection, HandoffConfig};
pub use output::{MemorySink, OutputSink, StdoutSink};
pub use shared::SharedState;
pub use worker::{Parity, WorkerContext, WorkerState};
