/*!
 * Hand-off Barrier
 *
 * Starts N workers that alternate through two signals: even workers print
 * "hello" and hand off to an odd worker, odd workers print "world" and hand
 * back. The initializing context creates the shared state with only the
 * "hello" permit available, so the first odd worker blocks until an even
 * worker posts.
 *
 * # Lifecycle
 *
 * 1. Validate the configuration (nothing allocated yet)
 * 2. Create the shared state, then allocate every worker context and handle
 * 3. Spawn the workers as scoped threads borrowing the shared state
 * 4. Join every worker; the shared state is dropped after the last join
 *
 * If a thread cannot be created, the barrier closes the shared state so the
 * workers already started wake up cancelled, joins them, and only then
 * reports the failure.
 */

use super::config::HandoffConfig;
use super::output::OutputSink;
use super::shared::SharedState;
use super::worker::WorkerContext;
use crate::core::errors::{HandoffError, HandoffResult};
use crate::core::limits::WORKER_THREAD_PREFIX;
use crate::monitoring::{generate_run_id, WorkerSpan};
use std::io;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: Uuid,
    pub worker_count: usize,
    pub lines_written: usize,
    pub strategy: &'static str,
    pub elapsed: Duration,
}

/// Closes the shared state if the owning worker thread unwinds
struct CloseOnPanic<'a>(&'a SharedState);

impl Drop for CloseOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.close();
        }
    }
}

/// Runs one hand-off round across N worker threads
///
/// # Examples
///
/// ```
/// use handoff_lab::handoff::{HandoffBarrier, HandoffConfig, MemorySink};
///
/// let sink = MemorySink::new();
/// let report = HandoffBarrier::new(HandoffConfig::new(4)).run(&sink).unwrap();
///
/// assert_eq!(report.lines_written, 4);
/// assert!(sink.lines()[0].ends_with("hello!"));
/// ```
#[derive(Debug, Clone)]
pub struct HandoffBarrier {
    config: HandoffConfig,
}

impl HandoffBarrier {
    pub fn new(config: HandoffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HandoffConfig {
        &self.config
    }

    /// Run every worker to completion, writing their lines to `sink`
    pub fn run<S>(&self, sink: &S) -> HandoffResult<RunReport>
    where
        S: OutputSink + ?Sized,
    {
        self.config.validate()?;

        let run_id = generate_run_id();
        let worker_count = self.config.worker_count;
        let span = info_span!("handoff_run", run_id = %run_id, workers = worker_count);
        let _entered = span.enter();
        let start = Instant::now();

        if self.config.faults.is_active() {
            warn!(faults = ?self.config.faults, "fault injection enabled for this run");
        }

        let shared = SharedState::new(worker_count, &self.config.sync);
        let contexts = allocate_contexts(&shared, self.config.faults.handle_limit)?;

        info!(
            strategy = shared.strategy_name(),
            timeout_ms = self.config.wait_timeout.map(|t| t.as_millis() as u64),
            "starting workers"
        );

        let results = self.spawn_and_join(&shared, contexts, sink, run_id)?;

        // First real failure wins; cancellations are only its echo
        let mut lines_written = 0;
        let mut first_error: Option<HandoffError> = None;
        for result in results {
            match result {
                Ok(()) => lines_written += 1,
                Err(e) => {
                    let replace = match &first_error {
                        None => true,
                        Some(current) => current.is_cancellation() && !e.is_cancellation(),
                    };
                    if replace {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            debug!(error = %e, lines_written, "run failed");
            return Err(e);
        }

        debug_assert!(shared.pending_permits() <= 1);

        let report = RunReport {
            run_id,
            worker_count,
            lines_written,
            strategy: shared.strategy_name(),
            elapsed: start.elapsed(),
        };
        info!(
            lines_written,
            elapsed_us = report.elapsed.as_micros() as u64,
            "all workers joined"
        );
        Ok(report)
    }

    fn spawn_and_join<'a, S>(
        &self,
        shared: &'a SharedState,
        contexts: Vec<WorkerContext<'a>>,
        sink: &S,
        run_id: Uuid,
    ) -> HandoffResult<Vec<HandoffResult<()>>>
    where
        S: OutputSink + ?Sized,
    {
        let config = &self.config;
        let worker_count = contexts.len();

        thread::scope(|scope| -> HandoffResult<Vec<HandoffResult<()>>> {
            let mut handles = Vec::new();
            handles
                .try_reserve_exact(worker_count)
                .map_err(|_| HandoffError::HandleAllocationFailed {
                    requested: worker_count,
                })?;

            for mut context in contexts {
                let index = context.index();

                let spawned = if config.faults.fail_spawn_at == Some(index) {
                    Err(io::Error::new(
                        io::ErrorKind::Other,
                        "thread creation refused (injected fault)",
                    ))
                } else {
                    thread::Builder::new()
                        .name(format!("{}-{}", WORKER_THREAD_PREFIX, index))
                        .spawn_scoped(scope, move || {
                            let _close_on_panic = CloseOnPanic(shared);
                            let span = WorkerSpan::new(run_id, index, context.parity().as_str());
                            let _entered = span.enter();

                            let result = context.run(sink, config);
                            match &result {
                                Ok(()) => span.record_result(true),
                                Err(e) => span.record_error(&e.to_string()),
                            }
                            result
                        })
                };

                match spawned {
                    Ok(handle) => handles.push((index, handle)),
                    Err(e) => {
                        debug!(index, error = %e, "Could not create thread");
                        shared.close();
                        for (started, handle) in handles {
                            let outcome = handle.join();
                            debug!(index = started, ?outcome, "joined after creation failure");
                        }
                        return Err(HandoffError::WorkerCreationFailed {
                            index,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            Ok(handles
                .into_iter()
                .map(|(index, handle)| {
                    handle
                        .join()
                        .unwrap_or(Err(HandoffError::WorkerPanicked { index }))
                })
                .collect())
        })
    }
}

/// Allocate one context per worker, or fail before any worker exists
fn allocate_contexts(
    shared: &SharedState,
    handle_limit: Option<usize>,
) -> HandoffResult<Vec<WorkerContext<'_>>> {
    let requested = shared.worker_count();

    if handle_limit.is_some_and(|limit| requested > limit) {
        return Err(HandoffError::HandleAllocationFailed { requested });
    }

    let mut contexts = Vec::new();
    contexts
        .try_reserve_exact(requested)
        .map_err(|_| HandoffError::HandleAllocationFailed { requested })?;
    contexts.extend((0..requested).map(|index| WorkerContext::new(index, shared)));

    Ok(contexts)
}
