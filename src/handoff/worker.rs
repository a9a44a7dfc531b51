/*!
 * Hand-off Worker
 *
 * One worker per thread. A worker waits for its parity's signal, writes one
 * line from its private buffer, then posts the other parity's signal:
 *
 * `Created → Waiting → Writing → Signalling → Terminated`
 *
 * Any failure moves the worker to `Failed` and closes the shared state so no
 * other worker is left waiting for a hand-off that will never come.
 */

use super::config::HandoffConfig;
use super::output::OutputSink;
use super::shared::SharedState;
use crate::core::errors::{HandoffError, HandoffResult};
use crate::core::sync::SignalError;
use smartstring::alias::String as SmartString;
use std::fmt;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Parity of a worker index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    #[inline]
    pub fn of(index: usize) -> Self {
        if index % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Word a worker of this parity prints
    pub const fn word(&self) -> &'static str {
        match self {
            Parity::Even => "hello",
            Parity::Odd => "world",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    /// Blocked on the turn signal
    Waiting,
    /// Holds the turn, writing its line
    Writing,
    /// Posting the next signal
    Signalling,
    Terminated,
    Failed,
}

/// Per-worker context, exclusively owned by one thread
pub struct WorkerContext<'a> {
    index: usize,
    parity: Parity,
    shared: &'a SharedState,
    /// Private scratch buffer, never shared with another worker
    message: SmartString,
    state: WorkerState,
}

impl<'a> WorkerContext<'a> {
    pub fn new(index: usize, shared: &'a SharedState) -> Self {
        Self {
            index,
            parity: Parity::of(index),
            shared,
            message: SmartString::new(),
            state: WorkerState::Created,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Contents of the private message buffer
    pub fn message(&self) -> &str {
        &self.message
    }

    fn transition(&mut self, next: WorkerState) {
        trace!(index = self.index, from = ?self.state, to = ?next, "worker state");
        self.state = next;
    }

    /// Run the worker to completion
    ///
    /// On failure the shared state is closed before returning, which cancels
    /// every worker still waiting.
    pub fn run<S>(&mut self, sink: &S, config: &HandoffConfig) -> HandoffResult<()>
    where
        S: OutputSink + ?Sized,
    {
        let result = self.run_steps(sink, config);

        match &result {
            Ok(()) => self.transition(WorkerState::Terminated),
            Err(e) => {
                self.transition(WorkerState::Failed);
                if !e.is_cancellation() {
                    debug!(index = self.index, error = %e, "worker failed, cancelling run");
                    self.shared.close();
                }
            }
        }

        result
    }

    fn run_steps<S>(&mut self, sink: &S, config: &HandoffConfig) -> HandoffResult<()>
    where
        S: OutputSink + ?Sized,
    {
        let index = self.index;

        self.transition(WorkerState::Waiting);
        let waited = Instant::now();
        let turn = self.shared.turn_signal(self.parity);
        turn.wait(config.wait_timeout)
            .map_err(|e| match e {
                SignalError::Timeout => {
                    let waited_ms = waited.elapsed().as_millis() as u64;
                    debug!(
                        index,
                        waited_ms,
                        still_waiting = turn.waiter_count(),
                        strategy = turn.strategy_name(),
                        "no hand-off arrived"
                    );
                    HandoffError::WorkerStalled { index, waited_ms }
                }
                SignalError::Cancelled => HandoffError::WorkerCancelled { index },
                SignalError::Saturated => HandoffError::HandoffViolation {
                    index,
                    reason: e.to_string(),
                },
            })?;

        self.transition(WorkerState::Writing);
        self.message.clear();
        self.message.push_str(self.parity.word());
        let line = format!("{}: {}!", index, self.message);
        sink.write_line(&line)
            .map_err(|e| HandoffError::OutputFailed {
                index,
                reason: e.to_string(),
            })?;

        self.transition(WorkerState::Signalling);
        if config.faults.drop_handoff_at == Some(index) {
            warn!(index, "dropping hand-off (injected fault)");
            return Ok(());
        }

        self.shared
            .next_signal(self.parity)
            .post()
            .map_err(|e| match e {
                SignalError::Cancelled => HandoffError::WorkerCancelled { index },
                other => HandoffError::HandoffViolation {
                    index,
                    reason: other.to_string(),
                },
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::SyncConfig;
    use crate::handoff::output::MemorySink;
    use std::io;
    use std::time::Duration;

    struct BrokenSink;

    impl OutputSink for BrokenSink {
        fn write_line(&self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_parity_words() {
        assert_eq!(Parity::of(0), Parity::Even);
        assert_eq!(Parity::of(7), Parity::Odd);
        assert_eq!(Parity::Even.word(), "hello");
        assert_eq!(Parity::Odd.word(), "world");
        assert_eq!(Parity::Odd.to_string(), "odd");
    }

    #[test]
    fn test_single_even_worker_runs_and_hands_off() {
        let shared = SharedState::new(1, &SyncConfig::default());
        let sink = MemorySink::new();
        let mut worker = WorkerContext::new(0, &shared);
        assert_eq!(worker.state(), WorkerState::Created);

        worker.run(&sink, &HandoffConfig::new(1)).unwrap();

        assert_eq!(worker.state(), WorkerState::Terminated);
        assert_eq!(worker.message(), "hello");
        assert_eq!(sink.lines(), vec!["0: hello!"]);
        assert_eq!(shared.current_turn(), Some(Parity::Odd));
    }

    #[test]
    fn test_odd_worker_stalls_without_handoff() {
        let shared = SharedState::new(2, &SyncConfig::default());
        let sink = MemorySink::new();
        let config = HandoffConfig::new(2).with_wait_timeout(Duration::from_millis(20));
        let mut worker = WorkerContext::new(1, &shared);

        let err = worker.run(&sink, &config).unwrap_err();

        assert!(matches!(err, HandoffError::WorkerStalled { index: 1, .. }));
        assert_eq!(worker.state(), WorkerState::Failed);
        assert!(sink.is_empty());
        assert!(shared.is_closed());
    }

    #[test]
    fn test_output_failure_closes_shared_state() {
        let shared = SharedState::new(1, &SyncConfig::default());
        let mut worker = WorkerContext::new(0, &shared);

        let err = worker.run(&BrokenSink, &HandoffConfig::new(1)).unwrap_err();

        assert!(matches!(err, HandoffError::OutputFailed { index: 0, .. }));
        assert!(shared.is_closed());
    }

    #[test]
    fn test_cancelled_worker_does_not_print() {
        let shared = SharedState::new(1, &SyncConfig::default());
        shared.close();
        let sink = MemorySink::new();
        let mut worker = WorkerContext::new(0, &shared);

        let err = worker.run(&sink, &HandoffConfig::new(1)).unwrap_err();

        assert_eq!(err, HandoffError::WorkerCancelled { index: 0 });
        assert!(sink.is_empty());
    }
}
