/*!
 * Condvar-Based Signal
 *
 * Cross-platform binary signal using parking_lot::Condvar for reliability.
 *
 * The permit and the closed flag live under one mutex, so a release that
 * lands between "check permit" and "block" cannot be lost: the waiter only
 * checks and blocks while holding the lock.
 */

use super::traits::{AcquireOutcome, SignalStrategy, WakeResult};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Permit state guarded by the signal mutex
#[derive(Debug, Default)]
struct PermitState {
    permit: bool,
    closed: bool,
}

/// Condvar-based binary signal
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
pub struct CondvarSignal {
    state: Mutex<PermitState>,
    condvar: Condvar,
    waiters: AtomicUsize,
}

impl CondvarSignal {
    /// Create a new signal, optionally holding a permit
    pub fn new(posted: bool) -> Self {
        Self {
            state: Mutex::new(PermitState {
                permit: posted,
                closed: false,
            }),
            condvar: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }
}

impl Default for CondvarSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SignalStrategy for CondvarSignal {
    fn acquire(&self, timeout: Option<Duration>) -> AcquireOutcome {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock();

        loop {
            if state.closed {
                return AcquireOutcome::Closed;
            }
            if state.permit {
                state.permit = false;
                return AcquireOutcome::Acquired;
            }

            self.waiters.fetch_add(1, Ordering::Relaxed);
            let timed_out = match deadline {
                Some(deadline) => self.condvar.wait_until(&mut state, deadline).timed_out(),
                None => {
                    self.condvar.wait(&mut state);
                    false
                }
            };
            self.waiters.fetch_sub(1, Ordering::Relaxed);

            // A release may have raced with the timeout; the loop takes it
            if timed_out && !state.permit && !state.closed {
                return AcquireOutcome::TimedOut;
            }
        }
    }

    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed || !state.permit {
            return false;
        }
        state.permit = false;
        true
    }

    fn release(&self) -> WakeResult {
        let mut state = self.state.lock();
        if state.closed {
            return WakeResult::NoWaiters;
        }
        if state.permit {
            return WakeResult::Saturated;
        }
        state.permit = true;

        if self.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }
        if self.condvar.notify_one() {
            WakeResult::Woken(1)
        } else {
            WakeResult::NoWaiters
        }
    }

    fn close(&self) -> WakeResult {
        let mut state = self.state.lock();
        state.closed = true;
        state.permit = false;

        match self.condvar.notify_all() {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn is_available(&self) -> bool {
        let state = self.state.lock();
        state.permit && !state.closed
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
