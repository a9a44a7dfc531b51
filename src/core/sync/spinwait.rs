/*!
 * Adaptive Spin Signal with Exponential Backoff
 *
 * Optimized for hand-offs where the next permit usually arrives within
 * microseconds. Spins on `try_acquire` with a three-phase backoff, then
 * parks on a condvar signal for the remainder of the wait:
 *
 * 1. **Tight spin phase** (0-10 iterations): Just `spin_loop()` hint
 * 2. **Yield phase** (10-50 iterations): `yield_now()` every iteration
 * 3. **Sleep phase** (50+ iterations): Exponentially increasing sleep
 */

use super::condvar::CondvarSignal;
use super::traits::{AcquireOutcome, SignalStrategy, WakeResult};
use crate::core::limits::{SPIN_MAX_BACKOFF_NS, SPIN_TIGHT_ITERATIONS, SPIN_YIELD_ITERATIONS};
use std::thread;
use std::time::{Duration, Instant};

/// Adaptive spin-then-park binary signal
pub struct SpinSignal {
    /// Holds the permit; parks waiters once spinning gives up
    fallback: CondvarSignal,
    /// Spin duration before falling back
    spin_duration: Duration,
    /// Maximum spin iterations
    max_spins: u32,
}

impl SpinSignal {
    /// Create a new spin signal
    pub fn new(posted: bool, spin_duration: Duration, max_spins: u32) -> Self {
        Self {
            fallback: CondvarSignal::new(posted),
            spin_duration,
            max_spins,
        }
    }

    /// Spin until `check` yields an outcome or the spin budget runs out
    fn spin(
        &self,
        deadline: Option<Instant>,
        check: impl Fn() -> Option<AcquireOutcome>,
    ) -> Option<AcquireOutcome> {
        let start = Instant::now();
        let mut spin_count = 0u32;
        let mut backoff_ns = 1u64;

        loop {
            if let Some(outcome) = check() {
                return Some(outcome);
            }

            if start.elapsed() >= self.spin_duration || spin_count >= self.max_spins {
                return None;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }

            if spin_count < SPIN_TIGHT_ITERATIONS {
                std::hint::spin_loop();
            } else if spin_count < SPIN_YIELD_ITERATIONS {
                thread::yield_now();
            } else {
                thread::sleep(Duration::from_nanos(backoff_ns));
                backoff_ns = (backoff_ns * 2).min(SPIN_MAX_BACKOFF_NS);
            }

            spin_count += 1;
        }
    }
}

impl SignalStrategy for SpinSignal {
    fn acquire(&self, timeout: Option<Duration>) -> AcquireOutcome {
        let start = Instant::now();
        let deadline = timeout.map(|t| start + t);

        let spun = self.spin(deadline, || {
            if self.fallback.try_acquire() {
                Some(AcquireOutcome::Acquired)
            } else if self.fallback.is_closed() {
                Some(AcquireOutcome::Closed)
            } else {
                None
            }
        });
        if let Some(outcome) = spun {
            return outcome;
        }

        // Fall back to condvar for longer waits
        let remaining = timeout.map(|t| t.saturating_sub(start.elapsed()));
        self.fallback.acquire(remaining)
    }

    fn try_acquire(&self) -> bool {
        self.fallback.try_acquire()
    }

    fn release(&self) -> WakeResult {
        self.fallback.release()
    }

    fn close(&self) -> WakeResult {
        self.fallback.close()
    }

    fn is_available(&self) -> bool {
        self.fallback.is_available()
    }

    fn is_closed(&self) -> bool {
        self.fallback.is_closed()
    }

    fn waiter_count(&self) -> usize {
        self.fallback.waiter_count()
    }

    fn name(&self) -> &'static str {
        "spinwait"
    }
}
