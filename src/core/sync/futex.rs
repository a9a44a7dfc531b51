/*!
 * Futex-Based Signal
 *
 * Uses parking_lot_core for futex-like operations on all platforms.
 * On Linux, this maps directly to futex syscalls for minimal overhead.
 *
 * # Design
 *
 * The whole signal is one atomic state word (`EMPTY`, `POSTED`, `CLOSED`)
 * and the parking address is the address of that word.
 * - Lock-free fast path: a posted permit is taken with a single CAS
 * - The park validation re-reads the state under the parking-lot bucket lock,
 *   and every release calls `unpark_one`, which takes the same lock, so a
 *   release is never lost
 * - `waiters` is informational only and never gates a wakeup
 */

use super::traits::{AcquireOutcome, SignalStrategy, WakeResult};
use parking_lot_core::{
    park, unpark_all, unpark_one, ParkResult, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN,
};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const EMPTY: u8 = 0;
const POSTED: u8 = 1;
const CLOSED: u8 = 2;

/// Futex-based binary signal
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
pub struct FutexSignal {
    state: AtomicU8,
    waiters: AtomicUsize,
}

impl FutexSignal {
    /// Create a new signal, optionally holding a permit
    pub fn new(posted: bool) -> Self {
        Self {
            state: AtomicU8::new(if posted { POSTED } else { EMPTY }),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Stable parking address for this signal
    #[inline]
    fn addr(&self) -> usize {
        &self.state as *const AtomicU8 as usize
    }

    /// Single attempt to take the permit
    #[inline]
    fn take(&self) -> Option<AcquireOutcome> {
        match self
            .state
            .compare_exchange(POSTED, EMPTY, Ordering::Acquire, Ordering::Acquire)
        {
            Ok(_) => Some(AcquireOutcome::Acquired),
            Err(CLOSED) => Some(AcquireOutcome::Closed),
            Err(_) => None,
        }
    }
}

impl Default for FutexSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SignalStrategy for FutexSignal {
    fn acquire(&self, timeout: Option<Duration>) -> AcquireOutcome {
        let deadline = timeout.map(|d| Instant::now() + d);

        loop {
            if let Some(outcome) = self.take() {
                return outcome;
            }

            self.waiters.fetch_add(1, Ordering::Relaxed);

            // SAFETY: the key is the address of `self.state`, which outlives the
            // park call, and none of the callbacks call back into parking_lot.
            let result = unsafe {
                park(
                    self.addr(),
                    || self.state.load(Ordering::Acquire) == EMPTY,
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    deadline,
                )
            };

            self.waiters.fetch_sub(1, Ordering::Relaxed);

            match result {
                // Woken or state changed before parking: retry the CAS
                ParkResult::Unparked(_) | ParkResult::Invalid => continue,
                ParkResult::TimedOut => {
                    return self.take().unwrap_or(AcquireOutcome::TimedOut);
                }
            }
        }
    }

    fn try_acquire(&self) -> bool {
        matches!(self.take(), Some(AcquireOutcome::Acquired))
    }

    fn release(&self) -> WakeResult {
        match self
            .state
            .compare_exchange(EMPTY, POSTED, Ordering::Release, Ordering::Relaxed)
        {
            Ok(_) => {}
            Err(POSTED) => return WakeResult::Saturated,
            Err(_) => return WakeResult::NoWaiters,
        }

        // Always unpark: `waiters` is only a statistic. The unpark takes the
        // bucket lock that `park` validates under, so a waiter either sees
        // POSTED or is already queued and gets woken.
        // SAFETY: same key as `acquire`; the callback does not touch parking_lot.
        let result = unsafe { unpark_one(self.addr(), |_| DEFAULT_UNPARK_TOKEN) };
        match result.unparked_threads {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn close(&self) -> WakeResult {
        self.state.store(CLOSED, Ordering::Release);

        // SAFETY: same key as `acquire`.
        let unparked = unsafe { unpark_all(self.addr(), DEFAULT_UNPARK_TOKEN) };
        match unparked {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    fn is_available(&self) -> bool {
        self.state.load(Ordering::Acquire) == POSTED
    }

    fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == CLOSED
    }

    fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}
