/*!
 * Synchronization Traits
 *
 * Core abstractions for binary wait/post signals.
 *
 * # Design: Roles Instead of Ownership
 *
 * A signal holds at most one permit. `acquire` consumes it, `release` makes it
 * available again. Unlike a mutex, the thread that releases is never required
 * to be the thread that acquired, so a permit can be handed from one worker to
 * another. `HandoffSignal` uses enum dispatch over these implementations; the
 * trait keeps the strategies interchangeable in tests and benchmarks.
 */

use std::time::Duration;

/// Result of a release or close operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// Permit stored, nobody was waiting
    NoWaiters,
    /// A permit was already pending, the release had no effect
    Saturated,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters | WakeResult::Saturated => 0,
        }
    }
}

/// Outcome of a blocking acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The permit was consumed by the caller
    Acquired,
    /// The timeout elapsed before a permit was posted
    TimedOut,
    /// The signal was closed while (or before) waiting
    Closed,
}

/// Strategy for a binary signal
///
/// Implementations must be:
/// - **Thread-safe**: any thread may acquire, release or close
/// - **Lossless**: a release that happens before the acquire is not lost
/// - **Binary**: at most one permit is ever stored
pub trait SignalStrategy: Send + Sync {
    /// Block until a permit is available (or timeout / close) and consume it
    fn acquire(&self, timeout: Option<Duration>) -> AcquireOutcome;

    /// Consume a permit if one is available, without blocking
    fn try_acquire(&self) -> bool;

    /// Store a permit and wake one waiter
    ///
    /// Returns `Saturated` if a permit was already pending.
    fn release(&self) -> WakeResult;

    /// Close the signal, waking every waiter with `Closed`
    fn close(&self) -> WakeResult;

    /// Whether a permit is currently pending
    fn is_available(&self) -> bool;

    /// Whether the signal has been closed
    fn is_closed(&self) -> bool;

    /// Get approximate count of blocked waiters (for diagnostics)
    fn waiter_count(&self) -> usize {
        0 // Default: unknown
    }

    /// Get strategy name for debugging
    fn name(&self) -> &'static str;
}
