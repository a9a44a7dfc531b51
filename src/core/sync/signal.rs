/*!
 * Hand-off Signal
 *
 * High-level binary semaphore used to pass the right to proceed from one
 * thread to another. Automatically selects the strategy based on platform
 * and configuration.
 *
 * # Design: Enum Dispatch
 *
 * Instead of `Arc<dyn SignalStrategy>`, the strategies are wrapped in an enum
 * so every call is a direct, inlinable match.
 */

use super::condvar::CondvarSignal;
use super::config::{StrategyType, SyncConfig};
use super::futex::FutexSignal;
use super::spinwait::SpinSignal;
use super::traits::{AcquireOutcome, SignalStrategy, WakeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for signal operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal operation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalError {
    #[error("Wait operation timed out")]
    Timeout,

    #[error("Signal was closed")]
    Cancelled,

    #[error("Signal already holds a permit")]
    Saturated,
}

/// Signal strategy implementation (enum dispatch)
enum SignalImpl {
    Futex(FutexSignal),
    Condvar(CondvarSignal),
    SpinWait(SpinSignal),
}

/// Forward a call to whichever strategy is active
macro_rules! dispatch {
    ($signal:expr, $s:ident => $call:expr) => {
        match &$signal.inner {
            SignalImpl::Futex($s) => $call,
            SignalImpl::Condvar($s) => $call,
            SignalImpl::SpinWait($s) => $call,
        }
    };
}

/// Reusable binary semaphore with explicit wait/post roles
///
/// Any thread may `post`; the thread that consumed the previous permit has
/// no special standing.
///
/// # Examples
///
/// ```
/// use handoff_lab::core::sync::{HandoffSignal, SyncConfig};
/// use std::time::Duration;
///
/// let signal = HandoffSignal::new(&SyncConfig::default(), false);
///
/// // Post from one thread...
/// signal.post().unwrap();
///
/// // ...and consume from another
/// assert!(signal.wait(Some(Duration::from_secs(1))).is_ok());
/// ```
pub struct HandoffSignal {
    inner: SignalImpl,
}

impl HandoffSignal {
    /// Create a new signal with the specified configuration
    pub fn new(config: &SyncConfig, posted: bool) -> Self {
        let inner = match config.select_strategy() {
            StrategyType::Condvar => SignalImpl::Condvar(CondvarSignal::new(posted)),
            StrategyType::SpinWait => SignalImpl::SpinWait(SpinSignal::new(
                posted,
                config.spin_duration,
                config.max_spins,
            )),
            // Auto is resolved by select_strategy
            StrategyType::Futex | StrategyType::Auto => {
                SignalImpl::Futex(FutexSignal::new(posted))
            }
        };

        Self { inner }
    }

    /// Wait for the permit with optional timeout and consume it
    #[inline]
    pub fn wait(&self, timeout: Option<Duration>) -> SignalResult<()> {
        match dispatch!(self, s => s.acquire(timeout)) {
            AcquireOutcome::Acquired => Ok(()),
            AcquireOutcome::TimedOut => Err(SignalError::Timeout),
            AcquireOutcome::Closed => Err(SignalError::Cancelled),
        }
    }

    /// Non-blocking wait
    #[inline]
    pub fn try_wait(&self) -> SignalResult<()> {
        if dispatch!(self, s => s.try_acquire()) {
            Ok(())
        } else if self.is_closed() {
            Err(SignalError::Cancelled)
        } else {
            Err(SignalError::Timeout)
        }
    }

    /// Post the permit, waking one waiter
    ///
    /// Posting a signal that already holds a permit is an error: the permit
    /// count of a binary signal never exceeds one.
    #[inline]
    pub fn post(&self) -> SignalResult<WakeResult> {
        if self.is_closed() {
            return Err(SignalError::Cancelled);
        }
        match dispatch!(self, s => s.release()) {
            WakeResult::Saturated => Err(SignalError::Saturated),
            other => Ok(other),
        }
    }

    /// Close the signal; every current and future waiter gets `Cancelled`
    pub fn close(&self) -> WakeResult {
        dispatch!(self, s => s.close())
    }

    /// Whether a permit is pending
    #[inline]
    pub fn is_posted(&self) -> bool {
        dispatch!(self, s => s.is_available())
    }

    /// Whether the signal has been closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        dispatch!(self, s => s.is_closed())
    }

    /// Get approximate count of blocked waiters (for diagnostics)
    #[inline]
    pub fn waiter_count(&self) -> usize {
        dispatch!(self, s => s.waiter_count())
    }

    /// Get the name of the active strategy
    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        dispatch!(self, s => s.name())
    }
}

impl std::fmt::Debug for HandoffSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffSignal")
            .field("strategy", &self.strategy_name())
            .field("posted", &self.is_posted())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn all_configs() -> Vec<SyncConfig> {
        [
            StrategyType::Futex,
            StrategyType::Condvar,
            StrategyType::SpinWait,
            StrategyType::Auto,
        ]
        .into_iter()
        .map(SyncConfig::with_strategy)
        .collect()
    }

    #[test]
    fn test_signal_basic() {
        for config in all_configs() {
            let signal = Arc::new(HandoffSignal::new(&config, false));
            let signal_clone = signal.clone();

            let handle = thread::spawn(move || signal_clone.wait(Some(Duration::from_secs(1))));

            thread::sleep(Duration::from_millis(50));
            signal.post().unwrap();

            assert!(handle.join().unwrap().is_ok(), "{}", signal.strategy_name());
        }
    }

    #[test]
    fn test_signal_timeout() {
        let signal = HandoffSignal::new(&SyncConfig::default(), false);
        let start = Instant::now();
        let result = signal.wait(Some(Duration::from_millis(50)));

        assert_eq!(result, Err(SignalError::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_double_post_is_saturated() {
        for config in all_configs() {
            let signal = HandoffSignal::new(&config, true);
            assert_eq!(signal.post(), Err(SignalError::Saturated));
            assert!(signal.try_wait().is_ok());
            assert_eq!(signal.try_wait(), Err(SignalError::Timeout));
        }
    }

    #[test]
    fn test_close_cancels_waiters_and_posts() {
        for config in all_configs() {
            let signal = Arc::new(HandoffSignal::new(&config, false));
            let signal_clone = signal.clone();

            let handle = thread::spawn(move || signal_clone.wait(None));

            thread::sleep(Duration::from_millis(50));
            signal.close();

            assert_eq!(handle.join().unwrap(), Err(SignalError::Cancelled));
            assert_eq!(signal.post(), Err(SignalError::Cancelled));
            assert_eq!(signal.try_wait(), Err(SignalError::Cancelled));
        }
    }

    #[test]
    fn test_post_from_non_waiting_thread() {
        // The poster never waited on this signal: no ownership is involved
        let signal = Arc::new(HandoffSignal::new(&SyncConfig::default(), false));
        let poster = signal.clone();

        thread::spawn(move || poster.post()).join().unwrap().unwrap();
        assert!(signal.is_posted());
        assert!(signal.wait(Some(Duration::ZERO)).is_ok());
    }
}
