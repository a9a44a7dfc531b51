/*!
 * Hand-off Configuration
 *
 * Worker count resolution, signal strategy and fault injection knobs
 */

use crate::core::errors::{HandoffError, HandoffResult};
use crate::core::limits::{FALLBACK_WORKER_COUNT, MAX_WORKERS};
use crate::core::sync::{StrategyType, SyncConfig};
use std::time::Duration;
use tracing::warn;

/// Faults to inject into a run, used to exercise the error paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultInjection {
    /// Refuse worker handle allocation above this many workers
    pub handle_limit: Option<usize>,
    /// Fail thread creation for the worker with this index
    pub fail_spawn_at: Option<usize>,
    /// The worker with this index prints but never posts the next signal
    pub drop_handoff_at: Option<usize>,
}

impl FaultInjection {
    /// No faults
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any fault is configured
    pub fn is_active(&self) -> bool {
        self.handle_limit.is_some() || self.fail_spawn_at.is_some() || self.drop_handoff_at.is_some()
    }
}

/// Configuration for one hand-off run
#[derive(Debug, Clone)]
pub struct HandoffConfig {
    /// Number of workers to start
    pub worker_count: usize,
    /// Signal strategy and tuning
    pub sync: SyncConfig,
    /// Per-worker wait limit; `None` waits forever
    pub wait_timeout: Option<Duration>,
    /// Injected faults
    pub faults: FaultInjection,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self::new(detect_worker_count())
    }
}

impl HandoffConfig {
    /// Configuration for `worker_count` workers with default settings
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            sync: SyncConfig::default(),
            wait_timeout: None,
            faults: FaultInjection::none(),
        }
    }

    /// Use the given signal configuration
    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Use the given signal strategy with default tuning
    pub fn with_strategy(mut self, strategy: StrategyType) -> Self {
        self.sync.strategy = strategy;
        self
    }

    /// Bound every worker wait
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Inject faults into the run
    pub fn with_faults(mut self, faults: FaultInjection) -> Self {
        self.faults = faults;
        self
    }

    /// Check the configuration before anything is allocated
    pub fn validate(&self) -> HandoffResult<()> {
        if self.worker_count > MAX_WORKERS {
            return Err(HandoffError::InvalidWorkerCount(format!(
                "{} exceeds the limit of {}",
                self.worker_count, MAX_WORKERS
            )));
        }
        Ok(())
    }
}

/// Number of workers to use when none is given: the hardware concurrency
pub fn detect_worker_count() -> usize {
    match std::thread::available_parallelism() {
        Ok(count) => count.get().min(MAX_WORKERS),
        Err(e) => {
            warn!(error = %e, fallback = FALLBACK_WORKER_COUNT, "Could not detect hardware concurrency");
            FALLBACK_WORKER_COUNT
        }
    }
}

/// Parse a worker count given on the command line
///
/// Only plain decimal digits are accepted: no sign, no whitespace, no radix
/// prefix. Zero is valid and starts no workers.
pub fn parse_worker_count(arg: &str) -> HandoffResult<usize> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HandoffError::InvalidWorkerCount(format!("'{}'", arg)));
    }

    let count: usize = arg
        .parse()
        .map_err(|_| HandoffError::InvalidWorkerCount(format!("'{}' is out of range", arg)))?;

    if count > MAX_WORKERS {
        return Err(HandoffError::InvalidWorkerCount(format!(
            "{} exceeds the limit of {}",
            count, MAX_WORKERS
        )));
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_worker_count_valid() {
        assert_eq!(parse_worker_count("0").unwrap(), 0);
        assert_eq!(parse_worker_count("8").unwrap(), 8);
        assert_eq!(parse_worker_count("007").unwrap(), 7);
        assert_eq!(parse_worker_count(&MAX_WORKERS.to_string()).unwrap(), MAX_WORKERS);
    }

    #[test]
    fn test_parse_worker_count_invalid() {
        for arg in ["", "abc", "-1", "+3", " 4", "4 ", "3.5", "0x10"] {
            let err = parse_worker_count(arg).unwrap_err();
            assert!(
                matches!(err, HandoffError::InvalidWorkerCount(_)),
                "{:?} accepted",
                arg
            );
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_parse_worker_count_out_of_range() {
        assert!(parse_worker_count("99999999999999999999999999").is_err());
        assert!(parse_worker_count(&(MAX_WORKERS + 1).to_string()).is_err());
    }

    #[test]
    fn test_detected_count_is_usable() {
        let count = detect_worker_count();
        assert!(count >= 1);
        assert!(count <= MAX_WORKERS);
    }

    #[test]
    fn test_builder() {
        let config = HandoffConfig::new(4)
            .with_strategy(StrategyType::Condvar)
            .with_wait_timeout(Duration::from_millis(10))
            .with_faults(FaultInjection {
                fail_spawn_at: Some(2),
                ..FaultInjection::none()
            });

        assert_eq!(config.worker_count, 4);
        assert_eq!(config.sync.strategy, StrategyType::Condvar);
        assert_eq!(config.wait_timeout, Some(Duration::from_millis(10)));
        assert!(config.faults.is_active());
        assert!(!FaultInjection::none().is_active());
        assert!(config.validate().is_ok());
        assert!(HandoffConfig::new(MAX_WORKERS + 1).validate().is_err());
    }
}
