/*!
 * Command Line Interface
 * Argument definitions for the `hello_handoff` and `matrix_reader` binaries
 */

use crate::core::errors::HandoffResult;
use crate::core::sync::{StrategyType, SyncConfig};
use crate::handoff::{detect_worker_count, parse_worker_count, HandoffConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for the hand-off demo
#[derive(Parser, Debug)]
#[command(name = "hello_handoff")]
#[command(about = "Even threads say hello, odd threads say world, strictly taking turns")]
pub struct HandoffArgs {
    /// Number of threads (default: number of CPUs)
    #[arg(allow_hyphen_values = true)]
    pub worker_count: Option<String>,

    /// Signal strategy: auto, futex, condvar or spin
    #[arg(long, default_value = "auto")]
    pub strategy: StrategyType,

    /// Give up when a thread waits longer than this for its turn
    #[arg(long)]
    pub wait_timeout_ms: Option<u64>,
}

impl HandoffArgs {
    /// Resolve the arguments into a run configuration
    pub fn into_config(self) -> HandoffResult<HandoffConfig> {
        let worker_count = match self.worker_count.as_deref() {
            Some(arg) => parse_worker_count(arg)?,
            None => detect_worker_count(),
        };

        let mut config =
            HandoffConfig::new(worker_count).with_sync(SyncConfig::with_strategy(self.strategy));
        if let Some(ms) = self.wait_timeout_ms {
            config = config.with_wait_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

/// CLI arguments for the matrix reader
#[derive(Parser, Debug)]
#[command(name = "matrix_reader")]
#[command(about = "Read a character matrix and print it back")]
pub struct MatrixArgs {
    /// Input file (default: standard input)
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::HandoffError;

    #[test]
    fn test_explicit_count_and_strategy() {
        let args = HandoffArgs::parse_from(["hello_handoff", "6", "--strategy", "condvar"]);
        let config = args.into_config().unwrap();

        assert_eq!(config.worker_count, 6);
        assert_eq!(config.sync.strategy, StrategyType::Condvar);
        assert_eq!(config.wait_timeout, None);
    }

    #[test]
    fn test_default_count_is_detected() {
        let config = HandoffArgs::parse_from(["hello_handoff"]).into_config().unwrap();
        assert_eq!(config.worker_count, detect_worker_count());
    }

    #[test]
    fn test_negative_count_reaches_validation() {
        let args = HandoffArgs::try_parse_from(["hello_handoff", "-2"]).unwrap();
        assert!(matches!(
            args.into_config(),
            Err(HandoffError::InvalidWorkerCount(_))
        ));
    }

    #[test]
    fn test_wait_timeout() {
        let config = HandoffArgs::parse_from(["hello_handoff", "2", "--wait-timeout-ms", "250"])
            .into_config()
            .unwrap();
        assert_eq!(config.wait_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(HandoffArgs::try_parse_from(["hello_handoff", "--strategy", "mutex"]).is_err());
    }
}
