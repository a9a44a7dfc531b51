/*!
 * Synchronization Configuration
 *
 * Runtime configuration for signal strategy selection
 */

use crate::core::limits::{DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Futex-based (parking_lot_core, fastest on Linux)
    Futex,
    /// Condvar-based (cross-platform, reliable)
    Condvar,
    /// Adaptive spinwait (low-latency, high-CPU for short waits)
    SpinWait,
    /// Auto-select based on platform
    Auto,
}

impl StrategyType {
    /// Name used on the command line and in logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Futex => "futex",
            StrategyType::Condvar => "condvar",
            StrategyType::SpinWait => "spin",
            StrategyType::Auto => "auto",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "futex" => Ok(StrategyType::Futex),
            "condvar" => Ok(StrategyType::Condvar),
            "spin" | "spinwait" => Ok(StrategyType::SpinWait),
            "auto" => Ok(StrategyType::Auto),
            other => Err(format!("unknown sync strategy '{}'", other)),
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin duration before parking (for SpinWait)
    pub spin_duration: Duration,
    /// Maximum spin iterations before parking
    pub max_spins: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl SyncConfig {
    /// Configuration with an explicit strategy and default tuning
    pub fn with_strategy(strategy: StrategyType) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Select best strategy for current platform
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => {
                // Prefer futex on Linux, condvar elsewhere
                #[cfg(target_os = "linux")]
                {
                    StrategyType::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    StrategyType::Condvar
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_to_concrete_strategy() {
        let selected = SyncConfig::default().select_strategy();
        assert_ne!(selected, StrategyType::Auto);
    }

    #[test]
    fn test_explicit_strategy_is_kept() {
        let config = SyncConfig::with_strategy(StrategyType::Condvar);
        assert_eq!(config.select_strategy(), StrategyType::Condvar);
        assert_eq!(config.max_spins, DEFAULT_MAX_SPINS);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("futex".parse::<StrategyType>(), Ok(StrategyType::Futex));
        assert_eq!("SPIN".parse::<StrategyType>(), Ok(StrategyType::SpinWait));
        assert!("mutex".parse::<StrategyType>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in [
            StrategyType::Futex,
            StrategyType::Condvar,
            StrategyType::SpinWait,
            StrategyType::Auto,
        ] {
            assert_eq!(strategy.to_string().parse::<StrategyType>(), Ok(strategy));
        }
    }
}
