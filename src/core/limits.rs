/*!
 * Limits and Constants
 *
 * Centralized location for the limits, thresholds, and magic numbers used by
 * the hand-off barrier and the matrix reader.
 *
 * ## Conventions
 * - Values are grouped by domain (workers, signals, matrix)
 * - Performance-related constants are marked with [PERF]
 * - Values that bound user input are marked with [INPUT]
 */

use std::time::Duration;

// =============================================================================
// WORKER LIMITS
// =============================================================================

/// Maximum number of hand-off workers (4096)
/// [INPUT] Larger counts are rejected as a configuration error
pub const MAX_WORKERS: usize = 4096;

/// Worker count used when hardware concurrency cannot be detected
pub const FALLBACK_WORKER_COUNT: usize = 1;

/// Thread name prefix for hand-off workers
pub const WORKER_THREAD_PREFIX: &str = "handoff-worker";

// =============================================================================
// SIGNAL TUNING
// =============================================================================

/// Default spin duration before a spin signal parks (10µs)
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default maximum spin iterations before a spin signal parks
pub const DEFAULT_MAX_SPINS: u32 = 100;

/// Iterations spent in the tight spin phase of the backoff
/// [PERF] Best for waits shorter than ~100ns
pub const SPIN_TIGHT_ITERATIONS: u32 = 10;

/// Iterations (cumulative) before the backoff switches from yielding to sleeping
pub const SPIN_YIELD_ITERATIONS: u32 = 50;

/// Upper bound for a single backoff sleep (1ms)
pub const SPIN_MAX_BACKOFF_NS: u64 = 1_000_000;

// =============================================================================
// MATRIX LIMITS
// =============================================================================

/// Largest accepted row or column count (1M)
/// [INPUT] Keeps a malformed header from requesting an absurd allocation
pub const MATRIX_MAX_DIMENSION: usize = 1 << 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_limits() {
        assert!(FALLBACK_WORKER_COUNT >= 1);
        assert!(FALLBACK_WORKER_COUNT <= MAX_WORKERS);
        assert!(!WORKER_THREAD_PREFIX.is_empty());
    }

    #[test]
    fn test_backoff_phases_ordered() {
        assert!(SPIN_TIGHT_ITERATIONS < SPIN_YIELD_ITERATIONS);
        assert!(SPIN_YIELD_ITERATIONS <= DEFAULT_MAX_SPINS);
    }
}
