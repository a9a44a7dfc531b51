/*!
 * Core Module
 * Fundamental types, limits, synchronization primitives and error handling
 */

pub mod errors;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use sync::{HandoffSignal, StrategyType, SyncConfig};
