/*!
 * Synchronization Primitives
 *
 * Binary wait/post signals for handing the right to proceed between threads:
 * - Futex-based (parking_lot_core) for minimal overhead
 * - Condvar-based (cross-platform) for reliability
 * - Adaptive spinwait for low-latency hand-offs
 *
 * # Architecture
 *
 * `HandoffSignal` is a reusable binary semaphore. Waiting and posting are
 * separate roles, so a permit consumed by one thread may be re-posted by any
 * other thread without violating lock ownership rules.
 */

mod condvar;
mod config;
mod futex;
mod signal;
mod spinwait;
mod traits;

pub use config::{StrategyType, SyncConfig};
pub use signal::{HandoffSignal, SignalError, SignalResult};
pub use traits::{AcquireOutcome, SignalStrategy, WakeResult};

// Re-export specific strategies for advanced users
pub use condvar::CondvarSignal;
pub use futex::FutexSignal;
pub use spinwait::SpinSignal;
