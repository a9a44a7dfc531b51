/*!
 * Shared Hand-off State
 *
 * The two signals every worker coordinates through. Created by the
 * initializing context before any worker starts and dropped only after all
 * workers have joined.
 */

use super::worker::Parity;
use crate::core::sync::{HandoffSignal, SyncConfig};

/// State shared by all workers of one run
///
/// At any instant at most one permit exists across both signals, so at most
/// one worker is between its wait and its post.
#[derive(Debug)]
pub struct SharedState {
    worker_count: usize,
    can_print_hello: HandoffSignal,
    can_print_world: HandoffSignal,
}

impl SharedState {
    /// Create the shared state with "hello" free and "world" pending
    pub fn new(worker_count: usize, sync: &SyncConfig) -> Self {
        Self {
            worker_count,
            can_print_hello: HandoffSignal::new(sync, true),
            can_print_world: HandoffSignal::new(sync, false),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Signal a worker of this parity waits on before printing
    #[inline]
    pub fn turn_signal(&self, parity: Parity) -> &HandoffSignal {
        match parity {
            Parity::Even => &self.can_print_hello,
            Parity::Odd => &self.can_print_world,
        }
    }

    /// Signal a worker of this parity posts after printing
    #[inline]
    pub fn next_signal(&self, parity: Parity) -> &HandoffSignal {
        match parity {
            Parity::Even => &self.can_print_world,
            Parity::Odd => &self.can_print_hello,
        }
    }

    /// Cancel the run: every blocked or future wait fails with `Cancelled`
    pub fn close(&self) {
        self.can_print_hello.close();
        self.can_print_world.close();
    }

    pub fn is_closed(&self) -> bool {
        self.can_print_hello.is_closed() || self.can_print_world.is_closed()
    }

    /// Number of permits currently pending (0 or 1 while the protocol holds)
    pub fn pending_permits(&self) -> usize {
        usize::from(self.can_print_hello.is_posted()) + usize::from(self.can_print_world.is_posted())
    }

    /// Parity whose turn it currently is, if a permit is pending
    pub fn current_turn(&self) -> Option<Parity> {
        if self.can_print_hello.is_posted() {
            Some(Parity::Even)
        } else if self.can_print_world.is_posted() {
            Some(Parity::Odd)
        } else {
            None
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.can_print_hello.strategy_name()
    }
}
