/*!
 * Handoff Lab Library
 * Thread hand-off barrier and character matrix reader exposed as a library
 */

pub mod cli;
pub mod core;
pub mod handoff;
pub mod matrix;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::*;
pub use handoff::{HandoffBarrier, HandoffConfig, RunReport};
pub use matrix::{read_matrix, CharMatrix};
pub use monitoring::init_tracing;
