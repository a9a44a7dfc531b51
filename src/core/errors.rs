/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export SignalError from the sync module
pub use crate::core::sync::SignalError;

/// Hand-off barrier errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HandoffError {
    #[error("Invalid number of threads: {0}")]
    #[diagnostic(
        code(handoff::invalid_worker_count),
        help("Pass a single decimal integer between 0 and the worker limit, or no argument to use every CPU.")
    )]
    InvalidWorkerCount(String),

    #[error("Unable to allocate memory for {requested} threads")]
    #[diagnostic(
        code(handoff::handle_allocation_failed),
        help("System may be low on memory. Try a smaller worker count.")
    )]
    HandleAllocationFailed { requested: usize },

    #[error("Could not create thread {index}: {reason}")]
    #[diagnostic(
        code(handoff::worker_creation_failed),
        help("The OS refused to start another thread. Check process thread limits.")
    )]
    WorkerCreationFailed { index: usize, reason: String },

    #[error("Worker {index} waited {waited_ms}ms for its turn and gave up")]
    #[diagnostic(
        code(handoff::worker_stalled),
        help("The signal this worker needs was never posted. Another worker failed to hand off.")
    )]
    WorkerStalled { index: usize, waited_ms: u64 },

    #[error("Worker {index} was cancelled before its turn")]
    #[diagnostic(code(handoff::worker_cancelled))]
    WorkerCancelled { index: usize },

    #[error("Worker {index} panicked")]
    #[diagnostic(
        code(handoff::worker_panicked),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    WorkerPanicked { index: usize },

    #[error("Worker {index} could not write its message: {reason}")]
    #[diagnostic(
        code(handoff::output_failed),
        help("Standard output may be closed. Check the downstream pipe.")
    )]
    OutputFailed { index: usize, reason: String },

    #[error("Worker {index} broke the hand-off protocol: {reason}")]
    #[diagnostic(
        code(handoff::handoff_violation),
        help("More than one permit was in flight. This indicates a bug in the barrier.")
    )]
    HandoffViolation { index: usize, reason: String },
}

impl HandoffError {
    /// Process exit code for this error
    ///
    /// 2 = configuration, 3 = allocation, 4 = worker creation, 5 = worker failure
    pub fn exit_code(&self) -> u8 {
        match self {
            HandoffError::InvalidWorkerCount(_) => 2,
            HandoffError::HandleAllocationFailed { .. } => 3,
            HandoffError::WorkerCreationFailed { .. } => 4,
            HandoffError::WorkerStalled { .. }
            | HandoffError::WorkerCancelled { .. }
            | HandoffError::WorkerPanicked { .. }
            | HandoffError::OutputFailed { .. }
            | HandoffError::HandoffViolation { .. } => 5,
        }
    }

    /// Whether this error is only a consequence of another worker failing
    pub fn is_cancellation(&self) -> bool {
        matches!(self, HandoffError::WorkerCancelled { .. })
    }
}

/// Matrix reader errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MatrixError {
    #[error("Invalid row count: {0}")]
    #[diagnostic(
        code(matrix::invalid_row_count),
        help("The input must start with a positive decimal row count.")
    )]
    InvalidRowCount(String),

    #[error("Invalid column count: {0}")]
    #[diagnostic(
        code(matrix::invalid_col_count),
        help("The row count must be followed by a positive decimal column count.")
    )]
    InvalidColCount(String),

    #[error("Matrix of {rows}x{cols} exceeds the supported size")]
    #[diagnostic(code(matrix::too_large))]
    TooLarge { rows: usize, cols: usize },

    #[error("Unable to allocate memory for a {rows}x{cols} matrix")]
    #[diagnostic(
        code(matrix::allocation_failed),
        help("System may be low on memory. Rows allocated so far were released.")
    )]
    AllocationFailed { rows: usize, cols: usize },

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(matrix::io_error),
        help("Reading the matrix input failed. Check the file path and permissions.")
    )]
    Io(String),
}

impl MatrixError {
    /// Process exit code for this error (1 = bad input, 2 = I/O)
    pub fn exit_code(&self) -> u8 {
        match self {
            MatrixError::Io(_) => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(err: std::io::Error) -> Self {
        MatrixError::Io(err.to_string())
    }
}

/// Result type for hand-off operations
pub type HandoffResult<T> = std::result::Result<T, HandoffError>;

/// Result type for matrix operations
pub type MatrixResult<T> = std::result::Result<T, MatrixError>;
