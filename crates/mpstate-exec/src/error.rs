//! Error types for mpstate-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external process
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// The process could not be started at all
    #[error("failed to launch process: {0}")]
    Launch(String),

    /// Reading the process output or waiting for exit failed
    #[error("I/O error: {0}")]
    Io(String),

    /// The process was still running when the deadline elapsed
    #[error("command timed out after {deadline:?}")]
    Timeout {
        /// Deadline that was exceeded
        deadline: Duration,
    },
}

impl ExecError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecError::Io(_) | ExecError::Timeout { .. })
    }
}
