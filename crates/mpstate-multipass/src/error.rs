//! Error types for mpstate-multipass

use std::time::Duration;

use mpstate_exec::ExecError;
use thiserror::Error;

/// Errors that can occur while fetching and decoding the inventory
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// The multipass binary could not be started
    #[error("failed to launch multipass: {0}")]
    Launch(String),

    /// The CLI ran but exited non-zero; its output is not trusted
    #[error("multipass info failed with status {status}: {stderr}")]
    CommandFailed {
        /// Exit status code
        status: i32,
        /// stderr output, verbatim
        stderr: String,
    },

    /// Waiting for process exit or reading its output failed
    #[error("failed waiting for multipass: {0}")]
    Wait(String),

    /// The deadline elapsed before the CLI finished
    #[error("multipass info timed out after {0:?}")]
    Timeout(Duration),

    /// The payload did not match the inventory schema
    #[error("multipass info json decode - {0}")]
    Decode(String),
}

impl InventoryError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InventoryError::Wait(_) | InventoryError::Timeout(_)
        )
    }
}

impl From<ExecError> for InventoryError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Launch(msg) => InventoryError::Launch(msg),
            ExecError::Io(msg) => InventoryError::Wait(msg),
            ExecError::Timeout { deadline } => InventoryError::Timeout(deadline),
        }
    }
}
