//! Error types for mpstate-store

use mpstate_multipass::InventoryError;
use thiserror::Error;

/// Errors raised on the state-store side of the pipeline
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The sink rejected a computed value
    #[error("setting instance value - {0}")]
    Write(String),

    /// Reading or writing a state file failed
    #[error("state file {path}: {message}")]
    File {
        /// Path of the state file
        path: String,
        /// Underlying cause
        message: String,
    },
}

/// Errors for one full refresh cycle
///
/// Every variant is terminal for the cycle; nothing reaches the sink after
/// one is raised.
#[derive(Error, Debug, Clone)]
pub enum RefreshError {
    /// Fetching or decoding the inventory failed; nothing was written
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// The projected records were rejected by the state sink
    #[error(transparent)]
    Store(#[from] StoreError),
}
