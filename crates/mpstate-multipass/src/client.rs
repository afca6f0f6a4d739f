//! multipass client for inventory collection

use std::sync::Arc;
use std::time::Duration;

use mpstate_exec::CommandRunner;
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::types::Info;

/// Program the client invokes unless overridden
pub const MULTIPASS_PROGRAM: &str = "multipass";

/// Fixed argument set requesting the full inventory as JSON
pub const INFO_ARGS: [&str; 4] = ["info", "--all", "--format", "json"];

/// Client for one multipass installation
///
/// Each fetch spawns one `multipass info` process through the runner seam,
/// collects its stdout to completion, checks the exit status and only then
/// decodes the payload. Nothing is cached between fetches.
pub struct MultipassClient {
    /// Runner used to spawn the CLI
    runner: Arc<dyn CommandRunner>,
    /// Binary name or path
    program: String,
    /// Optional per-fetch deadline; the child is killed when it elapses
    deadline: Option<Duration>,
}

impl MultipassClient {
    /// Create a new client using the default `multipass` binary
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            program: MULTIPASS_PROGRAM.to_string(),
            deadline: None,
        }
    }

    /// Override the binary name or path
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set a deadline for each fetch
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Check if the multipass CLI is reachable
    #[instrument(skip(self))]
    pub async fn is_available(&self) -> bool {
        let result = self.runner.run(&self.program, &["version"]).await;
        result.map(|o| o.success()).unwrap_or(false)
    }

    /// Fetch the raw inventory payload
    ///
    /// Returns the CLI's stdout bytes after a clean exit. A non-zero exit
    /// discards whatever was already read; the payload of a failed run is
    /// not trusted.
    ///
    /// # Errors
    /// Returns an error if the process cannot be spawned, exits non-zero,
    /// cannot be waited on, or outlives the configured deadline.
    #[instrument(skip(self))]
    pub async fn fetch_raw(&self) -> Result<Vec<u8>, InventoryError> {
        debug!(program = %self.program, "querying instance inventory");

        let output = match self.deadline {
            Some(deadline) => {
                self.runner
                    .run_with_deadline(&self.program, &INFO_ARGS, deadline)
                    .await
            }
            None => self.runner.run(&self.program, &INFO_ARGS).await,
        }?;

        if !output.success() {
            return Err(InventoryError::CommandFailed {
                status: output.status,
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }

    /// Fetch and decode one inventory snapshot
    ///
    /// # Errors
    /// Returns an error if fetching fails (see [`Self::fetch_raw`]) or the
    /// payload does not match the inventory schema.
    #[instrument(skip(self))]
    pub async fn fetch_info(&self) -> Result<Info, InventoryError> {
        let payload = self.fetch_raw().await?;
        let info = Self::decode_info(&payload)?;

        debug!(
            instances = info.info.len(),
            source_errors = info.errors.len(),
            "inventory decoded"
        );

        Ok(info)
    }

    /// Decode one `info --format json` payload
    ///
    /// Absent fields decode to their zero value, unknown fields are ignored,
    /// wrong-typed fields are fatal. A decode failure means the whole
    /// payload is unusable; there is no partial result.
    ///
    /// # Errors
    /// Returns [`InventoryError::Decode`] with the underlying cause.
    pub fn decode_info(payload: &[u8]) -> Result<Info, InventoryError> {
        serde_json::from_slice(payload).map_err(|e| InventoryError::Decode(e.to_string()))
    }
}
