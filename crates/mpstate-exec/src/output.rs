//! Captured output of a finished process

use std::time::Duration;

/// Everything a process left behind after exiting
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status code (0 for success)
    pub status: i32,
    /// Raw stdout bytes; for the inventory CLI this is the JSON payload
    pub stdout: Vec<u8>,
    /// stderr, decoded lossily for diagnostics
    pub stderr: String,
    /// Time taken to run
    pub duration: Duration,
}

impl CommandOutput {
    /// Check if the process exited cleanly (status 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// stdout decoded lossily, for logging only
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}
