//! Local process invocation using `tokio::process`

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

use crate::error::ExecError;
use crate::output::CommandOutput;
use crate::traits::CommandRunner;

/// Local command runner
///
/// Spawns the program directly with `tokio::process::Command`. stdin is
/// closed, stdout and stderr are captured to completion. Children are
/// spawned with `kill_on_drop` so an abandoned invocation (deadline elapsed,
/// caller gone) does not leave the process running.
#[derive(Debug, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Internal method to spawn and collect one process
    #[instrument(skip(self), level = "debug")]
    async fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        let start = Instant::now();

        debug!(program, ?args, "spawning local process");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::Launch(e.to_string()))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::Io(e.to_string()))?;

        let duration = start.elapsed();

        let status = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            program,
            status,
            stdout_bytes = output.stdout.len(),
            ?duration,
            "process completed"
        );

        if !output.status.success() {
            warn!(program, status, stderr = %stderr, "process exited non-zero");
        }

        Ok(CommandOutput {
            status,
            stdout: output.stdout,
            stderr,
            duration,
        })
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    #[instrument(skip(self), level = "debug")]
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        self.execute(program, args).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_with_deadline(
        &self,
        program: &str,
        args: &[&str],
        deadline: Duration,
    ) -> Result<CommandOutput, ExecError> {
        let start = Instant::now();

        debug!(program, ?deadline, "spawning with deadline");

        let result = timeout(deadline, self.execute(program, args)).await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                error!(
                    program,
                    ?deadline,
                    elapsed = ?start.elapsed(),
                    "process killed after deadline"
                );
                Err(ExecError::Timeout { deadline })
            }
        }
    }

    fn runner_kind(&self) -> &'static str {
        "local"
    }
}
