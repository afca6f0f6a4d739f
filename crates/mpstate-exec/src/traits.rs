//! Command runner trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::output::CommandOutput;

/// Seam for invoking an external program and collecting its output.
///
/// Implementations spawn one process per call with an explicit argv, no
/// shell in between, and report the exit status through [`CommandOutput`]
/// rather than as an error, so callers decide what a non-zero exit means.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion and capture its output
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError>;

    /// Run with a deadline; the child is terminated if it is still running
    /// when the deadline elapses
    async fn run_with_deadline(
        &self,
        program: &str,
        args: &[&str],
        deadline: Duration,
    ) -> Result<CommandOutput, ExecError>;

    /// Short label identifying the runner implementation, for logs
    fn runner_kind(&self) -> &'static str;
}
