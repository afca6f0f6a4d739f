//! mpstate-exec: External process invocation
//!
//! Provides the `CommandRunner` seam the inventory client talks through, and a
//! local implementation on `tokio::process`. One invocation = one spawned
//! process, output captured to completion, exit status reported to the caller.

pub mod error;
pub mod local;
pub mod output;
pub mod traits;

pub use error::ExecError;
pub use local::LocalRunner;
pub use output::CommandOutput;
pub use traits::CommandRunner;
