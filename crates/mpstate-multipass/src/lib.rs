//! mpstate-multipass: multipass inventory client
//!
//! Typed model of the `multipass info --format json` payload and the client
//! that fetches and decodes one inventory snapshot through the
//! command-runner seam.

pub mod client;
pub mod error;
pub mod types;

pub use client::MultipassClient;
pub use error::InventoryError;
pub use types::{Disk, Info, Instance, Memory, Mount};
