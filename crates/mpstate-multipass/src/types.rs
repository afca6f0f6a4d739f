//! Typed model of the multipass `info` payload
//!
//! Field names track the CLI's JSON output. Fields the CLI omits for stopped
//! instances decode to their zero value instead of failing; wrong-typed
//! fields are fatal. Map-keyed fields use `BTreeMap` so iteration, and
//! everything projected from it, is ordered by key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One attached disk, sizes reported as decimal byte-count strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    /// Total capacity
    #[serde(default)]
    pub total: String,
    /// Bytes in use
    #[serde(default)]
    pub used: String,
}

/// Memory usage in bytes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Memory {
    /// Total memory
    #[serde(default)]
    pub total: i64,
    /// Memory in use
    #[serde(default)]
    pub used: i64,
}

/// One host-directory mount inside an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mount {
    /// Group id mappings, `host:instance` pairs
    #[serde(default)]
    pub gid_mappings: Vec<String>,
    /// Host path the mount exposes
    #[serde(default)]
    pub source_path: String,
    /// User id mappings, `host:instance` pairs
    #[serde(default)]
    pub uid_mappings: Vec<String>,
}

/// One virtual machine as reported by the CLI
///
/// The instance name is not part of this struct; it is the key of the
/// [`Info::info`] map it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Disks keyed by device name; absent entirely for some states
    pub disks: Option<BTreeMap<String, Disk>>,
    /// Hash of the image the instance was launched from
    #[serde(default)]
    pub image_hash: String,
    /// Image release label (e.g. `20.04 LTS`)
    #[serde(default)]
    pub image_release: String,
    /// IPv4 addresses, in the order the CLI reports them
    #[serde(default)]
    pub ipv4: Vec<String>,
    /// Memory usage; absent while the instance is not running
    pub memory: Option<Memory>,
    /// Mounts keyed by target path inside the instance
    pub mounts: Option<BTreeMap<String, Mount>>,
    /// OS release running inside the instance
    #[serde(default)]
    pub release: String,
    /// Lifecycle state label (`Running`, `Stopped`, ...)
    #[serde(default)]
    pub state: String,
}

/// Top-level `multipass info --format json` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// Errors the CLI hit while gathering info; instances named here may be
    /// missing or degraded in the `info` map
    #[serde(default)]
    pub errors: Vec<String>,
    /// Instances keyed by name
    #[serde(default)]
    pub info: BTreeMap<String, Instance>,
}
