//! Flattening of the map-keyed inventory into ordered records
//!
//! The store cannot hold nested maps, so every source mapping becomes an
//! ordered collection of records with the map key promoted to a named field.
//! Flattening appends exactly one record per source entry: output length
//! always equals input size, and an absent map projects to an empty
//! collection rather than an error.

use std::collections::BTreeMap;

use mpstate_multipass::{Disk, Instance, Mount};
use serde::{Deserialize, Serialize};

/// One disk record, device promoted from its map key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatDisk {
    /// Device name
    pub device: String,
    /// Total capacity
    pub total: String,
}

/// One mount record, mount path promoted from its map key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMount {
    /// Target path inside the instance
    pub mount_path: String,
    /// Group id mappings
    pub gid_mappings: Vec<String>,
    /// Host path the mount exposes
    pub source_path: String,
    /// User id mappings
    pub uid_mappings: Vec<String>,
}

/// One instance record in the produced state shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatInstance {
    /// Instance name, promoted from the inventory map key
    pub id: String,
    /// Flattened disks, ordered by device
    pub disks: Vec<FlatDisk>,
    /// Hash of the source image
    pub image_hash: String,
    /// Image release label
    pub image_release: String,
    /// IPv4 addresses, source order preserved
    pub ipv4: Vec<String>,
    /// Total memory in bytes; 0 when the source reported none
    pub memory_total: i64,
    /// Flattened mounts, ordered by mount path
    pub mounts: Vec<FlatMount>,
    /// OS release inside the instance
    pub release: String,
    /// Lifecycle state label
    pub state: String,
}

/// Flatten the disks map into one record per device
pub fn flatten_disks(disks: Option<BTreeMap<String, Disk>>) -> Vec<FlatDisk> {
    let Some(disks) = disks else {
        return Vec::new();
    };

    let mut records = Vec::with_capacity(disks.len());
    for (device, disk) in disks {
        records.push(FlatDisk {
            device,
            total: disk.total,
        });
    }

    records
}

/// Flatten the mounts map into one record per mount path
pub fn flatten_mounts(mounts: Option<BTreeMap<String, Mount>>) -> Vec<FlatMount> {
    let Some(mounts) = mounts else {
        return Vec::new();
    };

    let mut records = Vec::with_capacity(mounts.len());
    for (mount_path, mount) in mounts {
        records.push(FlatMount {
            mount_path,
            gid_mappings: mount.gid_mappings,
            source_path: mount.source_path,
            uid_mappings: mount.uid_mappings,
        });
    }

    records
}

/// Project one instance, promoting its inventory key to the record id
pub fn project_instance(name: String, instance: Instance) -> FlatInstance {
    FlatInstance {
        id: name,
        disks: flatten_disks(instance.disks),
        image_hash: instance.image_hash,
        image_release: instance.image_release,
        ipv4: instance.ipv4,
        memory_total: instance.memory.map_or(0, |m| m.total),
        mounts: flatten_mounts(instance.mounts),
        release: instance.release,
        state: instance.state,
    }
}

/// Project the whole inventory map, one record per instance
pub fn project_instances(instances: BTreeMap<String, Instance>) -> Vec<FlatInstance> {
    let mut records = Vec::with_capacity(instances.len());
    for (name, instance) in instances {
        records.push(project_instance(name, instance));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    use mpstate_multipass::Memory;

    fn disk(total: &str, used: &str) -> Disk {
        Disk {
            total: total.to_string(),
            used: used.to_string(),
        }
    }

    fn mount(source: &str) -> Mount {
        Mount {
            gid_mappings: vec!["1000:default".to_string()],
            source_path: source.to_string(),
            uid_mappings: vec!["1000:default".to_string()],
        }
    }

    fn bare_instance() -> Instance {
        Instance {
            disks: None,
            image_hash: "aabbcc".to_string(),
            image_release: "22.04 LTS".to_string(),
            ipv4: vec!["10.0.0.7".to_string()],
            memory: Some(Memory {
                total: 2_147_483_648,
                used: 500_000_000,
            }),
            mounts: None,
            release: "Ubuntu 22.04.3 LTS".to_string(),
            state: "Running".to_string(),
        }
    }

    #[test]
    fn test_flatten_disks_absent_map_is_empty() {
        assert!(flatten_disks(None).is_empty());
    }

    #[test]
    fn test_flatten_disks_empty_map_is_empty() {
        assert!(flatten_disks(Some(BTreeMap::new())).is_empty());
    }

    #[test]
    fn test_flatten_disks_one_record_per_device() {
        let mut disks = BTreeMap::new();
        disks.insert("vdb".to_string(), disk("1073741824", "0"));
        disks.insert("sda1".to_string(), disk("5019643904", "1075043328"));
        disks.insert("sda2".to_string(), disk("104857600", "4194304"));

        let records = flatten_disks(Some(disks));

        // Exactly one well-formed record per source entry, ordered by key.
        assert_eq!(records.len(), 3);
        assert_eq!(
            records,
            vec![
                FlatDisk {
                    device: "sda1".to_string(),
                    total: "5019643904".to_string(),
                },
                FlatDisk {
                    device: "sda2".to_string(),
                    total: "104857600".to_string(),
                },
                FlatDisk {
                    device: "vdb".to_string(),
                    total: "1073741824".to_string(),
                },
            ]
        );
        assert!(records.iter().all(|r| !r.device.is_empty()));
    }

    #[test]
    fn test_flatten_mounts_one_record_per_path() {
        let mut mounts = BTreeMap::new();
        mounts.insert("/home/ubuntu/b".to_string(), mount("/srv/b"));
        mounts.insert("/home/ubuntu/a".to_string(), mount("/srv/a"));

        let records = flatten_mounts(Some(mounts));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mount_path, "/home/ubuntu/a");
        assert_eq!(records[0].source_path, "/srv/a");
        assert_eq!(records[1].mount_path, "/home/ubuntu/b");
        assert_eq!(records[1].source_path, "/srv/b");
        assert_eq!(records[0].uid_mappings, vec!["1000:default"]);
    }

    #[test]
    fn test_flatten_mounts_absent_map_is_empty() {
        assert!(flatten_mounts(None).is_empty());
    }

    #[test]
    fn test_project_instance_round_trip() {
        let mut disks = BTreeMap::new();
        disks.insert("sda1".to_string(), disk("10G", "1G"));

        let mut instance = bare_instance();
        instance.disks = Some(disks);

        let flat = project_instance("primary".to_string(), instance);

        assert_eq!(flat.id, "primary");
        assert_eq!(
            flat.disks,
            vec![FlatDisk {
                device: "sda1".to_string(),
                total: "10G".to_string(),
            }]
        );
        assert_eq!(flat.mounts, Vec::<FlatMount>::new());
        assert_eq!(flat.memory_total, 2_147_483_648);
        assert_eq!(flat.ipv4, vec!["10.0.0.7"]);
    }

    #[test]
    fn test_project_instance_missing_memory_is_zero() {
        let mut instance = bare_instance();
        instance.memory = None;

        let flat = project_instance("sleepy".to_string(), instance);

        assert_eq!(flat.memory_total, 0);
    }

    #[test]
    fn test_project_instances_one_record_per_instance() {
        let mut instances = BTreeMap::new();
        instances.insert("alpha".to_string(), bare_instance());
        instances.insert("gamma".to_string(), bare_instance());
        instances.insert("beta".to_string(), bare_instance());

        let records = project_instances(instances);

        assert_eq!(records.len(), 3);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let build = || {
            let mut instances = BTreeMap::new();
            let mut with_disks = bare_instance();
            let mut disks = BTreeMap::new();
            disks.insert("sda1".to_string(), disk("10G", "1G"));
            disks.insert("sdb".to_string(), disk("20G", "2G"));
            with_disks.disks = Some(disks);
            instances.insert("one".to_string(), with_disks);
            instances.insert("two".to_string(), bare_instance());
            instances
        };

        assert_eq!(project_instances(build()), project_instances(build()));
    }
}
