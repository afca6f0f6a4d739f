//! Declared shape of the produced `instances` collection
//!
//! The schema is plain data so the host side of the sink seam can inspect
//! it, and validation is structural: a value either conforms to the declared
//! shape or names the first attribute that does not.

use serde_json::Value;

/// Kind of value an attribute holds
#[derive(Debug, Clone, Copy)]
pub enum AttrKind {
    /// JSON string
    Str,
    /// JSON integer
    Int,
    /// JSON array of strings
    StrList,
    /// JSON array of nested records with their own schema
    RecordList(&'static [AttrSchema]),
}

/// One attribute of a record schema
#[derive(Debug, Clone, Copy)]
pub struct AttrSchema {
    /// Attribute name as stored
    pub name: &'static str,
    /// Expected value kind
    pub kind: AttrKind,
    /// Whether the attribute must be present
    pub required: bool,
}

/// Shape of one disk sub-record
pub const DISK_SCHEMA: &[AttrSchema] = &[
    AttrSchema {
        name: "device",
        kind: AttrKind::Str,
        required: false,
    },
    AttrSchema {
        name: "total",
        kind: AttrKind::Str,
        required: false,
    },
];

/// Shape of one mount sub-record
pub const MOUNT_SCHEMA: &[AttrSchema] = &[
    AttrSchema {
        name: "mount_path",
        kind: AttrKind::Str,
        required: false,
    },
    AttrSchema {
        name: "gid_mappings",
        kind: AttrKind::StrList,
        required: false,
    },
    AttrSchema {
        name: "uid_mappings",
        kind: AttrKind::StrList,
        required: false,
    },
    AttrSchema {
        name: "source_path",
        kind: AttrKind::Str,
        required: false,
    },
];

/// Shape of one element of the `instances` collection
///
/// `id` is the only required attribute; everything else is computed and may
/// be absent, but must type-check when present.
pub const INSTANCE_SCHEMA: &[AttrSchema] = &[
    AttrSchema {
        name: "id",
        kind: AttrKind::Str,
        required: true,
    },
    AttrSchema {
        name: "disks",
        kind: AttrKind::RecordList(DISK_SCHEMA),
        required: false,
    },
    AttrSchema {
        name: "image_hash",
        kind: AttrKind::Str,
        required: false,
    },
    AttrSchema {
        name: "image_release",
        kind: AttrKind::Str,
        required: false,
    },
    AttrSchema {
        name: "ipv4",
        kind: AttrKind::StrList,
        required: false,
    },
    AttrSchema {
        name: "memory_total",
        kind: AttrKind::Int,
        required: false,
    },
    AttrSchema {
        name: "mounts",
        kind: AttrKind::RecordList(MOUNT_SCHEMA),
        required: false,
    },
    AttrSchema {
        name: "release",
        kind: AttrKind::Str,
        required: false,
    },
    AttrSchema {
        name: "state",
        kind: AttrKind::Str,
        required: false,
    },
];

fn kind_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Validate a full `instances` collection value
///
/// # Errors
/// Returns a description of the first violation, prefixed with the path of
/// the offending element.
pub fn validate_instances(value: &Value) -> Result<(), String> {
    let Value::Array(items) = value else {
        return Err(format!(
            "expected list of instance records, got {}",
            kind_label(value)
        ));
    };

    for (i, item) in items.iter().enumerate() {
        validate_record(INSTANCE_SCHEMA, item).map_err(|cause| format!("instances[{i}]: {cause}"))?;
    }

    Ok(())
}

/// Validate one record against a schema
///
/// Required attributes must be present, present attributes must match their
/// declared kind, and attributes outside the schema are rejected.
///
/// # Errors
/// Returns a description of the first violation.
pub fn validate_record(schema: &[AttrSchema], value: &Value) -> Result<(), String> {
    let Value::Object(fields) = value else {
        return Err(format!("expected object, got {}", kind_label(value)));
    };

    for attr in schema {
        match fields.get(attr.name) {
            Some(v) => validate_attr(attr, v)?,
            None if attr.required => {
                return Err(format!("{}: required attribute missing", attr.name));
            }
            None => {}
        }
    }

    for key in fields.keys() {
        if !schema.iter().any(|attr| attr.name == key) {
            return Err(format!("{key}: not part of the schema"));
        }
    }

    Ok(())
}

fn validate_attr(attr: &AttrSchema, value: &Value) -> Result<(), String> {
    match attr.kind {
        AttrKind::Str => {
            if !value.is_string() {
                return Err(format!(
                    "{}: expected string, got {}",
                    attr.name,
                    kind_label(value)
                ));
            }
            Ok(())
        }
        AttrKind::Int => {
            if value.as_i64().is_some() {
                return Ok(());
            }
            // A u64 beyond i64::MAX is still an integer, just not one the
            // record can hold.
            if value.as_u64().is_some() {
                return Err(format!("{}: integer out of range", attr.name));
            }
            let got = if value.is_number() {
                "float"
            } else {
                kind_label(value)
            };
            Err(format!("{}: expected int, got {got}", attr.name))
        }
        AttrKind::StrList => {
            let Value::Array(items) = value else {
                return Err(format!(
                    "{}: expected list of string, got {}",
                    attr.name,
                    kind_label(value)
                ));
            };
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    return Err(format!(
                        "{}[{i}]: expected string, got {}",
                        attr.name,
                        kind_label(item)
                    ));
                }
            }
            Ok(())
        }
        AttrKind::RecordList(element) => {
            let Value::Array(items) = value else {
                return Err(format!(
                    "{}: expected list of records, got {}",
                    attr.name,
                    kind_label(value)
                ));
            };
            for (i, item) in items.iter().enumerate() {
                validate_record(element, item)
                    .map_err(|cause| format!("{}[{i}]: {cause}", attr.name))?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::flat::{FlatDisk, FlatInstance};

    fn sample_record() -> FlatInstance {
        FlatInstance {
            id: "primary".to_string(),
            disks: vec![FlatDisk {
                device: "sda1".to_string(),
                total: "5019643904".to_string(),
            }],
            image_hash: "aabbcc".to_string(),
            image_release: "22.04 LTS".to_string(),
            ipv4: vec!["10.0.0.7".to_string()],
            memory_total: 1_040_318_464,
            mounts: Vec::new(),
            release: "Ubuntu 22.04.3 LTS".to_string(),
            state: "Running".to_string(),
        }
    }

    #[test]
    fn test_projected_record_conforms() {
        let value = serde_json::to_value(vec![sample_record()]).unwrap();

        assert!(validate_instances(&value).is_ok());
    }

    #[test]
    fn test_empty_collection_conforms() {
        assert!(validate_instances(&json!([])).is_ok());
    }

    #[test]
    fn test_instance_schema_declares_nested_record_shapes() {
        let disks = INSTANCE_SCHEMA.iter().find(|a| a.name == "disks").unwrap();
        let AttrKind::RecordList(element) = disks.kind else {
            panic!("disks must be a record list");
        };
        let names: Vec<&str> = element.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["device", "total"]);

        let mounts = INSTANCE_SCHEMA.iter().find(|a| a.name == "mounts").unwrap();
        let AttrKind::RecordList(element) = mounts.kind else {
            panic!("mounts must be a record list");
        };
        assert!(element.iter().any(|a| a.name == "source_path"));
    }

    #[test]
    fn test_collection_must_be_a_list() {
        let err = validate_instances(&json!({"id": "x"})).unwrap_err();

        assert!(err.contains("expected list"), "{err}");
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let err = validate_instances(&json!([{"state": "Running"}])).unwrap_err();

        assert_eq!(err, "instances[0]: id: required attribute missing");
    }

    #[test]
    fn test_wrong_scalar_type_is_rejected() {
        let err =
            validate_instances(&json!([{"id": "x", "image_hash": 42}])).unwrap_err();

        assert_eq!(err, "instances[0]: image_hash: expected string, got number");
    }

    #[test]
    fn test_float_memory_total_is_rejected() {
        let err =
            validate_instances(&json!([{"id": "x", "memory_total": 1.5}])).unwrap_err();

        assert_eq!(err, "instances[0]: memory_total: expected int, got float");
    }

    #[test]
    fn test_out_of_range_integer_is_rejected_as_integer() {
        // i64::MAX + 1 decodes as a u64, not a float; the message must say so.
        let err = validate_instances(
            &json!([{"id": "x", "memory_total": 9_223_372_036_854_775_808_u64}]),
        )
        .unwrap_err();

        assert_eq!(err, "instances[0]: memory_total: integer out of range");
    }

    #[test]
    fn test_nested_violation_carries_path() {
        let value = json!([{
            "id": "x",
            "disks": [{"device": "sda1", "total": 10}],
        }]);

        let err = validate_instances(&value).unwrap_err();

        assert_eq!(err, "instances[0]: disks[0]: total: expected string, got number");
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let err = validate_instances(&json!([{"id": "x", "used": "1G"}])).unwrap_err();

        assert_eq!(err, "instances[0]: used: not part of the schema");
    }

    #[test]
    fn test_non_string_ipv4_entry_is_rejected() {
        let err = validate_instances(&json!([{"id": "x", "ipv4": ["10.0.0.1", 2]}])).unwrap_err();

        assert_eq!(err, "instances[0]: ipv4[1]: expected string, got number");
    }
}
