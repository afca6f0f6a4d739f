//! State sink seam and the document-backed store behind the CLI

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::flat::FlatInstance;
use crate::schema;

/// Identity assigned to every successful read result
pub const RESULT_ID: &str = "0";

/// Narrow seam to the declarative engine's state store
///
/// The pipeline only ever sets computed collections and the result identity;
/// diffing and persistence belong to the host behind this trait.
pub trait StateSink {
    /// Store a computed collection under its schema key
    ///
    /// # Errors
    /// The sink rejects values that do not conform to the shape declared for
    /// the key.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Assign the identity of the overall result
    fn set_id(&mut self, id: &str);
}

/// Hand the full record collection to the sink and stamp the result identity
///
/// One call, all records: the sink does not support partial writes. The
/// identity is constant, marking that the read happened rather than what it
/// contained, and is assigned for an empty collection too.
///
/// # Errors
/// Returns [`StoreError::Write`] when the sink rejects the collection; the
/// identity is not assigned in that case.
pub fn write_instances(
    sink: &mut dyn StateSink,
    records: &[FlatInstance],
) -> Result<(), StoreError> {
    let value = serde_json::to_value(records).map_err(|e| StoreError::Write(e.to_string()))?;

    debug!(records = records.len(), "handing records to state sink");
    sink.set("instances", value)?;
    sink.set_id(RESULT_ID);

    Ok(())
}

/// Schema-validating state document
///
/// Plays the host store for the CLI and the tests: validates every `set`
/// against the declared shape and round-trips to a JSON state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDocument {
    /// Result identity of the last completed read
    pub id: Option<String>,
    /// Computed collections keyed by schema key
    #[serde(default)]
    pub collections: BTreeMap<String, Value>,
    /// When a collection was last stored
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl StateDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored `instances` collection, if a read has completed
    #[must_use]
    pub fn instances(&self) -> Option<&Value> {
        self.collections.get("instances")
    }

    /// Load a document from a JSON state file
    ///
    /// # Errors
    /// Returns [`StoreError::File`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| file_error(path, &e))?;
        serde_json::from_str(&content).map_err(|e| file_error(path, &e))
    }

    /// Write the document to a JSON state file
    ///
    /// # Errors
    /// Returns [`StoreError::File`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| file_error(path, &e))?;
        std::fs::write(path, content).map_err(|e| file_error(path, &e))
    }
}

fn file_error(path: &Path, cause: &dyn std::fmt::Display) -> StoreError {
    StoreError::File {
        path: path.display().to_string(),
        message: cause.to_string(),
    }
}

impl StateSink for StateDocument {
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        match key {
            "instances" => schema::validate_instances(&value).map_err(StoreError::Write)?,
            other => {
                return Err(StoreError::Write(format!("unknown collection {other:?}")));
            }
        }

        self.collections.insert(key.to_string(), value);
        self.refreshed_at = Some(Utc::now());
        Ok(())
    }

    fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }
}
