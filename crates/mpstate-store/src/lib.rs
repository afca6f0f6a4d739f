//! mpstate-store: projection and state persistence
//!
//! Flattens the decoded inventory into ordered, schema-validated records and
//! hands them to a state sink. One refresh = one fetch-decode-project-write
//! cycle; nothing is kept between cycles.

pub mod error;
pub mod flat;
pub mod refresh;
pub mod schema;
pub mod sink;

pub use error::{RefreshError, StoreError};
pub use flat::{
    FlatDisk, FlatInstance, FlatMount, flatten_disks, flatten_mounts, project_instances,
};
pub use refresh::{RefreshReport, Refresher};
pub use sink::{RESULT_ID, StateDocument, StateSink, write_instances};
