//! Refresh orchestration: read the source tool, project, write state

use chrono::{DateTime, Utc};
use mpstate_multipass::{Info, MultipassClient};
use tracing::{debug, info, instrument, warn};

use crate::error::RefreshError;
use crate::flat::project_instances;
use crate::sink::{StateSink, write_instances};

/// Outcome of one completed refresh
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Number of instance records written
    pub instances: usize,
    /// Errors the source tool reported alongside its payload
    pub warnings: Vec<String>,
    /// When the refresh completed
    pub refreshed_at: DateTime<Utc>,
}

/// Drives the full read cycle against one multipass client
pub struct Refresher {
    client: MultipassClient,
}

impl Refresher {
    /// Create a refresher over the given client
    #[must_use]
    pub fn new(client: MultipassClient) -> Self {
        Self { client }
    }

    /// Run one full refresh: fetch, decode, project, write
    ///
    /// Instance records reach the sink in a single call, so a sink never
    /// observes a partial collection. Errors the source tool reports next to
    /// its payload do not fail the refresh; they are logged and surfaced on
    /// the report.
    ///
    /// # Errors
    /// Returns [`RefreshError::Inventory`] when the read or decode fails and
    /// [`RefreshError::Store`] when the sink rejects the records. Nothing is
    /// written once any stage has failed.
    #[instrument(skip(self, sink), level = "debug")]
    pub async fn run(&self, sink: &mut dyn StateSink) -> Result<RefreshReport, RefreshError> {
        let Info {
            errors: warnings,
            info,
        } = self.client.fetch_info().await?;

        if let Ok(pretty) = serde_json::to_string_pretty(&info) {
            debug!(instances = info.len(), "decoded instance map:\n{pretty}");
        }
        for warning in &warnings {
            warn!(warning = %warning, "source tool reported an error");
        }

        let records = project_instances(info);
        if let Ok(pretty) = serde_json::to_string_pretty(&records) {
            debug!(records = records.len(), "projected records:\n{pretty}");
        }

        write_instances(sink, &records)?;

        let report = RefreshReport {
            instances: records.len(),
            warnings,
            refreshed_at: Utc::now(),
        };
        info!(instances = report.instances, "state refreshed");
        Ok(report)
    }
}
