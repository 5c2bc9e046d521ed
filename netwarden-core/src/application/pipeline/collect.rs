use super::Pipeline;
use super::record::MonitoringRecord;
use super::routing::has_severity_marker;
use crate::application::tooling::ToolInvokeError;
use crate::constants::{TOOL_DETECT_ANOMALIES, TOOL_EVENT_STATS, TOOL_EVENTS_HISTORY};
use crate::domain::iso_timestamp;
use tracing::{error, info};

impl Pipeline {
    /// Fetches recent events and stats. A failed fetch leaves an `Error: ...`
    /// marker in `current_events` and clears `current_stats`.
    pub async fn monitor(&self, record: MonitoringRecord) -> MonitoringRecord {
        info!(iteration = record.iteration, "Monitoring network events");

        match self.fetch_events_and_stats().await {
            Ok((events, stats)) => {
                info!(
                    events_chars = events.len(),
                    stats_chars = stats.len(),
                    "Fetched network data"
                );
                record.with_fetch(events, stats, iso_timestamp())
            }
            Err(err) => {
                error!(%err, "Failed to fetch events");
                record.with_fetch(format!("Error: {err}"), "", iso_timestamp())
            }
        }
    }

    async fn fetch_events_and_stats(&self) -> Result<(String, String), ToolInvokeError> {
        let window = self.config.agent.analysis_window;
        let events = self
            .tools
            .call_tool(TOOL_EVENTS_HISTORY, self.tool_arguments(window))
            .await?;
        let stats = self
            .tools
            .call_tool(TOOL_EVENT_STATS, self.tool_arguments(window))
            .await?;
        Ok((events, stats))
    }

    /// Runs the remote anomaly detector; any severity marker makes the whole
    /// output a single anomaly.
    pub async fn analyze(&self, record: MonitoringRecord) -> MonitoringRecord {
        info!("Analyzing for anomalies");

        let arguments = self.tool_arguments(self.config.agent.analysis_window);
        let anomalies = match self.tools.call_tool(TOOL_DETECT_ANOMALIES, arguments).await {
            Ok(text) if has_severity_marker(&text) => vec![text],
            Ok(_) => Vec::new(),
            Err(err) => {
                error!(%err, "Failed to analyze anomalies");
                Vec::new()
            }
        };

        info!(anomalies = anomalies.len(), "Analysis complete");
        record.with_anomalies(anomalies)
    }

    /// Process-level investigation is not implemented; always yields no PIDs.
    pub fn investigate(&self, record: MonitoringRecord) -> MonitoringRecord {
        info!("Investigating suspicious processes");
        record.with_investigated_pids(Vec::new())
    }
}
