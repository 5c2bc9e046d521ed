use super::Pipeline;
use super::record::MonitoringRecord;
use tracing::{error, info};

impl Pipeline {
    /// Publishes `alerts` to the configured sink. Delivery failures are
    /// logged only; the record passes through untouched either way.
    pub async fn alert(&self, record: MonitoringRecord) -> MonitoringRecord {
        info!("Sending alerts");
        if !self.config.alerts.enabled {
            info!("Alerts disabled in config");
            return record;
        }

        if let Err(err) = self.alerts.publish(&record.alerts).await {
            error!(sink = self.alerts.name(), %err, "Failed to write alert");
        }
        record
    }
}
