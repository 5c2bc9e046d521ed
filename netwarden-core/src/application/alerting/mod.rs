//! Alert delivery.
//!
//! The pipeline hands the rendered reports to one [`AlertSink`]. The durable
//! log file is always present; a Slack webhook joins it when configured.

mod composite;
mod error;
mod file;
mod slack;

pub use composite::CompositeAlertSink;
pub use error::AlertError;
pub use file::{FileAlertSink, format_alert_block};
pub use slack::SlackAlertSink;

use crate::config::AlertsConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Short channel name used in logs.
    fn name(&self) -> &str;

    async fn publish(&self, alerts: &[String]) -> Result<(), AlertError>;
}

/// Builds the sink chain described by `[alerts]`.
pub fn build_alert_sink(config: &AlertsConfig) -> Result<Arc<dyn AlertSink>, AlertError> {
    let mut sinks: Vec<Arc<dyn AlertSink>> =
        vec![Arc::new(FileAlertSink::new(config.log_file.clone()))];
    if let Some(webhook) = &config.slack_webhook {
        sinks.push(Arc::new(SlackAlertSink::new(webhook.clone())?));
    }
    if let Some(email) = &config.email {
        warn!(email = email.as_str(), "Email delivery is not supported; alerts go to the log file");
    }
    if sinks.len() == 1 {
        return Ok(sinks.remove(0));
    }
    Ok(Arc::new(CompositeAlertSink::new(sinks)))
}
