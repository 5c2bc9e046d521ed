use super::{AlertError, AlertSink};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// Fans alerts out to several sinks in order.
///
/// Every sink is attempted; the first failure is returned after all have run.
pub struct CompositeAlertSink {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl CompositeAlertSink {
    pub fn new(sinks: Vec<Arc<dyn AlertSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl AlertSink for CompositeAlertSink {
    fn name(&self) -> &str {
        "composite"
    }

    async fn publish(&self, alerts: &[String]) -> Result<(), AlertError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.publish(alerts).await {
                error!(sink = sink.name(), %err, "Alert delivery failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
