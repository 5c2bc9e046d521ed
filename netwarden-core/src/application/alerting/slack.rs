use super::{AlertError, AlertSink};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Posts each alert to a Slack incoming webhook.
pub struct SlackAlertSink {
    client: Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
    username: &'static str,
    icon_emoji: &'static str,
}

impl SlackAlertSink {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(AlertError::Client)?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl AlertSink for SlackAlertSink {
    fn name(&self) -> &str {
        "slack"
    }

    async fn publish(&self, alerts: &[String]) -> Result<(), AlertError> {
        for alert in alerts {
            let payload = SlackPayload {
                text: alert,
                username: "netwarden",
                icon_emoji: ":rotating_light:",
            };
            let response = self
                .client
                .post(&self.webhook_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| AlertError::Webhook(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AlertError::Webhook(format!(
                    "Slack returned {status}: {body}"
                )));
            }
        }
        info!(alerts = alerts.len(), "Slack notification sent");
        Ok(())
    }
}
