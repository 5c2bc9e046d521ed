use super::{AlertError, AlertSink};
use crate::constants::ALERT_SEPARATOR_WIDTH;
use crate::domain::iso_timestamp;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Append-only text log of alert blocks.
#[derive(Debug, Clone)]
pub struct FileAlertSink {
    path: PathBuf,
}

impl FileAlertSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> AlertError {
        AlertError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Renders one log block: separator, timestamp header, separator, then each alert on its own line.
pub fn format_alert_block(timestamp: &str, alerts: &[String]) -> String {
    let separator = "=".repeat(ALERT_SEPARATOR_WIDTH);
    let mut block = format!("\n{separator}\nAlert at {timestamp}\n{separator}\n");
    for alert in alerts {
        block.push_str(alert);
        block.push('\n');
    }
    block
}

#[async_trait]
impl AlertSink for FileAlertSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn publish(&self, alerts: &[String]) -> Result<(), AlertError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        let block = format_alert_block(&iso_timestamp(), alerts);
        file.write_all(block.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), alerts = alerts.len(), "Alert written");
        Ok(())
    }
}
