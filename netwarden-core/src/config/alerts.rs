use serde::Deserialize;
use std::path::PathBuf;

use super::mcp::expand;
use crate::constants::DEFAULT_ALERT_LOG;

/// Where and whether alerts are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertsConfig {
    pub enabled: bool,
    pub log_file: PathBuf,
    pub slack_webhook: Option<String>,
    pub email: Option<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from(DEFAULT_ALERT_LOG),
            slack_webhook: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawAlerts {
    pub(super) enabled: Option<bool>,
    pub(super) log_file: Option<String>,
    pub(super) slack_webhook: Option<String>,
    pub(super) email: Option<String>,
}

impl From<RawAlerts> for AlertsConfig {
    fn from(raw: RawAlerts) -> Self {
        let defaults = Self::default();
        Self {
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            log_file: raw
                .log_file
                .filter(|path| !path.trim().is_empty())
                .map(|path| PathBuf::from(expand(&path)))
                .unwrap_or(defaults.log_file),
            slack_webhook: raw.slack_webhook.filter(|url| !url.trim().is_empty()),
            email: raw.email.filter(|addr| !addr.trim().is_empty()),
        }
    }
}

/// Scheduling knobs for the ambient agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    /// Seconds to sleep between cycles in continuous mode.
    pub monitoring_interval: u64,
    /// Minutes of history each cycle asks the diagnostics tools for.
    pub analysis_window: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawAgent {
    pub(super) monitoring_interval: Option<u64>,
    pub(super) analysis_window: Option<u64>,
}
