use serde::Deserialize;
use std::collections::BTreeMap;

use super::error::ConfigError;

/// Connection settings for the remote MCP diagnostics server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpConfig {
    pub endpoint: String,
    /// Extra HTTP headers sent with every MCP request.
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawMcp {
    pub(super) endpoint: Option<String>,
    #[serde(default)]
    pub(super) headers: BTreeMap<String, String>,
}

impl TryFrom<RawMcp> for McpConfig {
    type Error = ConfigError;

    fn try_from(raw: RawMcp) -> Result<Self, Self::Error> {
        let endpoint = raw
            .endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::missing("mcp", "endpoint"))?;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "mcp.endpoint",
                reason: format!("'{endpoint}' is not an http(s) URL"),
            });
        }

        let headers = raw
            .headers
            .into_iter()
            .map(|(name, value)| (name, expand(&value)))
            .collect();

        Ok(Self { endpoint, headers })
    }
}

/// Target host the diagnostics tools operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub host: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawTarget {
    pub(super) host: Option<String>,
    pub(super) username: Option<String>,
}

impl TryFrom<RawTarget> for TargetConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        Ok(Self {
            host: raw
                .host
                .filter(|host| !host.trim().is_empty())
                .ok_or_else(|| ConfigError::missing("target", "host"))?,
            username: raw
                .username
                .filter(|user| !user.trim().is_empty())
                .ok_or_else(|| ConfigError::missing("target", "username"))?,
        })
    }
}

pub(super) fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
