use super::alerts::{AgentSettings, AlertsConfig, RawAgent, RawAlerts};
use super::defaults::{DEFAULT_ANALYSIS_WINDOW_MINUTES, DEFAULT_MONITORING_INTERVAL_SECS};
use super::error::ConfigError;
use super::llm::{LlmConfig, RawLlm};
use super::mcp::{McpConfig, RawMcp, RawTarget, TargetConfig};
use super::prompts::{ChatConfig, PromptTemplate, PromptsConfig, RawChat};
use crate::constants::{CONFIG_SEARCH_PATHS, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub mcp: RawMcp,
    #[serde(default)]
    pub target: RawTarget,
    #[serde(default)]
    pub agent: RawAgent,
    #[serde(default)]
    pub alerts: RawAlerts,
    #[serde(default)]
    pub prompts: BTreeMap<String, PromptTemplate>,
    #[serde(default)]
    pub chat: RawChat,
}

/// Ensures environment variables are loaded from `.env`
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path, or the first default
/// location that exists.
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = resolve_path(path)?;
    let content = read_file(&config_path)?;
    let config = parse_config(&content, &config_path, |name| env::var(name).ok())?;
    info!(path = %config_path.display(), "Configuration loaded");
    Ok(config)
}

/// Parse TOML text, apply overrides from `lookup`, and validate.
pub(super) fn parse_config<F>(
    content: &str,
    path: &Path,
    lookup: F,
) -> Result<super::AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    apply_env_overrides(&mut parsed, lookup);
    validate_and_build(parsed, Some(path.to_path_buf()))
}

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::NotFound {
            searched: vec![path.to_path_buf()],
        });
    }

    let candidates: Vec<PathBuf> = CONFIG_SEARCH_PATHS.iter().map(PathBuf::from).collect();
    let found = candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned();
    found.ok_or(ConfigError::NotFound {
        searched: candidates,
    })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                searched: vec![path.to_path_buf()],
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Environment variables take precedence over the file. Empty values are
/// treated as unset.
fn apply_env_overrides<F>(config: &mut RawConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(value) = get("LLAMASTACK_BASE_URL") {
        config.llm.base_url = Some(value);
    }
    if let Some(value) = get("LLAMASTACK_API_KEY") {
        config.llm.api_key = Some(value);
    }
    if let Some(value) = get("LLAMASTACK_MODEL") {
        config.llm.model = Some(value);
    }
    if let Some(value) = get("MCP_ENDPOINT") {
        config.mcp.endpoint = Some(value);
    }
    if let Some(value) = get("TARGET_HOST") {
        config.target.host = Some(value);
    }
    if let Some(value) = get("TARGET_USERNAME") {
        config.target.username = Some(value);
    }
    if let Some(value) = get("SLACK_WEBHOOK_URL") {
        config.alerts.slack_webhook = Some(value);
    }
    if let Some(value) = get("ALERT_EMAIL") {
        config.alerts.email = Some(value);
    }
}

fn validate_and_build(
    parsed: RawConfig,
    source: Option<PathBuf>,
) -> Result<super::AppConfig, ConfigError> {
    let llm = LlmConfig::try_from(parsed.llm)?;
    let mcp = McpConfig::try_from(parsed.mcp)?;
    let target = TargetConfig::try_from(parsed.target)?;

    let agent = AgentSettings {
        monitoring_interval: parsed
            .agent
            .monitoring_interval
            .unwrap_or(DEFAULT_MONITORING_INTERVAL_SECS),
        analysis_window: parsed
            .agent
            .analysis_window
            .unwrap_or(DEFAULT_ANALYSIS_WINDOW_MINUTES),
    };
    if agent.analysis_window == 0 {
        return Err(ConfigError::InvalidValue {
            field: "agent.analysis_window",
            reason: "window must be at least one minute".to_string(),
        });
    }

    let chat = ChatConfig::from(parsed.chat);
    if chat.max_steps == 0 {
        return Err(ConfigError::InvalidValue {
            field: "chat.max_steps",
            reason: "the agent needs at least one tool step".to_string(),
        });
    }

    Ok(super::AppConfig {
        llm,
        mcp,
        target,
        agent,
        alerts: AlertsConfig::from(parsed.alerts),
        prompts: PromptsConfig::new(parsed.prompts),
        chat,
        source,
    })
}
