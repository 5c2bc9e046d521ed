use super::alerts::{AgentSettings, AlertsConfig};
use super::error::ConfigError;
use super::llm::LlmConfig;
use super::mcp::{McpConfig, TargetConfig};
use super::prompts::{ChatConfig, PromptsConfig};
use super::template;
use std::path::{Path, PathBuf};

/// Application configuration loaded from `config.toml`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub mcp: McpConfig,
    pub target: TargetConfig,
    pub agent: AgentSettings,
    pub alerts: AlertsConfig,
    pub prompts: PromptsConfig,
    pub chat: ChatConfig,
    /// File the configuration was read from, if any.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a file path (or the default search paths if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text, applying process environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::ensure_env_loaded();
        let mut config = super::loader::parse_config(content, Path::new("<inline>"), |name| {
            std::env::var(name).ok()
        })?;
        config.source = None;
        Ok(config)
    }

    /// Render a named prompt into `(system, user)` texts.
    pub fn prompt(&self, name: &str, vars: &[(&str, &str)]) -> Result<(String, String), ConfigError> {
        self.prompts.render(name, vars)
    }

    /// The conversational system prompt with the target filled in.
    pub fn chat_system_prompt(&self) -> Result<String, ConfigError> {
        template::render(
            &self.chat.system,
            &[
                ("target_host", self.target.host.as_str()),
                ("target_username", self.target.username.as_str()),
            ],
        )
    }
}
