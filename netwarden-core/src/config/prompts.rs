use serde::Deserialize;
use std::collections::BTreeMap;

use super::defaults::{DEFAULT_CHAT_MAX_STEPS, DEFAULT_CHAT_SYSTEM_PROMPT};
use super::error::ConfigError;
use super::template;

/// Prompt used by the `llm_analysis` step.
pub const ANOMALY_ANALYSIS: &str = "anomaly_analysis";
/// Prompt used by the `report` step.
pub const REPORT_GENERATION: &str = "report_generation";
/// Prompt used by the `baseline` step.
pub const BASELINE_LEARNING: &str = "baseline_learning";

/// A system prompt plus a user template with `{slot}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render to `(system, user)`, both trimmed.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<(String, String), ConfigError> {
        let system = self.system.trim().to_string();
        let user = template::render(self.user_template.trim(), vars)?;
        Ok((system, user))
    }
}

/// Named prompt templates from the `[prompts.*]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptsConfig {
    templates: BTreeMap<String, PromptTemplate>,
}

impl PromptsConfig {
    pub fn new(templates: BTreeMap<String, PromptTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn render(
        &self,
        name: &str,
        vars: &[(&str, &str)],
    ) -> Result<(String, String), ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::PromptNotFound {
                name: name.to_string(),
            })?
            .render(vars)
    }
}

/// Settings for the conversational agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// System prompt with `{target_host}` and `{target_username}` slots.
    pub system: String,
    pub max_steps: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_CHAT_SYSTEM_PROMPT.trim().to_string(),
            max_steps: DEFAULT_CHAT_MAX_STEPS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawChat {
    pub(super) system: Option<String>,
    pub(super) max_steps: Option<usize>,
}

impl From<RawChat> for ChatConfig {
    fn from(raw: RawChat) -> Self {
        let defaults = Self::default();
        Self {
            system: raw
                .system
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .unwrap_or(defaults.system),
            max_steps: raw.max_steps.unwrap_or(defaults.max_steps),
        }
    }
}
