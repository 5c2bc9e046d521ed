//! # Language-model configuration
//!
//! The `[llm]` table selects the chat-completion backend used by both agents.
//!
//! | `provider` | API format | Auth |
//! |------------|------------|------|
//! | `openai` (default) | `POST {base_url}/chat/completions` | bearer `api_key` |
//! | `ollama` | `POST {base_url}/api/chat` | none |
//!
//! # Example
//!
//! ```toml
//! [llm]
//! base_url = "https://llama-stack.example.com/v1/openai/v1"
//! model = "llama-4-scout-17b-16e-w4a16"
//! api_key = "not-needed"
//! temperature = 0.1
//! max_tokens = 2000
//! ```

use super::defaults::{
    DEFAULT_LLM_API_KEY, DEFAULT_LLM_MAX_TOKENS, DEFAULT_LLM_PROVIDER, DEFAULT_LLM_TEMPERATURE,
    DEFAULT_LLM_TIMEOUT_SECS,
};
use super::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Wire format spoken by the configured model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
}

impl ProviderKind {
    /// Infer the API format from a provider type string.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "openai" | "openai-compatible" | "llamastack" | "vllm" => Some(Self::OpenAi),
            "ollama" | "localai" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawLlm {
    pub(super) provider: Option<String>,
    pub(super) base_url: Option<String>,
    pub(super) model: Option<String>,
    pub(super) api_key: Option<String>,
    pub(super) temperature: Option<f32>,
    pub(super) max_tokens: Option<u32>,
    pub(super) timeout_secs: Option<u64>,
}

impl TryFrom<RawLlm> for LlmConfig {
    type Error = ConfigError;

    fn try_from(raw: RawLlm) -> Result<Self, Self::Error> {
        let provider_raw = raw
            .provider
            .unwrap_or_else(|| DEFAULT_LLM_PROVIDER.to_string());
        let provider =
            ProviderKind::parse(&provider_raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "llm.provider",
                reason: format!("unsupported provider type '{provider_raw}'"),
            })?;

        let base_url = raw
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("llm", "base_url"))?;
        let model = raw
            .model
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("llm", "model"))?;

        let temperature = raw.temperature.unwrap_or(DEFAULT_LLM_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature",
                reason: format!("{temperature} is outside 0.0..=2.0"),
            });
        }

        Ok(Self {
            provider,
            base_url,
            model,
            api_key: raw
                .api_key
                .unwrap_or_else(|| DEFAULT_LLM_API_KEY.to_string()),
            temperature,
            max_tokens: raw.max_tokens.unwrap_or(DEFAULT_LLM_MAX_TOKENS),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)),
        })
    }
}
