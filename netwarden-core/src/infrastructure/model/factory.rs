//! Provider factory - creates clients from config

use super::clients::{OllamaClient, OpenAIClient};
use super::traits::ModelProvider;
use super::types::ModelError;
use crate::config::{LlmConfig, ProviderKind};
use std::sync::Arc;
use tracing::info;

/// Factory for creating model clients from the `[llm]` section.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// - `ollama` → Ollama `/api/chat` format
    /// - everything else → OpenAI-compatible `/chat/completions`
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn ModelProvider>, ModelError> {
        info!(
            provider = config.provider.as_str(),
            model = config.model.as_str(),
            base_url = config.base_url.as_str(),
            "Initializing LLM client"
        );
        let client: Arc<dyn ModelProvider> = match config.provider {
            ProviderKind::Ollama => Arc::new(OllamaClient::from_config(config)?),
            ProviderKind::OpenAi => Arc::new(OpenAIClient::from_config(config)?),
        };
        Ok(client)
    }
}
