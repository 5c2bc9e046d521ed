//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Chat-completion backend. Implementations own their timeout policy.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier used in logs and errors
    fn id(&self) -> &str;

    /// Send an ordered list of role-tagged messages and return the reply
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
