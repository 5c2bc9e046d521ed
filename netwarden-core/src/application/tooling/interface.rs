use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::error::ToolInvokeError;

/// Catalogue entry advertised by the tool server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

/// Remote tool execution as seen by the agents.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Invoke `name` with a JSON object of arguments and return its text result.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolInvokeError>;

    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ToolInvokeError>;

    /// Usage guidance the server sent when the session was opened.
    async fn instructions(&self) -> Option<String> {
        None
    }
}
