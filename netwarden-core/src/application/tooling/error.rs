use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("MCP endpoint '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP endpoint '{server}' answered HTTP {status}: {body}")]
    HttpStatus {
        server: String,
        status: u16,
        body: String,
    },
    #[error("MCP endpoint '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP endpoint '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP endpoint '{server}' sent no response for '{method}'")]
    MissingResponse { server: String, method: String },
    #[error("MCP session at '{server}' expired")]
    SessionExpired { server: String },
    #[error("tool '{tool}' reported an error: {message}")]
    ToolFailed { tool: String, message: String },
    #[error("tool '{tool}' is not offered by the server (available: {})", available.join(", "))]
    UnknownTool {
        tool: String,
        available: Vec<String>,
    },
}

impl ToolInvokeError {
    /// Errors after which the current session can no longer be trusted.
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self,
            ToolInvokeError::Transport { .. }
                | ToolInvokeError::HttpStatus { .. }
                | ToolInvokeError::MissingResponse { .. }
                | ToolInvokeError::SessionExpired { .. }
        )
    }
}
