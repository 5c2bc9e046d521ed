use crate::config::defaults::DEFAULT_CHAT_MAX_STEPS;
use serde::Serialize;
use serde_json::Value;

/// One tool invocation made while answering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub input: Value,
    pub success: bool,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    pub session_id: String,
    pub response: String,
    pub steps: Vec<AgentStep>,
}

#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Continue an existing conversation instead of starting a new one.
    pub session_id: Option<String>,
    pub max_steps: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            session_id: None,
            max_steps: DEFAULT_CHAT_MAX_STEPS,
        }
    }
}
