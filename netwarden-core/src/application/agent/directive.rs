use serde_json::Value;

/// What the model asked the agent to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDirective {
    Final { response: String },
    CallTool { tool: String, input: Value },
}
