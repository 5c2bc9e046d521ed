use crate::application::tooling::ToolInvokeError;
use crate::config::ConfigError;
use crate::infrastructure::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to load tool catalogue: {0}")]
    Catalogue(#[from] ToolInvokeError),
    #[error("system prompt could not be rendered: {0}")]
    Prompt(#[from] ConfigError),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("agent exceeded the maximum of {max_steps} tool interactions")]
    StepLimit { max_steps: usize },
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Model(err) => err.user_message(),
            AgentError::Catalogue(err) => format!("The diagnostics server is unreachable: {err}"),
            AgentError::Prompt(err) => format!("Configuration problem: {err}"),
            AgentError::InvalidResponse(_) => {
                "The model returned a response that could not be understood. Please try again."
                    .to_string()
            }
            AgentError::StepLimit { .. } => {
                "The question needed too many tool calls. Try narrowing it down.".to_string()
            }
        }
    }
}
