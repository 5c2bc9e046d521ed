mod catalogue;
mod execution;
pub(super) mod instructions;
mod parser;

use std::sync::Arc;

use crate::application::tooling::ToolGateway;

pub(super) use super::context::{ToolContext, ToolDescriptor};
pub(super) use super::directive::AgentDirective;
pub(super) use super::errors::AgentError;
pub(super) use serde_json::Value;

/// Bridges the agent loop to the tool gateway.
pub struct ToolRuntime {
    gateway: Arc<dyn ToolGateway>,
}

impl ToolRuntime {
    pub fn new(gateway: Arc<dyn ToolGateway>) -> Self {
        Self { gateway }
    }
}
