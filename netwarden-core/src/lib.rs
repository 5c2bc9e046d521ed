//! Ambient network-security monitoring and a conversational assistant, both
//! driven by a language model over an MCP diagnostics server.

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, alerting, client, monitor, pipeline, stdio, tooling};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use infrastructure::model;

use alerting::{AlertError, build_alert_sink};
use model::{ModelError, ProviderFactory};
use pipeline::Pipeline;
use std::sync::Arc;
use thiserror::Error;
use tooling::{McpHttpClient, ToolGateway, ToolInvokeError};

/// Failure while wiring collaborators from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Tools(#[from] ToolInvokeError),
    #[error(transparent)]
    Alerts(#[from] AlertError),
}

/// Collaborators shared by both agents, built once per process.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<AppConfig>,
    pub model: Arc<dyn model::ModelProvider>,
    pub tools: Arc<dyn ToolGateway>,
}

impl Services {
    pub fn from_config(config: AppConfig) -> Result<Self, SetupError> {
        let model = ProviderFactory::create(&config.llm)?;
        let tools: Arc<dyn ToolGateway> = Arc::new(McpHttpClient::new(&config.mcp)?);
        Ok(Self {
            config: Arc::new(config),
            model,
            tools,
        })
    }

    /// Monitoring pipeline with the configured alert sinks.
    pub fn pipeline(&self) -> Result<Pipeline, SetupError> {
        let alerts = build_alert_sink(&self.config.alerts)?;
        Ok(Pipeline::new(
            self.config.clone(),
            self.tools.clone(),
            self.model.clone(),
            alerts,
        ))
    }

    pub fn agent(&self) -> Result<agent::Agent, agent::AgentError> {
        agent::Agent::from_config(&self.config, self.model.clone(), self.tools.clone())
    }
}
