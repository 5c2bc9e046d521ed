use super::directive::AgentDirective;
use super::errors::AgentError;
use super::models::{AgentOptions, AgentOutcome, AgentStep};
use super::runtime::ToolRuntime;
use super::runtime::instructions::{JSON_RETRY_MESSAGE, TOOL_RESULT_INSTRUCTION};
use crate::application::client::{ChatClient, ChatRequest, summarise};
use crate::application::tooling::ToolGateway;
use crate::config::AppConfig;
use crate::infrastructure::model::ModelProvider;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum correction requests after a malformed directive
const MAX_JSON_RETRIES: u8 = 3;

pub struct Agent {
    client: ChatClient,
    runtime: ToolRuntime,
    system_prompt: String,
    max_steps: usize,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        gateway: Arc<dyn ToolGateway>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: ChatClient::new(provider),
            runtime: ToolRuntime::new(gateway),
            system_prompt: system_prompt.into(),
            max_steps: AgentOptions::default().max_steps,
        }
    }

    /// Builds the agent from `[chat]`, with the target filled into the prompt.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn ModelProvider>,
        gateway: Arc<dyn ToolGateway>,
    ) -> Result<Self, AgentError> {
        let system_prompt = config.chat_system_prompt()?;
        let mut agent = Self::new(provider, gateway, system_prompt);
        agent.max_steps = config.chat.max_steps;
        Ok(agent)
    }

    /// Options carrying the configured step budget.
    pub fn options(&self, session_id: Option<String>) -> AgentOptions {
        AgentOptions {
            session_id,
            max_steps: self.max_steps,
        }
    }

    pub async fn reset(&self, session_id: &str) -> bool {
        self.client.reset(session_id).await
    }

    pub async fn run(&self, prompt: String, options: AgentOptions) -> Result<AgentOutcome, AgentError> {
        info!(prompt = %summarise(&prompt), "Agent run started");

        let context = self.runtime.build_context().await?;
        let system_prompt = self
            .runtime
            .compose_system_instructions(&self.system_prompt, &context);
        debug!(tools = context.tools.len(), "Tool catalogue loaded");

        let mut session_id = options.session_id;
        let mut next_prompt = prompt;
        let mut remaining_steps = options.max_steps;
        let mut steps = Vec::new();

        loop {
            debug!(
                session = session_id.as_deref(),
                remaining_steps, "Submitting agent turn to model provider"
            );
            let result = self
                .client
                .chat(ChatRequest {
                    prompt: next_prompt,
                    system_prompt: Some(system_prompt.clone()),
                    session_id: session_id.clone(),
                })
                .await?;
            session_id = Some(result.session_id.clone());

            let directive = self
                .parse_with_retry(&result.content, &system_prompt, &result.session_id)
                .await?;

            match directive {
                AgentDirective::Final { response } => {
                    info!(
                        session_id = result.session_id.as_str(),
                        steps = steps.len(),
                        "Agent returned final response"
                    );
                    return Ok(AgentOutcome {
                        session_id: result.session_id,
                        response,
                        steps,
                    });
                }
                AgentDirective::CallTool { tool, input } => {
                    if remaining_steps == 0 {
                        warn!(max_steps = options.max_steps, "Agent exceeded max tool interactions");
                        return Err(AgentError::StepLimit {
                            max_steps: options.max_steps,
                        });
                    }
                    remaining_steps -= 1;
                    info!(tool = %tool, "Agent requested tool execution");
                    let execution = self.runtime.execute(&tool, input).await;

                    next_prompt = json!({
                        "tool_result": {
                            "tool": execution.tool,
                            "input": execution.input,
                            "success": execution.success,
                            "output": execution.output,
                        },
                        "instruction": TOOL_RESULT_INSTRUCTION,
                    })
                    .to_string();

                    steps.push(AgentStep {
                        tool: execution.tool,
                        input: execution.input,
                        success: execution.success,
                        output: execution.output,
                    });
                }
            }
        }
    }

    /// Parse the directive, asking the model to correct malformed JSON
    async fn parse_with_retry(
        &self,
        content: &str,
        system_prompt: &str,
        session_id: &str,
    ) -> Result<AgentDirective, AgentError> {
        let mut retry_count = 0u8;
        let mut current_content = content.to_string();

        loop {
            match self.runtime.parse_agent_action(&current_content) {
                Ok(directive) => return Ok(directive),
                Err(e) if retry_count < MAX_JSON_RETRIES => {
                    retry_count += 1;
                    warn!(
                        attempt = retry_count,
                        max_attempts = MAX_JSON_RETRIES,
                        error = %e,
                        "JSON parse failed, requesting correction from model"
                    );

                    let retry = self
                        .client
                        .chat(ChatRequest {
                            prompt: format!("{JSON_RETRY_MESSAGE}\n\nError details: {e}"),
                            system_prompt: Some(system_prompt.to_string()),
                            session_id: Some(session_id.to_string()),
                        })
                        .await
                        .map_err(|chat_err| {
                            AgentError::InvalidResponse(format!(
                                "failed to get correction after JSON parse error: {chat_err}"
                            ))
                        })?;
                    current_content = retry.content;
                }
                Err(e) => {
                    warn!(attempts = retry_count, "JSON parse failed after max retries");
                    return Err(AgentError::InvalidResponse(format!(
                        "invalid JSON after {MAX_JSON_RETRIES} retry attempts: {e}"
                    )));
                }
            }
        }
    }
}
