// Shared fakes for the pipeline and conversational agent tests.
#![allow(dead_code)]

use async_trait::async_trait;
use netwarden_core::alerting::{AlertError, AlertSink};
use netwarden_core::config::AppConfig;
use netwarden_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use netwarden_core::tooling::{ToolGateway, ToolInfo, ToolInvokeError};
use netwarden_core::types::ChatMessage;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Tool server with a fixed reply per tool name.
#[derive(Default)]
pub struct FakeTools {
    replies: BTreeMap<String, Result<String, String>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, tool: &str, text: &str) -> Self {
        self.replies.insert(tool.to_string(), Ok(text.to_string()));
        self
    }

    /// The tool answers with a transport failure.
    pub fn fail(mut self, tool: &str, message: &str) -> Self {
        self.replies
            .insert(tool.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn called(&self, tool: &str) -> usize {
        self.calls().iter().filter(|(name, _)| name == tool).count()
    }
}

#[async_trait]
impl ToolGateway for FakeTools {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolInvokeError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((name.to_string(), arguments));
        match self.replies.get(name) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(ToolInvokeError::Transport {
                server: "fake".to_string(),
                message: message.clone(),
            }),
            None => Err(ToolInvokeError::UnknownTool {
                tool: name.to_string(),
                available: self.replies.keys().cloned().collect(),
            }),
        }
    }

    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ToolInvokeError> {
        Ok(self
            .replies
            .keys()
            .map(|name| ToolInfo {
                name: name.clone(),
                description: Some(format!("{name} diagnostics")),
                input_schema: None,
            })
            .collect())
    }
}

/// Model that plays back a queue of replies; `Err` entries fail the call.
#[derive(Default)]
pub struct FakeModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ModelProvider for FakeModel {
    fn id(&self) -> &str {
        "fake"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.messages);
        let next = self.replies.lock().expect("replies lock").pop_front();
        match next {
            Some(Ok(text)) => Ok(ModelResponse::new(text)),
            Some(Err(reason)) => Err(ModelError::invalid_response("fake", reason)),
            None => Err(ModelError::invalid_response("fake", "no scripted reply left")),
        }
    }
}

/// Sink that remembers every published batch.
#[derive(Default)]
pub struct RecordingSink {
    published: Mutex<Vec<Vec<String>>>,
}

impl RecordingSink {
    pub fn published(&self) -> Vec<Vec<String>> {
        self.published.lock().expect("published lock").clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, alerts: &[String]) -> Result<(), AlertError> {
        self.published
            .lock()
            .expect("published lock")
            .push(alerts.to_vec());
        Ok(())
    }
}

pub const PROMPTS: &str = r#"
[prompts.anomaly_analysis]
system = "You are a network security analyst."
user_template = "Analyze these anomalies:\n{anomalies_text}"

[prompts.report_generation]
system = "You write incident reports."
user_template = """
Anomalies: {anomalies}
Investigation: {investigation_results}
Analysis: {llm_analysis}
"""

[prompts.baseline_learning]
system = "You learn normal traffic."
user_template = "Stats: {current_stats}\nBaseline: {baseline}"
"#;

/// Complete configuration whose alert log lives at `log_file`.
pub fn config_with(log_file: &Path, prompts: &str, alerts_enabled: bool) -> Arc<AppConfig> {
    let toml = format!(
        r#"
[llm]
base_url = "http://llm.invalid/v1"
model = "scout"

[mcp]
endpoint = "http://mcp.invalid/mcp"

[target]
host = "web-01"
username = "ops"

[agent]
monitoring_interval = 30
analysis_window = 5

[alerts]
enabled = {alerts_enabled}
log_file = "{}"

{prompts}
"#,
        log_file.display()
    );
    Arc::new(AppConfig::from_toml_str(&toml).expect("test config parses"))
}

pub fn config(log_file: &Path) -> Arc<AppConfig> {
    config_with(log_file, PROMPTS, true)
}
