pub mod alerts;
pub mod app;
pub mod defaults;
pub mod error;
pub mod llm;
pub mod loader;
pub mod mcp;
pub mod prompts;
pub mod template;

pub use alerts::{AgentSettings, AlertsConfig};
pub use app::AppConfig;
pub use error::ConfigError;
pub use llm::{LlmConfig, ProviderKind};
pub use mcp::{McpConfig, TargetConfig};
pub use prompts::{
    ANOMALY_ANALYSIS, BASELINE_LEARNING, ChatConfig, PromptTemplate, PromptsConfig,
    REPORT_GENERATION,
};
