pub const DEFAULT_LLM_PROVIDER: &str = "openai";
pub const DEFAULT_LLM_API_KEY: &str = "not-needed";
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MONITORING_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_ANALYSIS_WINDOW_MINUTES: u64 = 5;
pub const DEFAULT_CHAT_MAX_STEPS: usize = 8;
pub const DEFAULT_CHAT_SYSTEM_PROMPT: &str = r#"
You are a network security assistant for the Linux host {target_host}.
Use the available diagnostics tools to answer questions about network activity.
When a tool needs a host or username, use host "{target_host}" and username "{target_username}".
Base every answer on tool output and say plainly when the data is inconclusive.
"#;
