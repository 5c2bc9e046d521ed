use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "netwarden",
    version,
    about = "Ambient network-security agent and conversational assistant over MCP"
)]
pub struct Cli {
    /// Configuration file (defaults to config.toml, ../config.toml, /etc/netwarden/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = RunMode::Ambient)]
    pub mode: RunMode,
    /// Ambient mode: run a single cycle and exit
    #[arg(long)]
    pub once: bool,
    /// Chat mode: one-shot question (interactive when empty)
    #[arg()]
    pub prompt: Vec<String>,
}

impl Cli {
    pub fn prompt_text(&self) -> Option<String> {
        let joined = self.prompt.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// Scheduled monitoring pipeline
    Ambient,
    /// Tool-using conversational assistant
    Chat,
}
