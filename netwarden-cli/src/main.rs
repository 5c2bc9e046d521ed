mod cli;

use clap::Parser;
use cli::{Cli, RunMode};
use netwarden_core::monitor::Monitor;
use netwarden_core::{AppConfig, Services, stdio};
use serde_json::json;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let interactive = cli.mode == RunMode::Chat && cli.prompt_text().is_none();
    init_tracing(interactive);
    debug!(mode = ?cli.mode, config = ?cli.config, once = cli.once, "CLI arguments parsed");

    let config = AppConfig::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("Loaded configuration"),
    }
    let services = Services::from_config(config)?;

    match cli.mode {
        RunMode::Ambient => {
            let monitor = Monitor::new(services.pipeline()?);
            if cli.once {
                monitor.run_once().await?;
            } else {
                monitor.run_forever(shutdown_signal()).await;
            }
        }
        RunMode::Chat => {
            let agent = services.agent()?;
            match cli.prompt_text() {
                Some(prompt) => {
                    info!("Executing agent workflow from CLI");
                    let outcome = agent.run(prompt, agent.options(None)).await?;
                    let output = json!({
                        "session_id": outcome.session_id,
                        "content": outcome.response,
                        "tool_steps": outcome.steps,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                None => {
                    info!("Launching interactive chat");
                    stdio::run(&agent).await?;
                }
            }
        }
    }
    info!("Execution finished");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Agent stopped by user"),
        Err(err) => {
            tracing::error!(%err, "Failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Interactive chat defaults to `warn`; everything else to `info`. `RUST_LOG` wins.
fn init_tracing(interactive: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let default_level = if interactive { "warn" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
