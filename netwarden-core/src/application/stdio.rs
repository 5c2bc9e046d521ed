//! Interactive terminal front-end for the conversational agent.

use super::agent::{Agent, AgentOutcome, AgentStep};
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Default)]
struct SessionState {
    session_id: Option<String>,
    last_steps: Vec<AgentStep>,
}

impl SessionState {
    fn update_session(&mut self, session_id: String) -> bool {
        let changed = self.session_id.as_deref() != Some(session_id.as_str());
        self.session_id = Some(session_id);
        changed
    }
}

enum LoopControl {
    Continue,
    Exit,
}

/// Runs the prompt loop on the process's stdin/stdout.
pub async fn run(agent: &Agent) -> Result<(), StdioError> {
    let mut stdout = io::stdout();
    run_with(agent, BufReader::new(io::stdin()), &mut stdout).await
}

/// Prompt loop over arbitrary streams. Ends on `/exit` or end of input.
pub async fn run_with<R, W>(agent: &Agent, input: R, out: &mut W) -> Result<(), StdioError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut state = SessionState::default();

    print_banner(out).await?;

    loop {
        out.write_all(b"netwarden> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            write_line(out, "\nInput closed. Bye.").await?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match handle_command(input, &mut state, agent, out).await? {
                LoopControl::Continue => continue,
                LoopControl::Exit => break,
            }
        } else {
            handle_prompt(agent, &mut state, input.to_string(), out).await?;
        }
    }

    out.flush().await?;
    Ok(())
}

async fn handle_command<W: AsyncWrite + Unpin>(
    input: &str,
    state: &mut SessionState,
    agent: &Agent,
    out: &mut W,
) -> Result<LoopControl, StdioError> {
    let name = input
        .trim_start_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    debug!(command = %name, "Processing interactive command");

    match name.as_str() {
        "help" | "?" => print_help(out).await?,
        "exit" | "quit" | "q" => {
            write_line(out, "Closing session.").await?;
            return Ok(LoopControl::Exit);
        }
        "reset" | "clear" => {
            if let Some(session_id) = state.session_id.take() {
                agent.reset(&session_id).await;
            }
            state.last_steps.clear();
            write_line(out, "Session history cleared. Starting a new conversation.").await?;
        }
        "steps" => {
            if state.last_steps.is_empty() {
                write_line(out, "No tool calls in the last answer.").await?;
            } else {
                print_tool_steps(out, &state.last_steps).await?;
            }
        }
        other => {
            write_line(
                out,
                &format!("Unknown command '/{other}'. Type /help for the list."),
            )
            .await?;
        }
    }
    Ok(LoopControl::Continue)
}

async fn handle_prompt<W: AsyncWrite + Unpin>(
    agent: &Agent,
    state: &mut SessionState,
    message: String,
    out: &mut W,
) -> Result<(), StdioError> {
    info!("Processing interactive request");
    let options = agent.options(state.session_id.clone());
    match agent.run(message, options).await {
        Ok(AgentOutcome {
            session_id,
            response,
            steps,
        }) => {
            if state.update_session(session_id.clone()) {
                write_line(out, &format!("\nSession: {session_id}")).await?;
            } else {
                write_line(out, "").await?;
            }
            write_line(out, "Agent:").await?;
            write_line(out, &response).await?;
            if !steps.is_empty() {
                write_line(out, &format!("({} tool call(s); /steps to inspect)", steps.len()))
                    .await?;
            }
            state.last_steps = steps;
        }
        Err(err) => {
            error!(%err, "Agent processing failed");
            write_line(out, "\nAgent failed:").await?;
            write_line(out, &err.user_message()).await?;
            state.last_steps.clear();
        }
    }
    out.flush().await?;
    Ok(())
}

async fn print_tool_steps<W: AsyncWrite + Unpin>(out: &mut W, steps: &[AgentStep]) -> io::Result<()> {
    write_line(out, "\nTool steps:").await?;
    for (index, step) in steps.iter().enumerate() {
        let status = if step.success { "ok" } else { "failed" };
        write_line(out, &format!("  {}. {} [{status}]", index + 1, step.tool)).await?;
        if !step.input.is_null() {
            write_line(out, &format!("     in : {}", step.input)).await?;
        }
        for line in step.output.lines() {
            write_line(out, &format!("     out: {line}")).await?;
        }
    }
    Ok(())
}

async fn print_banner<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    write_line(out, "Network security assistant ready.").await?;
    write_line(out, "Type a question and press Enter. /help lists commands.").await
}

async fn print_help<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    write_line(out, "\nCommands:").await?;
    write_line(out, "  /help     Show this help").await?;
    write_line(out, "  /steps    Show tool calls from the last answer").await?;
    write_line(out, "  /reset    Forget the conversation and start over").await?;
    write_line(out, "  /exit     Leave").await
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await
}
