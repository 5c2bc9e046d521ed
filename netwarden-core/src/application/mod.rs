//! # Application Module
//!
//! ## Submodules
//!
//! - [`tooling`] - MCP tool gateway over streamable HTTP
//! - [`pipeline`] - The ambient monitoring cycle and its steps
//! - [`alerting`] - Alert sinks (log file, Slack)
//! - [`monitor`] - Once / continuous cycle runner
//! - [`client`] - Session-aware chat client
//! - [`agent`] - Conversational tool-using agent
//! - [`stdio`] - Interactive terminal front-end

pub mod agent;
pub mod alerting;
pub mod client;
pub mod monitor;
pub mod pipeline;
pub mod stdio;
pub mod tooling;
