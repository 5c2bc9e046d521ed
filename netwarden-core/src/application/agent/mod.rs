//! # Conversational agent
//!
//! A tool-using assistant that answers operator questions about the target
//! host. The model drives the loop with JSON directives:
//!
//! 1. Send the conversation to the model
//! 2. Parse the JSON directive (asking for a correction when malformed)
//! 3. On `call_tool`, run the tool and feed the result back
//! 4. On `final`, return the answer

mod context;
mod directive;
mod errors;
mod models;
mod runner;
mod runtime;

pub use context::{ToolContext, ToolDescriptor};
pub use directive::AgentDirective;
pub use errors::AgentError;
pub use models::{AgentOptions, AgentOutcome, AgentStep};
pub use runner::Agent;
