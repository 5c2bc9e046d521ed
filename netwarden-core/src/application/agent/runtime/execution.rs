use super::{ToolRuntime, Value};
use tracing::{info, warn};

/// Result of running one tool on the model's behalf.
pub(crate) struct ToolExecution {
    pub tool: String,
    pub success: bool,
    pub input: Value,
    pub output: String,
}

impl ToolRuntime {
    /// Runs `tool_name`. Failures are reported back as text so the model can
    /// react to them.
    pub(crate) async fn execute(&self, tool_name: &str, input: Value) -> ToolExecution {
        let arguments = match input.clone() {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        match self.gateway.call_tool(tool_name, arguments).await {
            Ok(output) => {
                info!(tool = tool_name, chars = output.len(), "Tool executed");
                ToolExecution {
                    tool: tool_name.to_string(),
                    success: true,
                    input,
                    output,
                }
            }
            Err(err) => {
                warn!(tool = tool_name, %err, "Tool execution failed");
                ToolExecution {
                    tool: tool_name.to_string(),
                    success: false,
                    input,
                    output: format!("Error: {err}"),
                }
            }
        }
    }
}
