use super::{ToolContext, ToolRuntime};

pub(crate) const TOOL_RESULT_INSTRUCTION: &str = "Use the tool result above. Either call another tool or answer with {\"action\":\"final\",\"response\":\"...\"}.";
pub(crate) const JSON_RETRY_MESSAGE: &str = "Your previous reply was not a valid JSON directive. Reply again with exactly one JSON object: {\"action\":\"call_tool\",\"tool\":\"...\",\"input\":{...}} or {\"action\":\"final\",\"response\":\"...\"}.";

impl ToolRuntime {
    /// Appends the directive protocol and the tool catalogue to `base`.
    pub fn compose_system_instructions(&self, base: &str, context: &ToolContext) -> String {
        let mut lines = vec![
            "All responses must be valid JSON without commentary or code fences.".to_string(),
            "When you need to invoke a tool, respond with: {\"action\":\"call_tool\",\"tool\":\"tool_name\",\"input\":{...}}."
                .to_string(),
            "When you are ready to give the final answer to the user, respond with: {\"action\":\"final\",\"response\":\"...\"}."
                .to_string(),
        ];

        if let Some(guidance) = &context.server_instructions {
            lines.push(format!("Server guidance: {guidance}"));
        }

        if context.tools.is_empty() {
            lines.push("No tools are currently available; answer from the conversation alone.".to_string());
        } else {
            lines.push("Available tools:".to_string());
            for descriptor in &context.tools {
                let mut line = format!("- {}", descriptor.name);
                if let Some(description) = &descriptor.description {
                    line.push_str(&format!(": {}", description.trim()));
                }
                if let Some(schema) = &descriptor.input_schema {
                    line.push_str(&format!(". Input schema: {schema}"));
                }
                lines.push(line);
            }
        }

        let base = base.trim();
        if base.is_empty() {
            lines.join("\n")
        } else {
            format!("{base}\n\n{}", lines.join("\n"))
        }
    }
}
