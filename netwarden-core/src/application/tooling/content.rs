use super::error::ToolInvokeError;
use serde_json::Value;

/// Collapse a `tools/call` result into plain text.
///
/// Text blocks are joined with newlines. When the server sent no text, the
/// `structuredContent` payload is serialized instead. `isError: true` turns the
/// text into [`ToolInvokeError::ToolFailed`].
pub fn flatten_tool_result(tool: &str, result: &Value) -> Result<String, ToolInvokeError> {
    let text_blocks: Vec<&str> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let text = if !text_blocks.is_empty() {
        text_blocks.join("\n")
    } else if let Some(structured) = result.get("structuredContent") {
        structured.to_string()
    } else {
        String::new()
    };

    if result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
        return Err(ToolInvokeError::ToolFailed {
            tool: tool.to_string(),
            message: text,
        });
    }
    Ok(text)
}
