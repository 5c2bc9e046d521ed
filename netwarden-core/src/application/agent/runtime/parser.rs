use super::{AgentDirective, AgentError, ToolRuntime, Value};

impl ToolRuntime {
    pub fn parse_agent_action(&self, content: &str) -> Result<AgentDirective, AgentError> {
        parse_directive(content)
    }
}

fn parse_directive(content: &str) -> Result<AgentDirective, AgentError> {
    match extract_json(content) {
        Some(value) => parse_action_value(value),
        None => Err(AgentError::InvalidResponse(
            "expected JSON object in agent response".into(),
        )),
    }
}

fn parse_action_value(value: Value) -> Result<AgentDirective, AgentError> {
    let map = match value {
        Value::Object(map) => map,
        Value::String(text) => return parse_directive(&text),
        other => {
            return Err(AgentError::InvalidResponse(format!(
                "unsupported response type: {other}"
            )));
        }
    };

    let action = map.get("action").and_then(Value::as_str).ok_or_else(|| {
        AgentError::InvalidResponse("missing action field in agent response".into())
    })?;

    match action {
        "call_tool" => {
            let tool = map.get("tool").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("call_tool action missing tool field".into())
            })?;
            Ok(AgentDirective::CallTool {
                tool: tool.to_string(),
                input: map.get("input").cloned().unwrap_or(Value::Null),
            })
        }
        "final" => {
            let response = map.get("response").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("final action missing response field".into())
            })?;
            Ok(AgentDirective::Final {
                response: response.to_string(),
            })
        }
        other => Err(AgentError::InvalidResponse(format!(
            "unknown action value: {other}"
        ))),
    }
}

/// Finds a JSON value in model output: bare, fenced, or embedded in prose.
fn extract_json(content: &str) -> Option<Value> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        if let Some(end) = body.rfind("```") {
            if let Ok(value) = serde_json::from_str::<Value>(body[..end].trim()) {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start < end {
        serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
    } else {
        None
    }
}
