//! Minimal `text/event-stream` decoding for streamable HTTP responses.

use serde_json::Value;

/// Returns the `data` payload of every event in the body, in order.
///
/// Multi-line `data:` fields are joined with `\n`; other fields (`event`,
/// `id`, `retry`) and comments are ignored.
pub(super) fn event_payloads(body: &str) -> Vec<String> {
    let mut events = Vec::new();
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if !data.is_empty() {
                events.push(data.join("\n"));
                data.clear();
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if !data.is_empty() {
        events.push(data.join("\n"));
    }
    events
}

/// Finds the JSON-RPC response with the given id among the stream's events.
pub(super) fn find_response(body: &str, id: &str) -> Option<Value> {
    event_payloads(body)
        .into_iter()
        .filter_map(|payload| serde_json::from_str::<Value>(&payload).ok())
        .flat_map(|value| match value {
            Value::Array(batch) => batch,
            single => vec![single],
        })
        .find(|message| matches_id(message, id))
}

pub(super) fn matches_id(message: &Value, id: &str) -> bool {
    let is_response = message.get("result").is_some() || message.get("error").is_some();
    let same_id = match message.get("id") {
        Some(Value::String(value)) => value == id,
        Some(Value::Number(num)) => num.to_string() == id,
        _ => false,
    };
    is_response && same_id
}
