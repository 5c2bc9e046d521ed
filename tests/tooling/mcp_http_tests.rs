// MCP HTTP client tests - streamable HTTP transport against an in-process server
//
// The fake server speaks just enough MCP to exercise session handling, the
// tool catalogue, JSON and event-stream replies, and error mapping.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use netwarden_core::config::McpConfig;
use netwarden_core::tooling::{McpHttpClient, ToolGateway, ToolInvokeError};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct FakeServer {
    sessions: AtomicU64,
    current_session: Mutex<Option<String>>,
    expire_next_call: AtomicBool,
    methods: Mutex<Vec<String>>,
    seen_headers: Mutex<Vec<(String, String)>>,
}

impl FakeServer {
    async fn methods(&self) -> Vec<String> {
        self.methods.lock().await.clone()
    }

    async fn count(&self, method: &str) -> usize {
        self.methods
            .lock()
            .await
            .iter()
            .filter(|seen| seen.as_str() == method)
            .count()
    }
}

async fn handle(
    State(server): State<Arc<FakeServer>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let method = body["method"].as_str().unwrap_or_default().to_string();
    server.methods.lock().await.push(method.clone());
    for name in ["x-team", "mcp-protocol-version"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            server
                .seen_headers
                .lock()
                .await
                .push((name.to_string(), value.to_string()));
        }
    }

    let Some(id) = body.get("id").cloned() else {
        return StatusCode::ACCEPTED.into_response();
    };

    if method == "initialize" {
        let n = server.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        let session = format!("sess-{n}");
        *server.current_session.lock().await = Some(session.clone());
        let reply = json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": "2025-06-18",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "fake-diagnostics", "version": "0.1.0"},
                "instructions": "Always pass the host name."
            }
        });
        return ([("mcp-session-id", session)], Json(reply)).into_response();
    }

    let sent = headers
        .get("mcp-session-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let current = server.current_session.lock().await.clone();
    if sent.is_none() {
        return (StatusCode::BAD_REQUEST, "missing session").into_response();
    }
    if sent != current || server.expire_next_call.swap(false, Ordering::SeqCst) {
        return (StatusCode::NOT_FOUND, "unknown session").into_response();
    }

    match method.as_str() {
        "tools/list" => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "tools": [
                    {
                        "name": "get_network_event_stats",
                        "description": "Aggregated event counts",
                        "inputSchema": {"type": "object", "properties": {"minutes": {"type": "integer"}}}
                    },
                    {"name": "get_network_events_history", "description": "Recent events"},
                    {"name": "detect_network_anomalies", "description": "Anomaly scan"},
                    {"name": "rpc_failure"},
                    {"name": "failing_probe"}
                ]
            }
        }))
        .into_response(),
        "tools/call" => call_tool(id, &body["params"]),
        _ => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": "method not found"}
        }))
        .into_response(),
    }
}

fn call_tool(id: Value, params: &Value) -> Response {
    let name = params["name"].as_str().unwrap_or_default();
    let arguments = &params["arguments"];
    match name {
        "get_network_event_stats" => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "content": [
                    {"type": "text", "text": format!("window={}", arguments["minutes"])},
                    {"type": "text", "text": "tcp=42 udp=7"}
                ]
            }
        }))
        .into_response(),
        "get_network_events_history" => Json(json!([
            {"jsonrpc": "2.0", "method": "notifications/progress", "params": {"progress": 1}},
            {"jsonrpc": "2.0", "id": id, "result": {"content": [{"type": "text", "text": "3 events"}]}}
        ]))
        .into_response(),
        "detect_network_anomalies" => {
            let progress = json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {"level": "info"}});
            let reply = json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"content": [{"type": "text", "text": "HIGH: port scan from 10.0.0.9"}]}
            });
            let body = format!("event: message\ndata: {progress}\n\nevent: message\ndata: {reply}\n\n");
            ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
        }
        "rpc_failure" => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32602, "message": "bad arguments"}
        }))
        .into_response(),
        _ => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {"content": [{"type": "text", "text": "probe crashed"}], "isError": true}
        }))
        .into_response(),
    }
}

async fn spawn_server() -> (Arc<FakeServer>, McpHttpClient) {
    let server = Arc::new(FakeServer::default());
    let app = Router::new()
        .route("/mcp", post(handle))
        .with_state(server.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let mut headers = BTreeMap::new();
    headers.insert("X-Team".to_string(), "secops".to_string());
    let client = McpHttpClient::new(&McpConfig {
        endpoint: format!("http://{addr}/mcp"),
        headers,
    })
    .expect("client builds");
    (server, client)
}

#[tokio::test]
async fn opens_session_and_lists_tools() {
    let (server, client) = spawn_server().await;

    let tools = client.list_tools().await.expect("tools listed");
    let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
    assert!(names.contains(&"get_network_event_stats"));
    assert!(names.contains(&"detect_network_anomalies"));

    let stats = tools
        .iter()
        .find(|tool| tool.name == "get_network_event_stats")
        .expect("stats tool");
    assert_eq!(stats.description.as_deref(), Some("Aggregated event counts"));
    assert!(stats.input_schema.is_some());

    assert_eq!(
        server.methods().await,
        vec!["initialize", "notifications/initialized", "tools/list"]
    );
    assert_eq!(
        client.instructions().await.as_deref(),
        Some("Always pass the host name.")
    );

    let seen = server.seen_headers.lock().await.clone();
    assert!(seen.contains(&("x-team".to_string(), "secops".to_string())));
    assert!(seen.contains(&("mcp-protocol-version".to_string(), "2025-06-18".to_string())));
}

#[tokio::test]
async fn session_is_reused_across_calls() {
    let (server, client) = spawn_server().await;

    client
        .call_tool("get_network_event_stats", json!({"minutes": 5}))
        .await
        .expect("first call");
    client
        .call_tool("get_network_event_stats", json!({"minutes": 5}))
        .await
        .expect("second call");

    assert_eq!(server.count("initialize").await, 1);
    assert_eq!(server.count("tools/call").await, 2);
}

#[tokio::test]
async fn json_reply_text_blocks_are_joined() {
    let (_server, client) = spawn_server().await;

    let text = client
        .call_tool("get_network_event_stats", json!({"minutes": 15}))
        .await
        .expect("call succeeds");
    assert_eq!(text, "window=15\ntcp=42 udp=7");
}

#[tokio::test]
async fn batch_reply_picks_matching_response() {
    let (_server, client) = spawn_server().await;

    let text = client
        .call_tool("get_network_events_history", json!({"minutes": 5}))
        .await
        .expect("call succeeds");
    assert_eq!(text, "3 events");
}

#[tokio::test]
async fn event_stream_reply_is_decoded() {
    let (_server, client) = spawn_server().await;

    let text = client
        .call_tool("detect_network_anomalies", Value::Null)
        .await
        .expect("call succeeds");
    assert_eq!(text, "HIGH: port scan from 10.0.0.9");
}

#[tokio::test]
async fn tool_error_flag_maps_to_tool_failed() {
    let (_server, client) = spawn_server().await;

    let err = client
        .call_tool("failing_probe", json!({}))
        .await
        .expect_err("tool reports failure");
    match err {
        ToolInvokeError::ToolFailed { tool, message } => {
            assert_eq!(tool, "failing_probe");
            assert_eq!(message, "probe crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn json_rpc_error_is_surfaced() {
    let (server, client) = spawn_server().await;

    let err = client
        .call_tool("rpc_failure", json!({}))
        .await
        .expect_err("rpc error");
    assert!(matches!(err, ToolInvokeError::Rpc { code: -32602, .. }));

    // the session survives a protocol-level error
    client
        .call_tool("get_network_event_stats", json!({"minutes": 1}))
        .await
        .expect("next call");
    assert_eq!(server.count("initialize").await, 1);
}

#[tokio::test]
async fn unknown_tool_is_rejected_locally() {
    let (server, client) = spawn_server().await;

    let err = client
        .call_tool("format_disk", json!({}))
        .await
        .expect_err("not in catalogue");
    match err {
        ToolInvokeError::UnknownTool { tool, available } => {
            assert_eq!(tool, "format_disk");
            assert!(available.contains(&"detect_network_anomalies".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.count("tools/call").await, 0);
}

#[tokio::test]
async fn expired_session_is_reinitialized_once() {
    let (server, client) = spawn_server().await;
    client.list_tools().await.expect("session opened");

    server.expire_next_call.store(true, Ordering::SeqCst);
    let text = client
        .call_tool("get_network_event_stats", json!({"minutes": 5}))
        .await
        .expect("retried on a fresh session");

    assert_eq!(text, "window=5\ntcp=42 udp=7");
    assert_eq!(server.count("initialize").await, 2);
    assert_eq!(server.count("tools/call").await, 2);
    assert_eq!(
        server.current_session.lock().await.as_deref(),
        Some("sess-2")
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = McpHttpClient::new(&McpConfig {
        endpoint: format!("http://{addr}/mcp"),
        headers: BTreeMap::new(),
    })
    .expect("client builds");

    let err = client
        .call_tool("get_network_event_stats", json!({"minutes": 5}))
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, ToolInvokeError::Transport { .. }));
    assert!(err.invalidates_session());
}
