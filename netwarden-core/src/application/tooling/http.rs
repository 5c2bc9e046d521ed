use super::content::flatten_tool_result;
use super::error::ToolInvokeError;
use super::interface::{ToolGateway, ToolInfo};
use super::sse;
use crate::config::McpConfig;
use crate::constants::MCP_REQUEST_TIMEOUT_SECS;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SESSION_HEADER: &str = "Mcp-Session-Id";
const PROTOCOL_HEADER: &str = "MCP-Protocol-Version";

/// MCP client speaking JSON-RPC over the streamable HTTP transport.
///
/// The session is opened lazily on first use and reopened after any
/// transport failure. Cloning shares the session and the tool catalogue.
#[derive(Clone)]
pub struct McpHttpClient {
    inner: Arc<McpHttpInner>,
}

struct McpHttpInner {
    endpoint: String,
    headers: BTreeMap<String, String>,
    http: Client,
    session: AsyncMutex<Option<SessionState>>,
    id_counter: AtomicU64,
    tool_cache: AsyncMutex<BTreeMap<String, ToolInfo>>,
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    session_id: Option<String>,
    instructions: Option<String>,
}

struct RpcReply {
    session_id: Option<String>,
    message: Option<Value>,
}

impl McpHttpClient {
    pub fn new(config: &McpConfig) -> Result<Self, ToolInvokeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(MCP_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| ToolInvokeError::Transport {
                server: config.endpoint.clone(),
                message: source.to_string(),
            })?;
        info!(endpoint = config.endpoint.as_str(), "MCP client initialized");
        Ok(Self {
            inner: Arc::new(McpHttpInner {
                endpoint: config.endpoint.clone(),
                headers: config.headers.clone(),
                http,
                session: AsyncMutex::new(None),
                id_counter: AtomicU64::new(1),
                tool_cache: AsyncMutex::new(BTreeMap::new()),
            }),
        })
    }
}

#[async_trait]
impl ToolGateway for McpHttpClient {
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolInvokeError> {
        info!(tool = name, "Calling MCP tool");
        self.inner.ensure_session().await?;
        self.inner.ensure_known(name).await?;

        let params = json!({
            "name": name,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });

        let result = match self.inner.request("tools/call", params.clone()).await {
            Err(ToolInvokeError::SessionExpired { .. }) => {
                debug!(tool = name, "session expired, re-initializing");
                self.inner.reset().await;
                self.inner.ensure_session().await?;
                self.inner.request("tools/call", params).await
            }
            other => other,
        };

        let result = match result {
            Ok(value) => value,
            Err(err) => {
                if err.invalidates_session() {
                    self.inner.reset().await;
                }
                warn!(tool = name, %err, "MCP tool call failed");
                return Err(err);
            }
        };

        let text = flatten_tool_result(name, &result)?;
        info!(tool = name, chars = text.len(), "Tool completed");
        Ok(text)
    }

    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ToolInvokeError> {
        self.inner.ensure_session().await?;
        let cache = self.inner.tool_cache.lock().await;
        Ok(cache.values().cloned().collect())
    }

    async fn instructions(&self) -> Option<String> {
        self.inner
            .session
            .lock()
            .await
            .as_ref()
            .and_then(|state| state.instructions.clone())
    }
}

impl McpHttpInner {
    async fn ensure_session(&self) -> Result<(), ToolInvokeError> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(());
        }

        let state = match self.initialize_sequence().await {
            Ok(state) => state,
            Err(err) => {
                self.tool_cache.lock().await.clear();
                return Err(err);
            }
        };
        *session = Some(state);
        Ok(())
    }

    async fn initialize_sequence(&self) -> Result<SessionState, ToolInvokeError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {}
        });

        let id = self.next_id();
        let reply = self
            .post(None, &rpc_request(&id, "initialize", params), Some(&id))
            .await?;
        let result = self.rpc_result("initialize", reply.message)?;

        let state = SessionState {
            session_id: reply.session_id,
            instructions: result
                .get("instructions")
                .and_then(Value::as_str)
                .map(str::to_string),
        };
        let server = result
            .pointer("/serverInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        debug!(
            endpoint = self.endpoint.as_str(),
            session = state.session_id.as_deref().unwrap_or("-"),
            server,
            "MCP session initialized"
        );

        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
        });
        self.post(state.session_id.as_deref(), &notification, None)
            .await?;

        let id = self.next_id();
        let reply = self
            .post(
                state.session_id.as_deref(),
                &rpc_request(&id, "tools/list", json!({})),
                Some(&id),
            )
            .await?;
        let tools = self.rpc_result("tools/list", reply.message)?;
        self.populate_tool_cache(&tools).await;

        Ok(state)
    }

    async fn ensure_known(&self, tool: &str) -> Result<(), ToolInvokeError> {
        let cache = self.tool_cache.lock().await;
        if cache.contains_key(tool) {
            return Ok(());
        }
        Err(ToolInvokeError::UnknownTool {
            tool: tool.to_string(),
            available: cache.keys().cloned().collect(),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ToolInvokeError> {
        let session_id = self
            .session
            .lock()
            .await
            .as_ref()
            .and_then(|state| state.session_id.clone());
        let id = self.next_id();
        let reply = self
            .post(
                session_id.as_deref(),
                &rpc_request(&id, method, params),
                Some(&id),
            )
            .await?;
        self.rpc_result(method, reply.message)
    }

    async fn post(
        &self,
        sent_session: Option<&str>,
        payload: &Value,
        expect_id: Option<&str>,
    ) -> Result<RpcReply, ToolInvokeError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json, text/event-stream")
            .header(PROTOCOL_HEADER, PROTOCOL_VERSION);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(session_id) = sent_session {
            request = request.header(SESSION_HEADER, session_id);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(|source| self.transport_error(source.to_string()))?;

        let status = response.status();
        let session_id = header_value(response.headers(), SESSION_HEADER);
        let content_type = header_value(response.headers(), CONTENT_TYPE.as_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        // 404 inside a session means the server forgot it
        if status == StatusCode::NOT_FOUND && sent_session.is_some() {
            return Err(ToolInvokeError::SessionExpired {
                server: self.endpoint.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(source.to_string()))?;

        if !status.is_success() {
            return Err(ToolInvokeError::HttpStatus {
                server: self.endpoint.clone(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let Some(id) = expect_id else {
            return Ok(RpcReply {
                session_id,
                message: None,
            });
        };

        let message = if content_type.starts_with("text/event-stream") {
            sse::find_response(&body, id)
        } else if body.trim().is_empty() {
            None
        } else {
            let value: Value =
                serde_json::from_str(&body).map_err(|source| ToolInvokeError::InvalidJson {
                    server: self.endpoint.clone(),
                    source,
                })?;
            match value {
                Value::Array(batch) => batch.into_iter().find(|m| sse::matches_id(m, id)),
                single => Some(single),
            }
        };

        Ok(RpcReply {
            session_id,
            message,
        })
    }

    fn rpc_result(&self, method: &str, message: Option<Value>) -> Result<Value, ToolInvokeError> {
        let message = message.ok_or_else(|| ToolInvokeError::MissingResponse {
            server: self.endpoint.clone(),
            method: method.to_string(),
        })?;

        if let Some(error) = message.get("error") {
            return Err(ToolInvokeError::Rpc {
                server: self.endpoint.clone(),
                code: error.get("code").and_then(Value::as_i64).unwrap_or(-32000),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
        Ok(message.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn populate_tool_cache(&self, result: &Value) {
        let mut cache = self.tool_cache.lock().await;
        cache.clear();
        if let Some(array) = result.get("tools").and_then(Value::as_array) {
            for tool in array {
                if let Some(name) = tool.get("name").and_then(Value::as_str) {
                    cache.insert(
                        name.to_string(),
                        ToolInfo {
                            name: name.to_string(),
                            description: tool
                                .get("description")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                            input_schema: tool.get("inputSchema").cloned(),
                        },
                    );
                }
            }
        }
        info!(count = cache.len(), "Loaded MCP tool catalogue");
    }

    async fn reset(&self) {
        self.session.lock().await.take();
        self.tool_cache.lock().await.clear();
    }

    fn next_id(&self) -> String {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("req-{id}")
    }

    fn transport_error(&self, message: impl Into<String>) -> ToolInvokeError {
        ToolInvokeError::Transport {
            server: self.endpoint.clone(),
            message: message.into(),
        }
    }
}

fn rpc_request(id: &str, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
