//! Session-aware chat client shared by the conversational agent.

use crate::domain::ChatMessage;
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatResult {
    pub content: String,
    pub session_id: String,
}

/// Model client that remembers every user/assistant exchange per session.
pub struct ChatClient {
    provider: Arc<dyn ModelProvider>,
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl ChatClient {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Sends `[system?] + history + user` and records the exchange.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResult, ModelError> {
        let session_id = request.session_id.unwrap_or_else(new_session_id);

        let history = {
            let mut sessions = self.sessions.lock().await;
            sessions.entry(session_id.clone()).or_default().clone()
        };
        debug!(
            session_id = session_id.as_str(),
            history_count = history.len(),
            "Preparing chat request with prior history"
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = request
            .system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            messages.push(ChatMessage::system(system));
        }
        messages.extend(history);
        messages.push(ChatMessage::user(request.prompt.clone()));

        info!(
            session_id = session_id.as_str(),
            provider = self.provider.id(),
            prompt = %summarise(&request.prompt),
            "Sending request to model provider"
        );

        let response = self.provider.chat(ModelRequest::new(messages)).await?;
        let content = response.message.content.clone();
        info!(
            session_id = session_id.as_str(),
            reply = %summarise(&content),
            "Response received from model provider"
        );

        self.persist_exchange(&session_id, request.prompt, response.message)
            .await;

        Ok(ChatResult {
            content,
            session_id,
        })
    }

    /// Forgets the history of one session.
    pub async fn reset(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    async fn persist_exchange(&self, session_id: &str, user_prompt: String, assistant: ChatMessage) {
        let mut sessions = self.sessions.lock().await;
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push(ChatMessage::user(user_prompt));
        history.push(assistant);
        debug!(
            session_id,
            total_messages = history.len(),
            "Persisted chat exchange to session history"
        );
    }
}

/// One-line preview of `text`, capped at 160 characters.
pub fn summarise(text: &str) -> String {
    const SNIPPET_LIMIT: usize = 160;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty)".to_string();
    }
    let single_line = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = single_line.chars();
    let mut result: String = chars.by_ref().take(SNIPPET_LIMIT).collect();
    if chars.next().is_some() {
        result.push('…');
    }
    result
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}
