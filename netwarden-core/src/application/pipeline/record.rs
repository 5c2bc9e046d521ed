use crate::domain::{ChatMessage, iso_timestamp};
use serde::Serialize;
use serde_json::{Map, Value};

/// Learned "normal" state; replaced wholesale by the baseline step.
pub type Baseline = Map<String, Value>;

/// State threaded through one monitoring cycle.
///
/// Steps never mutate a record in place: each consumes it and returns a new
/// one with only its own fields replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringRecord {
    pub current_events: String,
    pub current_stats: String,
    pub detected_anomalies: Vec<String>,
    pub investigated_pids: Vec<u32>,
    pub conversation_messages: Vec<ChatMessage>,
    pub recommendations: Vec<String>,
    pub alerts: Vec<String>,
    pub historical_baseline: Baseline,
    pub iteration: u64,
    pub last_run: String,
}

impl MonitoringRecord {
    /// Empty record for the start of a cycle.
    pub fn new(iteration: u64) -> Self {
        Self {
            current_events: String::new(),
            current_stats: String::new(),
            detected_anomalies: Vec::new(),
            investigated_pids: Vec::new(),
            conversation_messages: Vec::new(),
            recommendations: Vec::new(),
            alerts: Vec::new(),
            historical_baseline: Baseline::new(),
            iteration,
            last_run: iso_timestamp(),
        }
    }

    pub fn with_fetch(
        self,
        events: impl Into<String>,
        stats: impl Into<String>,
        last_run: impl Into<String>,
    ) -> Self {
        Self {
            current_events: events.into(),
            current_stats: stats.into(),
            last_run: last_run.into(),
            ..self
        }
    }

    pub fn with_anomalies(self, detected_anomalies: Vec<String>) -> Self {
        Self {
            detected_anomalies,
            ..self
        }
    }

    pub fn with_investigated_pids(self, investigated_pids: Vec<u32>) -> Self {
        Self {
            investigated_pids,
            ..self
        }
    }

    pub fn with_recommendations(self, recommendations: Vec<String>) -> Self {
        Self {
            recommendations,
            ..self
        }
    }

    pub fn with_baseline(self, historical_baseline: Baseline) -> Self {
        Self {
            historical_baseline,
            ..self
        }
    }

    /// Appends `messages` after the existing conversation, preserving order.
    pub fn append_messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.conversation_messages.extend(messages);
        self
    }

    pub fn append_alert(mut self, alert: impl Into<String>) -> Self {
        self.alerts.push(alert.into());
        self
    }

    /// Text of the last conversation message, blank or not.
    pub fn last_message_text(&self) -> Option<&str> {
        self.conversation_messages
            .last()
            .map(|message| message.content.as_str())
    }
}
