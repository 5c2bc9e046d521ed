use super::Pipeline;
use super::record::{Baseline, MonitoringRecord};
use crate::config::BASELINE_LEARNING;
use crate::constants::{BASELINE_SNIPPET_CHARS, BASELINE_WINDOW_MINUTES, TOOL_EVENT_STATS};
use crate::domain::{ChatMessage, iso_timestamp};
use serde_json::Value;
use std::error::Error;
use tracing::{error, info};

impl Pipeline {
    /// Replaces the baseline with a fresh model suggestion.
    ///
    /// Any failure (fetch, prompt or model) keeps the previous baseline.
    pub async fn baseline(&self, record: MonitoringRecord) -> MonitoringRecord {
        info!("Updating baseline");
        match self.learn_baseline(&record).await {
            Ok(baseline) => {
                info!("Baseline updated with LLM suggestions");
                record.with_baseline(baseline)
            }
            Err(err) => {
                error!(%err, "Baseline update failed");
                record
            }
        }
    }

    async fn learn_baseline(
        &self,
        record: &MonitoringRecord,
    ) -> Result<Baseline, Box<dyn Error + Send + Sync>> {
        let current_stats = if record.current_stats.is_empty() {
            self.tools
                .call_tool(TOOL_EVENT_STATS, self.tool_arguments(BASELINE_WINDOW_MINUTES))
                .await?
        } else {
            record.current_stats.clone()
        };

        let existing = Value::Object(record.historical_baseline.clone()).to_string();
        let (system, user) = self.config.prompt(
            BASELINE_LEARNING,
            &[
                ("current_stats", current_stats.as_str()),
                ("baseline", existing.as_str()),
            ],
        )?;

        let suggestion = self
            .complete(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .await?;

        let mut baseline = Baseline::new();
        baseline.insert("last_update".into(), Value::String(iso_timestamp()));
        baseline.insert(
            "llm_suggestions".into(),
            Value::String(suggestion.chars().take(BASELINE_SNIPPET_CHARS).collect()),
        );
        Ok(baseline)
    }
}
