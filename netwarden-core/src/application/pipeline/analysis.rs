use super::Pipeline;
use super::error::PipelineError;
use super::record::MonitoringRecord;
use super::recommendations::extract_recommendations;
use crate::config::{ANOMALY_ANALYSIS, REPORT_GENERATION};
use crate::domain::{ChatMessage, iso_timestamp};
use crate::infrastructure::model::{ModelError, ModelRequest};
use tracing::{error, info};

/// Numbers anomalies as `Anomaly N:` blocks separated by blank lines.
pub fn format_anomalies(anomalies: &[String]) -> String {
    anomalies
        .iter()
        .enumerate()
        .map(|(i, anomaly)| format!("Anomaly {}:\n{anomaly}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Deterministic report used when the model cannot write one.
pub fn fallback_report(timestamp: &str, record: &MonitoringRecord) -> String {
    let recommendations = record
        .recommendations
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "\nSecurity Report - {timestamp}\n\nAnomalies Detected: {}\n{}\n\nRecommendations:\n{recommendations}\n",
        record.detected_anomalies.len(),
        record.detected_anomalies.join("\n"),
    )
}

fn pid_list(pids: &[u32]) -> String {
    let joined = pids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

fn or_none(text: &str) -> &str {
    if text.is_empty() { "None" } else { text }
}

impl Pipeline {
    /// Asks the model to interpret the anomalies and extracts recommendations.
    ///
    /// Skipped when there are no anomalies. A model failure becomes a single
    /// `LLM analysis failed: ...` recommendation.
    pub async fn llm_analysis(
        &self,
        record: MonitoringRecord,
    ) -> Result<MonitoringRecord, PipelineError> {
        info!("Starting LLM analysis");
        if record.detected_anomalies.is_empty() {
            info!("No anomalies to analyze, skipping LLM");
            return Ok(record);
        }

        let anomalies_text = format_anomalies(&record.detected_anomalies);
        let (system, user) = self
            .config
            .prompt(ANOMALY_ANALYSIS, &[("anomalies_text", anomalies_text.as_str())])
            .map_err(|source| PipelineError::Prompt {
                prompt: ANOMALY_ANALYSIS,
                source,
            })?;

        let request = vec![ChatMessage::system(system), ChatMessage::user(user)];
        match self.complete(request.clone()).await {
            Ok(analysis) => {
                info!(chars = analysis.len(), "LLM analysis complete");
                let recommendations = extract_recommendations(&analysis);
                Ok(record
                    .with_recommendations(recommendations)
                    .append_messages(request.into_iter().chain([ChatMessage::assistant(analysis)])))
            }
            Err(err) => {
                error!(%err, "LLM analysis failed");
                Ok(record.with_recommendations(vec![format!("LLM analysis failed: {err}")]))
            }
        }
    }

    /// Writes the security report into `alerts`, falling back to a
    /// template when the model fails.
    pub async fn report(&self, record: MonitoringRecord) -> Result<MonitoringRecord, PipelineError> {
        info!("Generating security report");

        let prior_analysis = record.last_message_text().unwrap_or_default();
        let anomalies = record.detected_anomalies.join("\n\n");
        let investigation = pid_list(&record.investigated_pids);
        let (system, user) = self
            .config
            .prompt(
                REPORT_GENERATION,
                &[
                    ("anomalies", or_none(&anomalies)),
                    ("investigation_results", or_none(&investigation)),
                    ("llm_analysis", or_none(prior_analysis)),
                ],
            )
            .map_err(|source| PipelineError::Prompt {
                prompt: REPORT_GENERATION,
                source,
            })?;

        match self
            .complete(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .await
        {
            Ok(report) => {
                info!(chars = report.len(), "Report generated");
                Ok(record.append_alert(report))
            }
            Err(err) => {
                error!(%err, "Report generation failed");
                let report = fallback_report(&iso_timestamp(), &record);
                Ok(record.append_alert(report))
            }
        }
    }

    pub(super) async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ModelError> {
        let response = self.model.chat(ModelRequest::new(messages)).await?;
        Ok(response.message.content)
    }
}
