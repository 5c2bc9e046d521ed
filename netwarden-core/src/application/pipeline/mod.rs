//! The ambient monitoring cycle.
//!
//! ```text
//! monitor → analyze ─┬─ investigate → llm_analysis → report ─┬─ alert ─┬─ baseline → end
//!                    │                                       └─────────┤
//!                    └─────────────────────────────────────────────────┘
//! ```
//!
//! Steps run strictly one after another over a single [`MonitoringRecord`].

mod analysis;
mod baseline;
mod collect;
mod delivery;
mod error;
mod record;
mod recommendations;
mod routing;

pub use analysis::{fallback_report, format_anomalies};
pub use error::PipelineError;
pub use record::{Baseline, MonitoringRecord};
pub use recommendations::{FALLBACK_RECOMMENDATION, extract_recommendations};
pub use routing::{Route, has_severity_marker, should_alert, should_investigate};

use crate::application::alerting::AlertSink;
use crate::application::tooling::ToolGateway;
use crate::config::AppConfig;
use crate::infrastructure::model::ModelProvider;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Monitor,
    Analyze,
    Investigate,
    LlmAnalysis,
    Report,
    Alert,
    Baseline,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Monitor => "monitor",
            Step::Analyze => "analyze",
            Step::Investigate => "investigate",
            Step::LlmAnalysis => "llm_analysis",
            Step::Report => "report",
            Step::Alert => "alert",
            Step::Baseline => "baseline",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final record of a cycle and the steps it went through, in order.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub record: MonitoringRecord,
    pub path: Vec<Step>,
}

/// Monitoring pipeline with its collaborators injected at construction.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<AppConfig>,
    tools: Arc<dyn ToolGateway>,
    model: Arc<dyn ModelProvider>,
    alerts: Arc<dyn AlertSink>,
}

impl Pipeline {
    pub fn new(
        config: Arc<AppConfig>,
        tools: Arc<dyn ToolGateway>,
        model: Arc<dyn ModelProvider>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            config,
            tools,
            model,
            alerts,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Drives `record` through the cycle graph.
    pub async fn run(&self, record: MonitoringRecord) -> Result<CycleOutcome, PipelineError> {
        let mut path = Vec::with_capacity(7);

        let record = self.monitor(record).await;
        path.push(Step::Monitor);
        let mut record = self.analyze(record).await;
        path.push(Step::Analyze);

        if should_investigate(&record) == Route::Investigate {
            record = self.investigate(record);
            path.push(Step::Investigate);
            record = self.llm_analysis(record).await?;
            path.push(Step::LlmAnalysis);
            record = self.report(record).await?;
            path.push(Step::Report);

            if should_alert(&record) == Route::Alert {
                record = self.alert(record).await;
                path.push(Step::Alert);
            }
        }

        let record = self.baseline(record).await;
        path.push(Step::Baseline);

        Ok(CycleOutcome { record, path })
    }

    /// The argument object every diagnostics tool takes.
    fn tool_arguments(&self, minutes: u64) -> Value {
        json!({
            "minutes": minutes,
            "host": self.config.target.host,
            "username": self.config.target.username,
        })
    }
}
