//! Cycle runner for the ambient agent.

use super::pipeline::{CycleOutcome, MonitoringRecord, Pipeline, PipelineError};
use crate::constants::CYCLE_RETRY_DELAY_SECS;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

/// Counts logged after every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub iteration: u64,
    pub anomalies: usize,
    pub alerts: usize,
    pub recommendations: usize,
}

impl CycleSummary {
    pub fn of(record: &MonitoringRecord) -> Self {
        Self {
            iteration: record.iteration,
            anomalies: record.detected_anomalies.len(),
            alerts: record.alerts.len(),
            recommendations: record.recommendations.len(),
        }
    }

    fn log(&self) {
        info!(
            iteration = self.iteration,
            anomalies = self.anomalies,
            alerts = self.alerts,
            recommendations = self.recommendations,
            "Cycle complete"
        );
    }
}

pub struct Monitor {
    pipeline: Pipeline,
    interval: Duration,
    retry_delay: Duration,
}

impl Monitor {
    pub fn new(pipeline: Pipeline) -> Self {
        let interval = Duration::from_secs(pipeline.config().agent.monitoring_interval);
        Self {
            pipeline,
            interval,
            retry_delay: Duration::from_secs(CYCLE_RETRY_DELAY_SECS),
        }
    }

    /// Overrides the pause after a failed cycle.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Single cycle with iteration 1.
    pub async fn run_once(&self) -> Result<CycleOutcome, PipelineError> {
        info!("Running ambient network security agent (single execution)");
        let outcome = self.pipeline.run(MonitoringRecord::new(1)).await?;
        CycleSummary::of(&outcome.record).log();
        Ok(outcome)
    }

    /// Runs cycles until `shutdown` resolves, returning the number of
    /// cycles that completed.
    ///
    /// Failed cycles are logged and followed by the retry delay instead of
    /// the regular interval. Shutdown is checked first and interrupts any wait
    /// or running cycle.
    pub async fn run_forever<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting ambient network security agent (continuous mode)"
        );
        tokio::pin!(shutdown);

        let mut iteration = 0u64;
        let mut completed = 0u64;
        loop {
            iteration += 1;
            info!(iteration, "Starting monitoring cycle");

            let pause = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                result = self.pipeline.run(MonitoringRecord::new(iteration)) => match result {
                    Ok(outcome) => {
                        completed += 1;
                        CycleSummary::of(&outcome.record).log();
                        info!(secs = self.interval.as_secs(), "Sleeping until next cycle");
                        self.interval
                    }
                    Err(err) => {
                        error!(iteration, %err, "Error in agent loop");
                        info!(secs = self.retry_delay.as_secs(), "Retrying after back-off");
                        self.retry_delay
                    }
                }
            };

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!(completed, "Agent stopped");
        completed
    }
}
