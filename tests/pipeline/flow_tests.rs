// Pipeline flow tests - whole monitoring cycles against fake collaborators
//
// Each test scripts the tool server and the model, runs one cycle and checks
// the path taken plus the final record.

#[path = "../support/fakes.rs"]
mod fakes;

use fakes::{FakeModel, FakeTools, PROMPTS, RecordingSink, config, config_with};
use netwarden_core::alerting::build_alert_sink;
use netwarden_core::config::{ANOMALY_ANALYSIS, ConfigError};
use netwarden_core::pipeline::{
    FALLBACK_RECOMMENDATION, MonitoringRecord, Pipeline, PipelineError, Step,
};
use netwarden_core::types::MessageRole;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::tempdir;

const HISTORY: &str = "get_network_events_history";
const STATS: &str = "get_network_event_stats";
const DETECT: &str = "detect_network_anomalies";

const ANALYSIS: &str = "The host is being scanned.\n\nRecommended Actions:\n1. Block 10.0.0.9 at the firewall\n2. Review sshd logs\n";

fn quiet_tools() -> FakeTools {
    FakeTools::new()
        .reply(HISTORY, "12 events in window")
        .reply(STATS, "tcp=42 udp=7")
        .reply(DETECT, "No anomalies detected")
}

fn noisy_tools(detector: &str) -> FakeTools {
    FakeTools::new()
        .reply(HISTORY, "12 events in window")
        .reply(STATS, "tcp=42 udp=7")
        .reply(DETECT, detector)
}

#[tokio::test]
async fn critical_anomaly_runs_every_step_and_logs_alert() {
    let dir = tempdir().expect("tempdir");
    let log_file = dir.path().join("logs/alerts.log");
    let config = config(&log_file);

    let tools = Arc::new(noisy_tools("CRITICAL: port scan from 10.0.0.9"));
    let model = Arc::new(
        FakeModel::new()
            .reply(ANALYSIS)
            .reply("Incident report: port scan from 10.0.0.9")
            .reply("Expect about 40 tcp connections per minute."),
    );
    let sink = build_alert_sink(&config.alerts).expect("sink builds");
    let pipeline = Pipeline::new(config, tools.clone(), model.clone(), sink);

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");

    assert_eq!(
        outcome.path,
        vec![
            Step::Monitor,
            Step::Analyze,
            Step::Investigate,
            Step::LlmAnalysis,
            Step::Report,
            Step::Alert,
            Step::Baseline,
        ]
    );

    let record = outcome.record;
    assert_eq!(record.current_events, "12 events in window");
    assert_eq!(record.current_stats, "tcp=42 udp=7");
    assert_eq!(record.detected_anomalies, vec!["CRITICAL: port scan from 10.0.0.9"]);
    assert!(record.investigated_pids.is_empty());
    assert_eq!(
        record.recommendations,
        vec!["Block 10.0.0.9 at the firewall", "Review sshd logs"]
    );
    assert_eq!(record.alerts, vec!["Incident report: port scan from 10.0.0.9"]);
    assert_eq!(
        record.historical_baseline.get("llm_suggestions"),
        Some(&Value::String(
            "Expect about 40 tcp connections per minute.".to_string()
        ))
    );
    assert!(record.historical_baseline.contains_key("last_update"));

    let roles: Vec<MessageRole> = record
        .conversation_messages
        .iter()
        .map(|message| message.role)
        .collect();
    assert_eq!(
        roles,
        vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]
    );

    let log = std::fs::read_to_string(&log_file).expect("alert log written");
    assert_eq!(log.matches("Alert at ").count(), 1);
    assert!(log.contains(&"=".repeat(80)));
    assert!(log.contains("Incident report: port scan from 10.0.0.9\n"));
}

#[tokio::test]
async fn tools_receive_window_and_target() {
    let dir = tempdir().expect("tempdir");
    let tools = Arc::new(quiet_tools());
    let model = Arc::new(FakeModel::new().reply("baseline"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        tools.clone(),
        model,
        Arc::new(RecordingSink::default()),
    );

    pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");

    let calls = tools.calls();
    let names: Vec<&str> = calls.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec![HISTORY, STATS, DETECT]);
    for (_, arguments) in &calls {
        assert_eq!(
            arguments,
            &json!({"minutes": 5, "host": "web-01", "username": "ops"})
        );
    }
}

#[tokio::test]
async fn quiet_network_goes_straight_to_baseline() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new().reply("Normal is quiet."));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(quiet_tools()),
        model.clone(),
        sink.clone(),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");

    assert_eq!(outcome.path, vec![Step::Monitor, Step::Analyze, Step::Baseline]);
    assert!(outcome.record.detected_anomalies.is_empty());
    assert!(outcome.record.alerts.is_empty());
    assert!(outcome.record.conversation_messages.is_empty());
    assert!(sink.published().is_empty());

    // only the baseline prompt reached the model
    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][1].content, "Stats: tcp=42 udp=7\nBaseline: {}");
}

#[tokio::test]
async fn medium_anomaly_is_reported_but_not_alerted() {
    let dir = tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let model = Arc::new(
        FakeModel::new()
            .reply("Looks like a misconfigured client.")
            .reply("Report: unusual DNS volume")
            .reply("baseline"),
    );
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(noisy_tools("MEDIUM: unusual DNS volume")),
        model,
        sink.clone(),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(2))
        .await
        .expect("cycle completes");

    assert_eq!(
        outcome.path,
        vec![
            Step::Monitor,
            Step::Analyze,
            Step::Investigate,
            Step::LlmAnalysis,
            Step::Report,
            Step::Baseline,
        ]
    );
    assert_eq!(outcome.record.alerts, vec!["Report: unusual DNS volume"]);
    assert_eq!(outcome.record.recommendations, vec![FALLBACK_RECOMMENDATION]);
    assert!(sink.published().is_empty());
}

#[tokio::test]
async fn severity_markers_are_case_sensitive() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new().reply("baseline"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(noisy_tools("high traffic but critical systems fine")),
        model,
        Arc::new(RecordingSink::default()),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    assert!(outcome.record.detected_anomalies.is_empty());
    assert_eq!(outcome.path.last(), Some(&Step::Baseline));
}

#[tokio::test]
async fn disabled_alerts_skip_delivery() {
    let dir = tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let model = Arc::new(
        FakeModel::new()
            .reply(ANALYSIS)
            .reply("Report")
            .reply("baseline"),
    );
    let pipeline = Pipeline::new(
        config_with(&dir.path().join("alerts.log"), PROMPTS, false),
        Arc::new(noisy_tools("HIGH: brute force on sshd")),
        model,
        sink.clone(),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    assert!(outcome.path.contains(&Step::Alert));
    assert_eq!(outcome.record.alerts, vec!["Report"]);
    assert!(sink.published().is_empty());
}

#[tokio::test]
async fn fetch_failure_marks_events_and_clears_stats() {
    let dir = tempdir().expect("tempdir");
    let tools = FakeTools::new()
        .fail(HISTORY, "connection refused")
        .reply(STATS, "tcp=42")
        .reply(DETECT, "No anomalies detected");
    let model = Arc::new(FakeModel::new().fail("model down"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(tools),
        model,
        Arc::new(RecordingSink::default()),
    );

    let stale = MonitoringRecord::new(1).with_fetch("", "", "2000-01-01T00:00:00.000000");
    let outcome = pipeline.run(stale).await.expect("cycle completes");
    assert!(outcome.record.current_events.starts_with("Error: "));
    assert!(outcome.record.current_events.contains("connection refused"));
    assert_eq!(outcome.record.current_stats, "");
    assert_ne!(outcome.record.last_run, "2000-01-01T00:00:00.000000");
    assert!(!outcome.record.last_run.is_empty());
}

#[tokio::test]
async fn baseline_fetches_hour_of_stats_when_missing() {
    let dir = tempdir().expect("tempdir");
    let tools = Arc::new(
        FakeTools::new()
            .fail(HISTORY, "timeout")
            .reply(STATS, "hourly stats")
            .reply(DETECT, "No anomalies detected"),
    );
    let model = Arc::new(FakeModel::new().reply("learned"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        tools.clone(),
        model.clone(),
        Arc::new(RecordingSink::default()),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");

    let stats_calls: Vec<Value> = tools
        .calls()
        .into_iter()
        .filter(|(name, _)| name == STATS)
        .map(|(_, arguments)| arguments)
        .collect();
    assert_eq!(stats_calls.len(), 1);
    assert_eq!(stats_calls[0]["minutes"], json!(60));
    assert_eq!(model.requests()[0][1].content, "Stats: hourly stats\nBaseline: {}");
    assert_eq!(
        outcome.record.historical_baseline.get("llm_suggestions"),
        Some(&Value::String("learned".to_string()))
    );
}

#[tokio::test]
async fn baseline_failure_keeps_previous_baseline() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new().fail("model down"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(quiet_tools()),
        model,
        Arc::new(RecordingSink::default()),
    );

    let mut previous = netwarden_core::pipeline::Baseline::new();
    previous.insert("llm_suggestions".into(), Value::String("old".into()));
    let record = MonitoringRecord::new(3).with_baseline(previous.clone());

    let outcome = pipeline.run(record).await.expect("cycle completes");
    assert_eq!(outcome.record.historical_baseline, previous);
}

#[tokio::test]
async fn successful_baseline_replaces_previous_keys() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new().reply("new normal"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(quiet_tools()),
        model.clone(),
        Arc::new(RecordingSink::default()),
    );

    let mut previous = netwarden_core::pipeline::Baseline::new();
    previous.insert("peak_connections".into(), json!(900));
    previous.insert("llm_suggestions".into(), Value::String("old".into()));
    let record = MonitoringRecord::new(4).with_baseline(previous);

    let outcome = pipeline.run(record).await.expect("cycle completes");
    let keys: Vec<&str> = outcome
        .record
        .historical_baseline
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["last_update", "llm_suggestions"]);
    assert_eq!(
        outcome.record.historical_baseline["llm_suggestions"],
        json!("new normal")
    );

    // the stale baseline was still shown to the model
    assert!(model.requests()[0][1].content.contains("peak_connections"));
}

#[tokio::test]
async fn blank_analysis_reaches_the_report_as_none() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new().reply("").reply("report").reply("baseline"));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(noisy_tools("HIGH: x")),
        model.clone(),
        Arc::new(RecordingSink::default()),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    assert_eq!(outcome.record.alerts, vec!["report"]);

    let report_prompt = &model.requests()[1][1].content;
    assert!(report_prompt.contains("Analysis: None"));
    assert!(!report_prompt.contains("Analyze these anomalies"));
}

#[tokio::test]
async fn baseline_suggestion_is_truncated() {
    let dir = tempdir().expect("tempdir");
    let long = "x".repeat(900);
    let model = Arc::new(FakeModel::new().reply(&long));
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(quiet_tools()),
        model,
        Arc::new(RecordingSink::default()),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    let snippet = outcome.record.historical_baseline["llm_suggestions"]
        .as_str()
        .expect("string");
    assert_eq!(snippet.chars().count(), 500);
}

#[tokio::test]
async fn model_failure_uses_fallbacks() {
    let dir = tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::default());
    let model = Arc::new(
        FakeModel::new()
            .fail("connection reset")
            .fail("connection reset")
            .fail("connection reset"),
    );
    let pipeline = Pipeline::new(
        config(&dir.path().join("alerts.log")),
        Arc::new(noisy_tools("HIGH: brute force on sshd")),
        model,
        sink.clone(),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    let record = outcome.record;

    assert_eq!(record.recommendations.len(), 1);
    assert!(record.recommendations[0].starts_with("LLM analysis failed: "));
    assert!(record.conversation_messages.is_empty());

    assert_eq!(record.alerts.len(), 1);
    let report = &record.alerts[0];
    assert!(report.contains("Security Report - "));
    assert!(report.contains("Anomalies Detected: 1\nHIGH: brute force on sshd"));
    assert!(report.contains("- LLM analysis failed: "));

    assert_eq!(sink.published(), vec![record.alerts.clone()]);
}

#[tokio::test]
async fn missing_prompt_aborts_the_cycle() {
    let dir = tempdir().expect("tempdir");
    let model = Arc::new(FakeModel::new());
    let pipeline = Pipeline::new(
        config_with(&dir.path().join("alerts.log"), "", true),
        Arc::new(noisy_tools("CRITICAL: exfiltration")),
        model.clone(),
        Arc::new(RecordingSink::default()),
    );

    let err = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect_err("prompt is missing");
    match err {
        PipelineError::Prompt { prompt, source } => {
            assert_eq!(prompt, ANOMALY_ANALYSIS);
            assert!(matches!(source, ConfigError::PromptNotFound { .. }));
        }
    }
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn missing_baseline_prompt_is_absorbed() {
    let dir = tempdir().expect("tempdir");
    let prompts_without_baseline = PROMPTS
        .split("[prompts.baseline_learning]")
        .next()
        .expect("prefix");
    let pipeline = Pipeline::new(
        config_with(&dir.path().join("alerts.log"), prompts_without_baseline, true),
        Arc::new(quiet_tools()),
        Arc::new(FakeModel::new()),
        Arc::new(RecordingSink::default()),
    );

    let outcome = pipeline
        .run(MonitoringRecord::new(1))
        .await
        .expect("cycle completes");
    assert!(outcome.record.historical_baseline.is_empty());
}
