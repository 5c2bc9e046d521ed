//! Decision points of the cycle graph. Both are pure functions of the record.

use super::record::MonitoringRecord;

const ANOMALY_MARKERS: [&str; 3] = ["HIGH", "CRITICAL", "MEDIUM"];
const ALERT_MARKERS: [&str; 2] = ["CRITICAL", "HIGH"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Investigate,
    Alert,
    Baseline,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Investigate => "investigate",
            Route::Alert => "alert",
            Route::Baseline => "baseline",
        }
    }
}

/// Case-sensitive severity check applied to the raw detector output.
pub fn has_severity_marker(text: &str) -> bool {
    ANOMALY_MARKERS.iter().any(|marker| text.contains(marker))
}

pub fn should_investigate(record: &MonitoringRecord) -> Route {
    if record.detected_anomalies.is_empty() {
        Route::Baseline
    } else {
        Route::Investigate
    }
}

pub fn should_alert(record: &MonitoringRecord) -> Route {
    let urgent = record
        .detected_anomalies
        .iter()
        .any(|anomaly| ALERT_MARKERS.iter().any(|marker| anomaly.contains(marker)));
    if urgent { Route::Alert } else { Route::Baseline }
}
