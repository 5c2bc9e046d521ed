//! Application constants
//!
//! Single source of truth for paths, tool names and fixed timings.

/// Configuration files tried in order when no explicit path is given
pub const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "config.toml",
    "../config.toml",
    "/etc/netwarden/config.toml",
];

/// Default environment file path
pub const ENV_PATH: &str = ".env";

/// Default alert log location
pub const DEFAULT_ALERT_LOG: &str = "./logs/alerts.log";

/// MCP tool returning recent network events
pub const TOOL_EVENTS_HISTORY: &str = "get_network_events_history";

/// MCP tool returning aggregated network event statistics
pub const TOOL_EVENT_STATS: &str = "get_network_event_stats";

/// MCP tool running server-side anomaly detection
pub const TOOL_DETECT_ANOMALIES: &str = "detect_network_anomalies";

/// Window used by the baseline step when it has to fetch its own stats
pub const BASELINE_WINDOW_MINUTES: u64 = 60;

/// Characters of the model's baseline suggestion kept in the record
pub const BASELINE_SNIPPET_CHARS: usize = 500;

/// Back-off after a failed monitoring cycle
pub const CYCLE_RETRY_DELAY_SECS: u64 = 60;

/// Width of the separator line framing alert log blocks
pub const ALERT_SEPARATOR_WIDTH: usize = 80;

/// Upper bound for a single MCP HTTP exchange.
pub const MCP_REQUEST_TIMEOUT_SECS: u64 = 120;
