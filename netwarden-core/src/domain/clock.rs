use chrono::Local;

/// Local wall-clock time as ISO-8601 with microsecond precision,
/// e.g. `2025-03-14T09:26:53.589793`.
pub fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
