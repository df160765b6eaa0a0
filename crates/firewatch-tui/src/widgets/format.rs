//! Human-readable time and reading formatting helpers.

use std::time::Duration;

use chrono::{DateTime, Local};

use firewatch_core::DetectionEvent;

/// Compact "how long ago" via humantime, whole seconds only ("3s", "2m 5s").
pub fn fmt_ago(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - then).to_std().unwrap_or_default();
    let whole = Duration::from_secs(elapsed.as_secs());
    format!("{} ago", humantime::format_duration(whole))
}

/// Wall-clock time for the history table; unreadable log times say so.
pub fn fmt_event_time(ts: Option<DateTime<Local>>) -> String {
    ts.map_or_else(
        || "Invalid date".into(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Magnitude column, `--` when the detector did not report one.
pub fn fmt_magnitude(db: Option<f64>) -> String {
    db.map_or_else(|| "-- dB".into(), |db| format!("{db:.1} dB"))
}

/// Cells of one history table row: time, event, frequency, magnitude.
pub fn history_cells(event: &DetectionEvent) -> [String; 4] {
    [
        fmt_event_time(event.timestamp),
        event.event.clone().unwrap_or_else(|| "fire_alarm".into()),
        format!("{:.0} Hz", event.frequency),
        fmt_magnitude(event.magnitude_db),
    ]
}
