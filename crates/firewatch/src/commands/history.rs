//! `firewatch history`: the detection log, most recent first.

use tabled::Tabled;

use firewatch_api::DetectorClient;
use firewatch_core::{DetectionEvent, view::most_recent_first};

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DetectionRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Magnitude")]
    magnitude: String,
}

impl From<&DetectionEvent> for DetectionRow {
    fn from(e: &DetectionEvent) -> Self {
        Self {
            time: e
                .timestamp
                .map_or_else(|| util::INVALID_TIME.into(), util::format_time),
            event: e.event.clone().unwrap_or_else(|| "fire_alarm".into()),
            frequency: format!("{:.0} Hz", e.frequency),
            magnitude: e
                .magnitude_db
                .map_or_else(|| "-- dB".into(), |db| format!("{db:.1} dB")),
        }
    }
}

pub async fn handle(
    client: &DetectorClient,
    args: HistoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let stored = client
        .list_detections()
        .await
        .map_err(|e| util::api_error(e, client.base_url()))?;

    let events = newest(&stored, args.limit);
    if events.is_empty() && global.output == crate::cli::OutputFormat::Table {
        if !global.quiet {
            eprintln!("No detections yet");
        }
        return Ok(());
    }

    let out = output::render_list(global.output, &events, |e| DetectionRow::from(e), |e| {
        e.timestamp
            .map_or_else(|| util::INVALID_TIME.into(), |ts| ts.to_rfc3339())
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Most recent first, truncated to `limit` when given.
fn newest(stored: &[DetectionEvent], limit: Option<usize>) -> Vec<DetectionEvent> {
    let mut events = most_recent_first(stored);
    if let Some(limit) = limit {
        events.truncate(limit);
    }
    events
}
