//! `firewatch status`: one status fetch, rendered like the status card.

use serde::Serialize;

use firewatch_api::DetectorClient;
use firewatch_core::{DetectorStatus, Metrics, Presentation, Tone};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct StatusReport {
    label: String,
    tone: Tone,
    #[serde(flatten)]
    status: DetectorStatus,
}

pub async fn handle(client: &DetectorClient, global: &GlobalOpts) -> Result<(), CliError> {
    let status = client
        .get_status()
        .await
        .map_err(|e| util::api_error(e, client.base_url()))?;

    let presentation = Presentation::derive(Some(&status));
    let report = StatusReport {
        label: presentation.label.to_string(),
        tone: presentation.tone,
        status,
    };
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        &report,
        |r| detail(r, presentation, color),
        |r| r.status.state.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(report: &StatusReport, presentation: Presentation, color: bool) -> String {
    let metrics = Metrics::from_status(&report.status);
    let mut pairs = vec![
        ("Status", output::paint_label(presentation, color)),
        ("State", metrics.state.to_string()),
        ("Frequency", metrics.frequency_text()),
        ("Magnitude", metrics.magnitude_text()),
        ("Beeps", metrics.beep_text()),
    ];
    if let Some(ts) = metrics.sampled_at {
        let ago = util::format_ago(ts, chrono::Local::now());
        pairs.push(("Sampled", format!("{} ({ago})", util::format_time(ts))));
    }
    output::detail_lines(&pairs)
}
