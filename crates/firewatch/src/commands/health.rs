//! `firewatch health`: API and detector process liveness.

use owo_colors::OwoColorize;

use firewatch_api::DetectorClient;
use firewatch_core::DetectorHealth;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(client: &DetectorClient, global: &GlobalOpts) -> Result<(), CliError> {
    let health = client
        .health()
        .await
        .map_err(|e| util::api_error(e, client.base_url()))?;
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        &health,
        |h| detail(h, color),
        |h| h.detector.clone(),
    )?;
    output::print_output(&out, global.quiet);

    if health.detector_running() {
        Ok(())
    } else {
        Err(CliError::Operation {
            message: format!("Detector process is {}", health.detector),
        })
    }
}

fn detail(health: &DetectorHealth, color: bool) -> String {
    let detector = match (color, health.detector_running()) {
        (false, _) => health.detector.clone(),
        (true, true) => health.detector.green().to_string(),
        (true, false) => health.detector.red().bold().to_string(),
    };
    output::detail_lines(&[("API", health.api.clone()), ("Detector", detector)])
}
