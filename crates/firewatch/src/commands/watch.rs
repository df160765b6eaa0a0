//! `firewatch watch`: run the polling dashboard and print state changes.
//!
//! One line per change of the status card or the error banner. Structured
//! output formats emit one compact JSON object per line.

use chrono::Local;
use serde::Serialize;

use firewatch_core::{Dashboard, DashboardConfig, Metrics, Presentation, Tone, ViewModel};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// What `watch` compares between frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct WatchLine {
    label: String,
    tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl WatchLine {
    fn from_view(vm: &ViewModel) -> Self {
        Self {
            label: vm.presentation.label.to_string(),
            tone: vm.presentation.tone,
            metrics: vm.metrics.clone(),
            error: vm.error_banner.clone(),
        }
    }

    /// Readings jitter every sample; only the card and banner count as a change.
    fn same_headline(&self, other: &Self) -> bool {
        self.label == other.label
            && self.tone == other.tone
            && self.error == other.error
            && self.metrics.as_ref().map(|m| m.beep_count)
                == other.metrics.as_ref().map(|m| m.beep_count)
    }
}

pub async fn handle(
    config: DashboardConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = config.url.clone();
    let dashboard = Dashboard::from_config(config).map_err(|e| CliError::from_core(e, &url))?;
    let mut watch = dashboard.subscribe();
    dashboard.start().await;

    let color = output::should_color(global.color);
    let mut last: Option<WatchLine> = None;
    let mut printed = 0usize;

    let result = loop {
        if args.count.is_some_and(|n| printed >= n) {
            break Ok(());
        }

        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break Ok(());
            }
            alive = watch.changed() => {
                if !alive {
                    break Ok(());
                }
            }
        }

        let vm = watch.view_model();
        // Nothing to report until the first status fetch settles.
        if vm.metrics.is_none() && vm.error_banner.is_none() {
            continue;
        }

        let line = WatchLine::from_view(&vm);
        if last.as_ref().is_some_and(|prev| prev.same_headline(&line)) {
            continue;
        }

        match render(&line, vm.presentation, global.output, color) {
            Ok(text) => output::print_output(&text, global.quiet),
            Err(e) => break Err(e),
        }
        printed += 1;
        last = Some(line);
    };

    dashboard.shutdown().await;
    result
}

fn render(
    line: &WatchLine,
    presentation: Presentation,
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => Ok(serde_json::to_string(line)?),
        OutputFormat::Yaml => Ok(format!("---\n{}", serde_yaml::to_string(line)?)),
        OutputFormat::Table | OutputFormat::Plain => {
            let time = util::format_time(Local::now());
            if let Some(ref error) = line.error {
                return Ok(format!("{time}  {error}"));
            }
            let readings = line.metrics.as_ref().map_or_else(String::new, |m| {
                format!(
                    "  {}  {}  beeps {}",
                    m.frequency_text(),
                    m.magnitude_text(),
                    m.beep_text()
                )
            });
            Ok(format!(
                "{time}  {}{readings}",
                output::paint_label(presentation, color)
            ))
        }
    }
}
