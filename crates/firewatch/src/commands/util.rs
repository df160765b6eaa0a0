//! Shared helpers for command handlers.

use chrono::{DateTime, Local};
use url::Url;

use firewatch_api::{DetectorClient, TransportConfig};
use firewatch_core::DashboardConfig;

use crate::error::CliError;

/// One HTTP client per invocation, configured from the resolved config.
pub fn build_client(config: &DashboardConfig) -> Result<DetectorClient, CliError> {
    let transport = TransportConfig::with_timeout(config.timeout);
    DetectorClient::new(config.url.clone(), &transport).map_err(|e| api_error(e, &config.url))
}

/// Route an API failure through the core's classification.
pub fn api_error(err: firewatch_api::Error, url: &Url) -> CliError {
    CliError::from_core(err.into(), url)
}

/// Shown in place of a detection time the detector logged unreadably.
pub const INVALID_TIME: &str = "Invalid date";

/// Wall-clock timestamp for tables.
pub fn format_time(ts: DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Human-friendly "how long ago".
pub fn format_ago(ts: DateTime<Local>, now: DateTime<Local>) -> String {
    let secs = (now - ts).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
