// ── Runtime dashboard configuration ──
//
// Describes where the detector lives and how often to poll it.
// Never touches disk: the CLI/TUI build a `DashboardConfig` (usually via
// `firewatch-config`) and hand it in.

use std::time::Duration;

use url::Url;

/// Status poll cadence.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(1);
/// Detection-log poll cadence.
pub const DEFAULT_HISTORY_INTERVAL: Duration = Duration::from_secs(5);
/// Lifetime of save/test confirmation messages.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(3);
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one dashboard instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Detector service root (e.g., `http://raspberrypi.local:5000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    pub status_interval: Duration,
    pub history_interval: Duration,
    pub message_ttl: Duration,
}

impl DashboardConfig {
    /// Config for `url` with the default cadences.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
            status_interval: DEFAULT_STATUS_INTERVAL,
            history_interval: DEFAULT_HISTORY_INTERVAL,
            message_ttl: DEFAULT_MESSAGE_TTL,
        }
    }
}
