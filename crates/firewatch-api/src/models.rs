// Wire models for the detector service.
//
// Field names follow the JSON the detector writes verbatim (snake_case).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Consecutive qualifying beeps required before the detector enters the
/// alarm phase.
pub const BEEP_THRESHOLD: u32 = 3;

/// Phase of the detector's beep-pattern state machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DetectorState {
    Idle,
    Gap,
    Beep,
    Alarm,
    /// Any state string this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Instantaneous detector status from `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorStatus {
    pub state: DetectorState,
    pub alarm_active: bool,
    /// Dominant frequency in Hz.
    pub frequency: f64,
    #[serde(default)]
    pub magnitude_db: Option<f64>,
    /// Consecutive beeps counted toward [`BEEP_THRESHOLD`].
    pub beep_count: u32,
    /// Detector-side sample time.
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
}

/// One entry of the detection log from `GET /api/detections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// `None` when the logged value is missing or unreadable.
    #[serde(default, with = "crate::timestamp::option")]
    pub timestamp: Option<DateTime<Local>>,
    pub frequency: f64,
    #[serde(default)]
    pub magnitude_db: Option<f64>,
    /// Event kind, `"fire_alarm"` for everything the detector logs today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beep_count: Option<u32>,
}

/// Push-notification configuration, `GET`/`POST /api/settings`.
///
/// An empty `topic` means no channel is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Body of `POST /api/test-notification`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestNotificationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Service liveness from `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorHealth {
    pub api: String,
    pub detector: String,
}

impl DetectorHealth {
    /// Whether the detector process is writing status samples.
    pub fn detector_running(&self) -> bool {
        self.detector == "running"
    }
}
