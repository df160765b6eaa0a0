// ── View model derivation ──
//
// Pure functions from the state containers' snapshots to one renderable
// value. Nothing here performs I/O or caches across calls.

use chrono::{DateTime, Local};
use serde::Serialize;

use firewatch_api::{BEEP_THRESHOLD, DetectionEvent, DetectorState, DetectorStatus, NotificationSettings};

use crate::message::TransientMessage;
use crate::settings::SettingsState;
use crate::status::StatusSnapshot;

const BANNER_HINT: &str = "Is the detector running?";

/// Colour role of the status card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Neutral,
    Alert,
    Warning,
    Nominal,
}

/// Headline text of the status card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr)]
pub enum StatusLabel {
    #[strum(serialize = "Connecting...")]
    Connecting,
    #[strum(serialize = "FIRE ALARM DETECTED")]
    Alarm,
    #[strum(serialize = "Beep Detected")]
    Beep,
    #[strum(serialize = "Listening...")]
    Listening,
    #[strum(serialize = "Monitoring")]
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub tone: Tone,
    pub label: StatusLabel,
}

impl Presentation {
    /// Strict priority: no status, then alarm, then beep, then gap, then
    /// everything else.
    pub fn derive(status: Option<&DetectorStatus>) -> Self {
        let Some(status) = status else {
            return Self {
                tone: Tone::Neutral,
                label: StatusLabel::Connecting,
            };
        };

        if status.alarm_active {
            return Self {
                tone: Tone::Alert,
                label: StatusLabel::Alarm,
            };
        }

        match status.state {
            DetectorState::Beep => Self {
                tone: Tone::Warning,
                label: StatusLabel::Beep,
            },
            DetectorState::Gap => Self {
                tone: Tone::Nominal,
                label: StatusLabel::Listening,
            },
            _ => Self {
                tone: Tone::Nominal,
                label: StatusLabel::Monitoring,
            },
        }
    }
}

/// Connection state of the status channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ConnectionView {
    /// No status fetch has completed yet.
    Connecting,
    Live,
    /// The last status fetch failed.
    Degraded { error: String },
}

/// Detector readings for the metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub state: DetectorState,
    pub alarm_active: bool,
    pub frequency: f64,
    pub magnitude_db: Option<f64>,
    pub beep_count: u32,
    /// Detector-side sample time.
    pub sampled_at: Option<DateTime<Local>>,
}

impl Metrics {
    pub fn from_status(status: &DetectorStatus) -> Self {
        Self {
            state: status.state,
            alarm_active: status.alarm_active,
            frequency: status.frequency,
            magnitude_db: status.magnitude_db,
            beep_count: status.beep_count,
            sampled_at: status.timestamp,
        }
    }

    pub fn frequency_text(&self) -> String {
        format!("{:.0} Hz", self.frequency)
    }

    pub fn magnitude_text(&self) -> String {
        match self.magnitude_db {
            Some(db) => format!("{db:.1} dB"),
            None => "-- dB".into(),
        }
    }

    pub fn beep_text(&self) -> String {
        format!("{} / {BEEP_THRESHOLD}", self.beep_count)
    }
}

/// The settings panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsForm {
    pub working: NotificationSettings,
    pub dirty: bool,
    pub saving: bool,
    pub loaded: bool,
}

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub connection: ConnectionView,
    pub presentation: Presentation,
    pub metrics: Option<Metrics>,
    /// Client-side time of the last successful status fetch.
    pub last_update: Option<DateTime<Local>>,
    pub error_banner: Option<String>,
    /// Most-recent-first.
    pub history: Vec<DetectionEvent>,
    pub settings: SettingsForm,
    pub message: Option<TransientMessage>,
}

impl ViewModel {
    pub fn derive(
        status: &StatusSnapshot,
        history: &[DetectionEvent],
        settings: &SettingsState,
        message: Option<&TransientMessage>,
    ) -> Self {
        let current = status.status.as_deref();
        let connection = match (&status.health.last_error, current) {
            (Some(error), _) => ConnectionView::Degraded {
                error: error.clone(),
            },
            (None, Some(_)) => ConnectionView::Live,
            (None, None) => ConnectionView::Connecting,
        };

        Self {
            connection,
            presentation: Presentation::derive(current),
            metrics: current.map(Metrics::from_status),
            last_update: status.health.last_success,
            error_banner: status
                .health
                .last_error
                .as_ref()
                .map(|e| format!("{e}. {BANNER_HINT}")),
            history: most_recent_first(history),
            settings: SettingsForm {
                working: settings.working.clone(),
                dirty: settings.is_dirty(),
                saving: settings.saving,
                loaded: settings.loaded,
            },
            message: message.cloned(),
        }
    }

    /// Whether a save or a test notification is in flight.
    pub fn is_busy(&self) -> bool {
        self.settings.saving
            || self
                .message
                .as_ref()
                .is_some_and(|m| m.kind == crate::message::MessageKind::Pending)
    }
}

/// Display order for a log stored oldest-first.
pub fn most_recent_first(events: &[DetectionEvent]) -> Vec<DetectionEvent> {
    events.iter().rev().cloned().collect()
}
