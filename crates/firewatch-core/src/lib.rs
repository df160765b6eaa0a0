//! Polling and state reconciliation between `firewatch-api` and the
//! frontends (CLI / TUI).
//!
//! - **[`Dashboard`]** - Central facade. [`start()`](Dashboard::start)
//!   spawns the status and history poll loops and the one-shot settings
//!   load; [`shutdown()`](Dashboard::shutdown) cancels them as a unit.
//!
//! - **State containers** - [`StatusPoller`], [`HistoryPoller`],
//!   [`SettingsSync`] and the [`TransientSlot`] each own one
//!   `tokio::sync::watch` channel. They are combined only when a
//!   [`ViewModel`] is derived.
//!
//! - **[`DetectorApi`]** - The seam to the remote detector, implemented by
//!   `firewatch_api::DetectorClient`.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod message;
pub mod notify;
pub mod settings;
pub mod status;
pub mod view;

mod poll;

#[cfg(test)]
mod fake;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::DetectorApi;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardWatch};
pub use error::CoreError;
pub use history::HistoryPoller;
pub use message::{MessageKind, TransientMessage, TransientSlot};
pub use notify::NotificationTestTrigger;
pub use settings::{SettingsState, SettingsSync};
pub use status::{ConnectionHealth, StatusPoller, StatusSnapshot};
pub use view::{ConnectionView, Metrics, Presentation, SettingsForm, StatusLabel, Tone, ViewModel};

// Wire types consumers need alongside the view model.
pub use firewatch_api::{
    BEEP_THRESHOLD, DetectionEvent, DetectorHealth, DetectorState, DetectorStatus,
    NotificationSettings,
};
