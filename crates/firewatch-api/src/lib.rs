// firewatch-api: Async Rust client for the fire-alarm detector service
//
// The detector publishes its live state, its detection log and its
// notification settings over a small HTTP/JSON API. This crate owns the
// wire models and transport; polling and reconciliation live in
// `firewatch-core`.

pub mod client;
pub mod error;
pub mod models;
pub mod timestamp;
pub mod transport;

mod notifications;
mod status;

pub use client::DetectorClient;
pub use error::Error;
pub use models::{
    DetectionEvent, DetectorHealth, DetectorState, DetectorStatus, NotificationSettings,
    TestNotificationResponse, BEEP_THRESHOLD,
};
pub use transport::TransportConfig;
