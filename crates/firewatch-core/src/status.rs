// ── Status poller ──
//
// Owns the current `DetectorStatus` and the derived connection health.
// A failed fetch records an error but never clears the last good status.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use firewatch_api::{DetectorStatus, Error as ApiError};

use crate::api::DetectorApi;
use crate::error::CoreError;
use crate::poll::run_poll_loop;

/// Health of the status channel, derived locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionHealth {
    /// Client-side time of the last successful status fetch.
    pub last_success: Option<DateTime<Local>>,
    /// Message for the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

/// Everything the status channel contributes to the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub status: Option<Arc<DetectorStatus>>,
    pub health: ConnectionHealth,
}

/// Polls `GET /api/status` and keeps the latest snapshot in a watch channel.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    state: Arc<watch::Sender<StatusSnapshot>>,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPoller {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StatusSnapshot::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.state.subscribe()
    }

    /// Fold one fetch outcome into the snapshot.
    pub fn apply(&self, result: Result<DetectorStatus, ApiError>) {
        match result {
            Ok(status) => {
                debug!(state = %status.state, alarm = status.alarm_active, "status updated");
                self.state.send_modify(|s| {
                    s.status = Some(Arc::new(status));
                    s.health.last_success = Some(Local::now());
                    s.health.last_error = None;
                });
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "status fetch failed");
                let message = err.banner_message();
                self.state.send_if_modified(|s| {
                    if s.health.last_error.as_deref() == Some(message.as_str()) {
                        false
                    } else {
                        s.health.last_error = Some(message);
                        true
                    }
                });
            }
        }
    }

    /// Poll every `period` until cancelled.
    pub async fn run<A: DetectorApi>(self, api: Arc<A>, period: Duration, cancel: CancellationToken) {
        run_poll_loop(
            "status",
            period,
            cancel,
            move || {
                let api = Arc::clone(&api);
                async move { api.fetch_status().await }
            },
            |result| self.apply(result),
        )
        .await;
    }
}
