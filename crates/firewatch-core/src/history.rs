// ── History poller ──
//
// Full-snapshot replace of the detection log. Stored in remote order;
// display order is derived in the view model.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use firewatch_api::{DetectionEvent, Error as ApiError};

use crate::api::DetectorApi;
use crate::error::CoreError;
use crate::poll::run_poll_loop;

/// Polls `GET /api/detections`. Failures keep the previous log.
#[derive(Debug, Clone)]
pub struct HistoryPoller {
    state: Arc<watch::Sender<Arc<Vec<DetectionEvent>>>>,
}

impl Default for HistoryPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryPoller {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            state: Arc::new(state),
        }
    }

    /// The log as last fetched, oldest-first.
    pub fn snapshot(&self) -> Arc<Vec<DetectionEvent>> {
        Arc::clone(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<DetectionEvent>>> {
        self.state.subscribe()
    }

    pub fn apply(&self, result: Result<Vec<DetectionEvent>, ApiError>) {
        match result {
            Ok(events) => {
                self.state.send_if_modified(|current| {
                    if **current == events {
                        false
                    } else {
                        debug!(count = events.len(), "detection log updated");
                        *current = Arc::new(events);
                        true
                    }
                });
            }
            Err(e) => {
                debug!(error = %CoreError::from(e), "history fetch failed, keeping previous log");
            }
        }
    }

    /// Poll every `period` until cancelled.
    pub async fn run<A: DetectorApi>(self, api: Arc<A>, period: Duration, cancel: CancellationToken) {
        run_poll_loop(
            "history",
            period,
            cancel,
            move || {
                let api = Arc::clone(&api);
                async move { api.fetch_detections().await }
            },
            |result| self.apply(result),
        )
        .await;
    }
}
