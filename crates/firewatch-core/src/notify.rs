// ── Test notification trigger ──
//
// Fire-and-forget request for one test push. Progress and outcome go to
// the shared transient slot; the response's success flag decides which.
// At most one request is in flight; clones share that gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::api::DetectorApi;
use crate::error::CoreError;
use crate::message::{TransientMessage, TransientSlot};

pub const TEST_SENDING: &str = "Sending test notification…";
pub const TEST_SENT: &str = "Test notification sent";
pub const TEST_FAILED: &str = "Test notification failed";

#[derive(Debug, Clone)]
pub struct NotificationTestTrigger {
    messages: TransientSlot,
    in_flight: Arc<AtomicBool>,
}

/// Reopens the gate when the request finishes or its task is dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl NotificationTestTrigger {
    pub fn new(messages: TransientSlot) -> Self {
        Self {
            messages,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask the detector to send one test notification.
    ///
    /// While a request is outstanding further calls return
    /// [`CoreError::TestInProgress`] and post nothing.
    pub async fn trigger<A: DetectorApi>(&self, api: &A) -> Result<(), CoreError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("test notification already in flight");
            return Err(CoreError::TestInProgress);
        }
        let _gate = InFlight(Arc::clone(&self.in_flight));

        self.messages
            .post_pending(TransientMessage::pending(TEST_SENDING));

        match api.trigger_test_notification().await {
            Ok(()) => {
                info!("test notification sent");
                self.messages.post(TransientMessage::success(TEST_SENT));
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "test notification failed");
                self.messages.post(TransientMessage::failure(TEST_FAILED));
                Err(err)
            }
        }
    }
}
