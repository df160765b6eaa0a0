// ── Transient message slot ──
//
// One slot shared by settings-save and test-notification feedback. Posting
// replaces whatever is shown and bumps a generation counter; the expiry task
// only clears the message it was armed for.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Outcome category of a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    /// An action is in flight.
    Pending,
    Success,
    Failure,
}

/// A short-lived, operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl TransientMessage {
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Pending,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Failure,
            text: text.into(),
        }
    }
}

/// Current contents of the slot.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub current: Option<TransientMessage>,
    generation: u64,
    /// `None` while the message has no deadline (pending actions).
    expires_at: Option<Instant>,
}

/// Single-message slot with auto-clear. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TransientSlot {
    state: Arc<watch::Sender<SlotState>>,
    ttl: Duration,
}

impl TransientSlot {
    pub fn new(ttl: Duration) -> Self {
        let (state, _) = watch::channel(SlotState::default());
        Self {
            state: Arc::new(state),
            ttl,
        }
    }

    /// Show `message` and clear it after the slot's TTL.
    pub fn post(&self, message: TransientMessage) {
        let deadline = Instant::now() + self.ttl;
        self.replace(message, Some(deadline));
    }

    /// Show `message` until something else replaces it.
    pub fn post_pending(&self, message: TransientMessage) {
        self.replace(message, None);
    }

    fn replace(&self, message: TransientMessage, expires_at: Option<Instant>) {
        self.state.send_modify(|s| {
            s.generation += 1;
            s.current = Some(message);
            s.expires_at = expires_at;
        });
    }

    /// Clear the slot only if it still holds generation `generation`.
    fn clear_if(&self, generation: u64) {
        self.state.send_if_modified(|s| {
            if s.generation == generation && s.current.is_some() {
                s.current = None;
                s.expires_at = None;
                true
            } else {
                false
            }
        });
    }

    pub fn current(&self) -> Option<TransientMessage> {
        self.state.borrow().current.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.state.subscribe()
    }

    /// Clear expired messages until `cancel` fires.
    pub(crate) async fn run_expiry(self, cancel: CancellationToken) {
        let mut rx = self.state.subscribe();
        loop {
            let (generation, deadline) = {
                let s = rx.borrow_and_update();
                (s.generation, s.expires_at)
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                () = sleep_until(deadline) => {
                    trace!(generation, "transient message expired");
                    self.clear_if(generation);
                }
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
