// ── Settings sync ──
//
// Working copy of the notification settings. Loaded once, edited locally,
// pushed on demand. A failed save never touches the working copy.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use firewatch_api::NotificationSettings;

use crate::api::DetectorApi;
use crate::error::CoreError;
use crate::message::{TransientMessage, TransientSlot};

pub const SAVE_SUCCEEDED: &str = "Settings saved";
pub const SAVE_FAILED: &str = "Failed to save settings";

/// Working copy plus what we last knew about the remote copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsState {
    /// The copy the operator edits.
    pub working: NotificationSettings,
    /// Last copy confirmed by the remote (load or acknowledged save).
    pub remote: Option<NotificationSettings>,
    pub saving: bool,
    /// Whether the initial load succeeded.
    pub loaded: bool,
    /// Bumped on every local edit.
    revision: u64,
}

impl SettingsState {
    /// Whether the working copy diverges from the last known remote copy.
    /// Before a successful load the built-in default stands in for it.
    pub fn is_dirty(&self) -> bool {
        match &self.remote {
            Some(remote) => *remote != self.working,
            None => self.working != NotificationSettings::default(),
        }
    }
}

/// Read-modify-write sync of `NotificationSettings`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SettingsSync {
    state: Arc<watch::Sender<SettingsState>>,
    messages: TransientSlot,
}

impl SettingsSync {
    pub fn new(messages: TransientSlot) -> Self {
        let (state, _) = watch::channel(SettingsState::default());
        Self {
            state: Arc::new(state),
            messages,
        }
    }

    pub fn snapshot(&self) -> SettingsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.state.subscribe()
    }

    pub fn working(&self) -> NotificationSettings {
        self.state.borrow().working.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().is_dirty()
    }

    // ── Remote round-trips ───────────────────────────────────────────

    /// Fetch the remote settings once. On failure the working copy keeps
    /// its current value and nothing is retried.
    pub async fn load<A: DetectorApi>(&self, api: &A) -> Result<(), CoreError> {
        let revision = self.state.borrow().revision;
        match api.fetch_settings().await {
            Ok(remote) => {
                debug!(topic = %remote.topic, enabled = remote.enabled, "settings loaded");
                self.state.send_modify(|s| {
                    // Edits made while loading win over the fetched copy.
                    if s.revision == revision {
                        s.working = remote.clone();
                    }
                    s.remote = Some(remote);
                    s.loaded = true;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                debug!(error = %err, "settings load failed, keeping defaults");
                Err(err)
            }
        }
    }

    /// Submit the full working copy.
    ///
    /// Only one save may be in flight; a second call returns
    /// [`CoreError::SaveInProgress`] without posting a message.
    pub async fn save<A: DetectorApi>(&self, api: &A) -> Result<(), CoreError> {
        let mut submitted = None;
        self.state.send_if_modified(|s| {
            if s.saving {
                false
            } else {
                s.saving = true;
                submitted = Some((s.working.clone(), s.revision));
                true
            }
        });
        let Some((copy, revision)) = submitted else {
            return Err(CoreError::SaveInProgress);
        };

        match api.store_settings(&copy).await {
            Ok(echo) => {
                let acknowledged = echo.unwrap_or(copy);
                info!(topic = %acknowledged.topic, enabled = acknowledged.enabled, "settings saved");
                self.state.send_modify(|s| {
                    s.saving = false;
                    if s.revision == revision {
                        s.working = acknowledged.clone();
                    }
                    s.remote = Some(acknowledged);
                });
                self.messages.post(TransientMessage::success(SAVE_SUCCEEDED));
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "settings save failed");
                self.state.send_modify(|s| s.saving = false);
                self.messages.post(TransientMessage::failure(SAVE_FAILED));
                Err(err)
            }
        }
    }

    // ── Local edits ──────────────────────────────────────────────────

    /// Apply an arbitrary edit to the working copy.
    pub fn edit(&self, f: impl FnOnce(&mut NotificationSettings)) {
        self.state.send_modify(|s| {
            f(&mut s.working);
            s.revision += 1;
        });
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        let topic = topic.into();
        self.edit(|w| w.topic = topic);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.edit(|w| w.enabled = enabled);
    }

    pub fn toggle_enabled(&self) {
        self.edit(|w| w.enabled = !w.enabled);
    }
}
