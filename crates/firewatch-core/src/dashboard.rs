// ── Dashboard abstraction ──
//
// Single composition point: owns the per-loop state containers, spawns the
// background tasks, derives the view model and tears everything down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use firewatch_api::{DetectionEvent, DetectorClient, NotificationSettings, TransportConfig};

use crate::api::DetectorApi;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::history::HistoryPoller;
use crate::message::{SlotState, TransientSlot};
use crate::notify::NotificationTestTrigger;
use crate::settings::{SettingsState, SettingsSync};
use crate::status::{StatusPoller, StatusSnapshot};
use crate::view::ViewModel;

/// The main entry point for frontends.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. [`start()`](Self::start)
/// spawns the status loop, the history loop, the one-shot settings load and
/// the message expiry timer; [`shutdown()`](Self::shutdown) cancels them and
/// waits for every task to finish. Dropping the last clone cancels too.
pub struct Dashboard<A: DetectorApi = DetectorClient> {
    inner: Arc<DashboardInner<A>>,
}

impl<A: DetectorApi> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DashboardInner<A> {
    api: Arc<A>,
    config: DashboardConfig,
    status: StatusPoller,
    history: HistoryPoller,
    settings: SettingsSync,
    test_trigger: NotificationTestTrigger,
    messages: TransientSlot,
    cancel: CancellationToken,
    started: AtomicBool,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<A> Drop for DashboardInner<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Dashboard<DetectorClient> {
    /// Build a dashboard talking HTTP to `config.url`.
    pub fn from_config(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = DetectorClient::new(config.url.clone(), &transport)?;
        Ok(Self::new(client, config))
    }
}

impl<A: DetectorApi> Dashboard<A> {
    /// Create a dashboard. Does NOT poll -- call [`start()`](Self::start).
    pub fn new(api: A, config: DashboardConfig) -> Self {
        let messages = TransientSlot::new(config.message_ttl);
        Self {
            inner: Arc::new(DashboardInner {
                api: Arc::new(api),
                status: StatusPoller::new(),
                history: HistoryPoller::new(),
                settings: SettingsSync::new(messages.clone()),
                test_trigger: NotificationTestTrigger::new(messages.clone()),
                messages,
                cancel: CancellationToken::new(),
                started: AtomicBool::new(false),
                task_handles: Mutex::new(Vec::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the background tasks. The first status and history fetches
    /// are issued immediately. Calling this twice is a no-op.
    pub async fn start(&self) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            debug!("dashboard already started");
            return;
        }
        if self.inner.cancel.is_cancelled() {
            debug!("dashboard already shut down");
            return;
        }

        let config = &self.inner.config;
        let mut handles = self.inner.task_handles.lock().await;

        {
            let poller = self.inner.status.clone();
            let api = Arc::clone(&self.inner.api);
            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(poller.run(api, config.status_interval, cancel)));
        }

        {
            let poller = self.inner.history.clone();
            let api = Arc::clone(&self.inner.api);
            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(poller.run(api, config.history_interval, cancel)));
        }

        {
            let settings = self.inner.settings.clone();
            let api = Arc::clone(&self.inner.api);
            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(async move {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    // Failure is already logged and leaves the defaults.
                    _ = settings.load(api.as_ref()) => {}
                }
            }));
        }

        {
            let slot = self.inner.messages.clone();
            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(slot.run_expiry(cancel)));
        }

        info!(url = %config.url, "dashboard started");
    }

    /// Cancel every task and wait for all of them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard shut down");
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Derive the current view model.
    pub fn view_model(&self) -> ViewModel {
        let message = self.inner.messages.current();
        ViewModel::derive(
            &self.inner.status.snapshot(),
            &self.inner.history.snapshot(),
            &self.inner.settings.snapshot(),
            message.as_ref(),
        )
    }

    /// Subscribe to changes in any state container.
    pub fn subscribe(&self) -> DashboardWatch {
        DashboardWatch {
            status: self.inner.status.subscribe(),
            history: self.inner.history.subscribe(),
            settings: self.inner.settings.subscribe(),
            messages: self.inner.messages.subscribe(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn edit_settings(&self, f: impl FnOnce(&mut NotificationSettings)) {
        self.inner.settings.edit(f);
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        self.inner.settings.set_topic(topic);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.settings.set_enabled(enabled);
    }

    pub fn toggle_enabled(&self) {
        self.inner.settings.toggle_enabled();
    }

    /// Save the working copy and wait for the outcome.
    pub async fn save_settings(&self) -> Result<(), CoreError> {
        self.inner.settings.save(self.inner.api.as_ref()).await
    }

    /// Save in the background. The outcome arrives as a transient message.
    pub async fn request_save(&self) {
        let settings = self.inner.settings.clone();
        let api = Arc::clone(&self.inner.api);
        let cancel = self.inner.cancel.child_token();
        self.track(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                result = settings.save(api.as_ref()) => {
                    if let Err(e) = result {
                        debug!(error = %e, "background save did not complete");
                    }
                }
            }
        }))
        .await;
    }

    // ── Test notification ────────────────────────────────────────────

    /// Whether a test notification request is outstanding.
    pub fn test_in_flight(&self) -> bool {
        self.inner.test_trigger.is_in_flight()
    }

    /// Send a test notification and wait for the outcome.
    pub async fn send_test_notification(&self) -> Result<(), CoreError> {
        self.inner.test_trigger.trigger(self.inner.api.as_ref()).await
    }

    /// Send a test notification in the background.
    pub async fn request_test_notification(&self) {
        let trigger = self.inner.test_trigger.clone();
        let api = Arc::clone(&self.inner.api);
        let cancel = self.inner.cancel.child_token();
        self.track(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                _ = trigger.trigger(api.as_ref()) => {}
            }
        }))
        .await;
    }

    async fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.inner.task_handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

// ── DashboardWatch ───────────────────────────────────────────────────

/// Change notifications across all state containers.
pub struct DashboardWatch {
    status: watch::Receiver<StatusSnapshot>,
    history: watch::Receiver<Arc<Vec<DetectionEvent>>>,
    settings: watch::Receiver<SettingsState>,
    messages: watch::Receiver<SlotState>,
}

impl DashboardWatch {
    /// Wait until any container changes. Returns `false` once the
    /// dashboard is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.status.changed() => r.is_ok(),
            r = self.history.changed() => r.is_ok(),
            r = self.settings.changed() => r.is_ok(),
            r = self.messages.changed() => r.is_ok(),
        }
    }

    /// Derive the view model from the latest values, marking them seen.
    pub fn view_model(&mut self) -> ViewModel {
        let status = self.status.borrow_and_update().clone();
        let history = Arc::clone(&self.history.borrow_and_update());
        let settings = self.settings.borrow_and_update().clone();
        let message = self.messages.borrow_and_update().current.clone();
        ViewModel::derive(&status, &history, &settings, message.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;
    use crate::fake::{Fallback, FakeDetector, idle_status};
    use crate::message::MessageKind;
    use crate::notify::{TEST_FAILED, TEST_SENT};
    use crate::settings::SAVE_FAILED;
    use crate::view::{ConnectionView, StatusLabel};
    use firewatch_api::{DetectorState, DetectorStatus, Error as ApiError};

    fn config() -> DashboardConfig {
        DashboardConfig::new(Url::parse("http://detector.test:5000").expect("url"))
    }

    fn dashboard() -> (Arc<FakeDetector>, Dashboard<Arc<FakeDetector>>) {
        let fake = Arc::new(FakeDetector::new());
        let dash = Dashboard::new(Arc::clone(&fake), config());
        (fake, dash)
    }

    fn beeping() -> DetectorStatus {
        DetectorStatus {
            state: DetectorState::Beep,
            beep_count: 2,
            ..idle_status()
        }
    }

    fn event(hour: u32) -> DetectionEvent {
        DetectionEvent {
            timestamp: Local
                .with_ymd_and_hms(2024, 6, 15, hour, 0, 0)
                .earliest(),
            frequency: 3150.0,
            magnitude_db: Some(-10.0),
            event: Some("fire_alarm".into()),
            beep_count: Some(3),
        }
    }

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "Detector not running".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_fixed_cadence() {
        let (fake, dash) = dashboard();
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let calls = fake.calls();
        assert_eq!(calls.status, 4);
        assert_eq!(calls.detections, 1);
        assert_eq!(calls.settings, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fake.calls().detections, 2);

        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn starts_connecting() {
        let (fake, dash) = dashboard();
        fake.status
            .push_delayed(Duration::from_millis(500), Ok(idle_status()));

        let vm = dash.view_model();
        assert_eq!(vm.connection, ConnectionView::Connecting);
        assert_eq!(vm.presentation.label, StatusLabel::Connecting);

        dash.start().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        let vm = dash.view_model();
        assert_eq!(vm.connection, ConnectionView::Live);
        assert_eq!(vm.presentation.label, StatusLabel::Monitoring);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn never_reverts_to_connecting_after_success() {
        let (fake, dash) = dashboard();
        fake.status.push(Ok(beeping()));
        fake.status.push(Err(http(503)));
        fake.status.push(Err(ApiError::Timeout { timeout_secs: 10 }));
        fake.status.set_fallback(Fallback::Fail(503));
        dash.start().await;

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(900)).await;
            let vm = dash.view_model();
            assert_ne!(vm.presentation.label, StatusLabel::Connecting);
            assert_eq!(
                vm.metrics.as_ref().map(|m| m.state),
                Some(DetectorState::Beep)
            );
        }

        let vm = dash.view_model();
        assert_eq!(
            vm.error_banner.as_deref(),
            Some("Detector not running (HTTP 503). Is the detector running?")
        );
        assert!(matches!(vm.connection, ConnectionView::Degraded { .. }));
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn recovery_clears_banner() {
        let (fake, dash) = dashboard();
        fake.status.push(Err(ApiError::Timeout { timeout_secs: 10 }));
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let vm = dash.view_model();
        assert_eq!(
            vm.error_banner.as_deref(),
            Some("Detector request timed out. Is the detector running?")
        );
        assert_eq!(vm.presentation.label, StatusLabel::Connecting);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let vm = dash.view_model();
        assert_eq!(vm.error_banner, None);
        assert_eq!(vm.connection, ConnectionView::Live);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn latest_issued_response_wins() {
        let (fake, dash) = dashboard();
        // Issued at t=0, arrives at t=1.5s.
        fake.status
            .push_delayed(Duration::from_millis(1500), Ok(idle_status()));
        // Issued at t=1s, arrives immediately.
        fake.status.push(Ok(beeping()));
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(1700)).await;
        let vm = dash.view_model();
        assert_eq!(vm.presentation.label, StatusLabel::Beep);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn history_renders_most_recent_first() {
        let (fake, dash) = dashboard();
        fake.detections
            .set_fallback(Fallback::Respond(vec![event(1), event(2), event(3)]));
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(dash.view_model().history, vec![event(3), event(2), event(1)]);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn history_failure_keeps_previous_log() {
        let (fake, dash) = dashboard();
        fake.detections.push(Ok(vec![event(1)]));
        fake.detections.set_fallback(Fallback::Fail(500));
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(fake.calls().detections, 2);
        let vm = dash.view_model();
        assert_eq!(vm.history, vec![event(1)]);
        assert_eq!(vm.error_banner, None);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_keeps_working_copy() {
        let (fake, dash) = dashboard();
        fake.settings.push(Ok(NotificationSettings {
            topic: "kitchen".into(),
            enabled: false,
        }));
        fake.saves.push(Err(http(500)));
        dash.start().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        dash.set_topic("garage-alarm");
        dash.toggle_enabled();
        assert!(dash.save_settings().await.is_err());

        let vm = dash.view_model();
        assert_eq!(
            vm.settings.working,
            NotificationSettings {
                topic: "garage-alarm".into(),
                enabled: true,
            }
        );
        assert!(vm.settings.dirty);
        assert_eq!(vm.message.map(|m| m.text), Some(SAVE_FAILED.to_owned()));
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_settings_load_is_not_retried() {
        let (fake, dash) = dashboard();
        fake.settings.push(Err(http(503)));
        dash.start().await;

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(fake.calls().settings, 1);
        let vm = dash.view_model();
        assert_eq!(vm.settings.working, NotificationSettings::default());
        assert!(!vm.settings.dirty);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_test_requests_send_once() {
        let (fake, dash) = dashboard();
        fake.tests.push_delayed(Duration::from_secs(2), Ok(()));
        dash.start().await;

        dash.request_test_notification().await;
        dash.request_test_notification().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(dash.test_in_flight());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fake.calls().tests, 1);
        assert!(!dash.test_in_flight());
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_failure_flag_and_expiry() {
        let (fake, dash) = dashboard();
        fake.tests.push(Err(ApiError::NotificationFailed {
            message: "delivery failed".into(),
        }));
        dash.start().await;

        dash.request_test_notification().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let message = dash.view_model().message.expect("message");
        assert_eq!(message.kind, MessageKind::Failure);
        assert_eq!(message.text, TEST_FAILED);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(dash.view_model().message, None);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_success() {
        let (fake, dash) = dashboard();
        dash.start().await;

        dash.send_test_notification().await.expect("send");
        assert_eq!(
            dash.view_model().message.map(|m| m.text),
            Some(TEST_SENT.to_owned())
        );
        assert_eq!(fake.calls().tests, 1);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_all_polling() {
        let (fake, dash) = dashboard();
        dash.start().await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        dash.shutdown().await;
        let before = fake.calls();

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(fake.calls(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_slow_in_flight_fetch() {
        let (fake, dash) = dashboard();
        fake.status
            .push_delayed(Duration::from_secs(30), Ok(beeping()));
        dash.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        dash.shutdown().await;
        tokio::time::sleep(Duration::from_secs(40)).await;

        assert_eq!(dash.view_model().presentation.label, StatusLabel::Connecting);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_dashboard_cancels_tasks() {
        let (fake, dash) = dashboard();
        dash.start().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        drop(dash);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let before = fake.calls();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fake.calls(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_wakes_on_status_change() {
        let (_fake, dash) = dashboard();
        let mut watch = dash.subscribe();
        dash.start().await;

        // The settings load may land first; keep waiting for the status.
        loop {
            assert!(watch.changed().await);
            if watch.view_model().connection != ConnectionView::Connecting {
                break;
            }
        }
        assert_eq!(dash.view_model().connection, ConnectionView::Live);
        dash.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_spawns_once() {
        let (fake, dash) = dashboard();
        dash.start().await;
        dash.start().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fake.calls().status, 1);
        assert_eq!(fake.calls().settings, 1);
        dash.shutdown().await;
    }
}
