// In-memory `DetectorApi` for tests.
//
// Each endpoint has a script of (delay, outcome) pairs consumed in order,
// then a fallback. Calls are counted when issued, not when they complete.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use firewatch_api::{
    DetectionEvent, DetectorState, DetectorStatus, Error as ApiError, NotificationSettings,
};

use crate::api::DetectorApi;

/// What an endpoint answers once its script is exhausted.
#[derive(Debug, Clone)]
pub(crate) enum Fallback<T> {
    Respond(T),
    Fail(u16),
}

pub(crate) struct Script<T> {
    queue: Mutex<VecDeque<(Duration, Result<T, ApiError>)>>,
    fallback: Mutex<Fallback<T>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(fallback: T) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Fallback::Respond(fallback)),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn push(&self, outcome: Result<T, ApiError>) {
        self.push_delayed(Duration::ZERO, outcome);
    }

    pub(crate) fn push_delayed(&self, delay: Duration, outcome: Result<T, ApiError>) {
        self.queue.lock().unwrap().push_back((delay, outcome));
    }

    pub(crate) fn set_fallback(&self, fallback: Fallback<T>) {
        *self.fallback.lock().unwrap() = fallback;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> impl Future<Output = Result<T, ApiError>> + Send + use<T>
    where
        T: Send + 'static,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.queue.lock().unwrap().pop_front();
        let (delay, outcome) = scripted.unwrap_or_else(|| {
            let outcome = match &*self.fallback.lock().unwrap() {
                Fallback::Respond(value) => Ok(value.clone()),
                Fallback::Fail(status) => Err(ApiError::Http {
                    status: *status,
                    message: "Detector not running".into(),
                }),
            };
            (Duration::ZERO, outcome)
        });
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }
}

/// Number of calls issued per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CallCounts {
    pub status: usize,
    pub detections: usize,
    pub settings: usize,
    pub saves: usize,
    pub tests: usize,
}

pub(crate) struct FakeDetector {
    pub status: Script<DetectorStatus>,
    pub detections: Script<Vec<DetectionEvent>>,
    pub settings: Script<NotificationSettings>,
    pub saves: Script<Option<NotificationSettings>>,
    pub tests: Script<()>,
    saved: Mutex<Vec<NotificationSettings>>,
}

pub(crate) fn idle_status() -> DetectorStatus {
    DetectorStatus {
        state: DetectorState::Idle,
        alarm_active: false,
        frequency: 3150.0,
        magnitude_db: Some(-24.5),
        beep_count: 0,
        timestamp: None,
    }
}

impl FakeDetector {
    pub(crate) fn new() -> Self {
        Self {
            status: Script::new(idle_status()),
            detections: Script::new(Vec::new()),
            settings: Script::new(NotificationSettings::default()),
            saves: Script::new(None),
            tests: Script::new(()),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> CallCounts {
        CallCounts {
            status: self.status.calls(),
            detections: self.detections.calls(),
            settings: self.settings.calls(),
            saves: self.saves.calls(),
            tests: self.tests.calls(),
        }
    }

    /// Every copy submitted through `store_settings`, in order.
    pub(crate) fn saved(&self) -> Vec<NotificationSettings> {
        self.saved.lock().unwrap().clone()
    }
}

impl DetectorApi for FakeDetector {
    fn fetch_status(&self) -> impl Future<Output = Result<DetectorStatus, ApiError>> + Send {
        self.status.next()
    }

    fn fetch_detections(
        &self,
    ) -> impl Future<Output = Result<Vec<DetectionEvent>, ApiError>> + Send {
        self.detections.next()
    }

    fn fetch_settings(&self) -> impl Future<Output = Result<NotificationSettings, ApiError>> + Send {
        self.settings.next()
    }

    fn store_settings(
        &self,
        settings: &NotificationSettings,
    ) -> impl Future<Output = Result<Option<NotificationSettings>, ApiError>> + Send {
        self.saved.lock().unwrap().push(settings.clone());
        self.saves.next()
    }

    fn trigger_test_notification(&self) -> impl Future<Output = Result<(), ApiError>> + Send {
        self.tests.next()
    }
}
