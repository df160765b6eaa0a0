// ── Detector access seam ──
//
// The loops talk to the detector through `DetectorApi` so they can run
// against the real HTTP client or an in-memory double.

use std::future::Future;
use std::sync::Arc;

use firewatch_api::{
    DetectionEvent, DetectorClient, DetectorStatus, Error as ApiError, NotificationSettings,
};

/// The five remote operations the dashboard depends on.
///
/// Each returned future must be `Send + 'static`-spawnable once the
/// implementor is behind an `Arc`.
pub trait DetectorApi: Send + Sync + 'static {
    fn fetch_status(&self) -> impl Future<Output = Result<DetectorStatus, ApiError>> + Send;

    /// Full detection log in remote (oldest-first) order.
    fn fetch_detections(
        &self,
    ) -> impl Future<Output = Result<Vec<DetectionEvent>, ApiError>> + Send;

    fn fetch_settings(&self) -> impl Future<Output = Result<NotificationSettings, ApiError>> + Send;

    /// Replace the remote settings. `Some` carries the acknowledged copy
    /// when the remote echoed one.
    fn store_settings(
        &self,
        settings: &NotificationSettings,
    ) -> impl Future<Output = Result<Option<NotificationSettings>, ApiError>> + Send;

    fn trigger_test_notification(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl DetectorApi for DetectorClient {
    async fn fetch_status(&self) -> Result<DetectorStatus, ApiError> {
        self.get_status().await
    }

    async fn fetch_detections(&self) -> Result<Vec<DetectionEvent>, ApiError> {
        self.list_detections().await
    }

    async fn fetch_settings(&self) -> Result<NotificationSettings, ApiError> {
        self.get_settings().await
    }

    async fn store_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<Option<NotificationSettings>, ApiError> {
        self.save_settings(settings).await
    }

    async fn trigger_test_notification(&self) -> Result<(), ApiError> {
        self.send_test_notification().await
    }
}

impl<T: DetectorApi> DetectorApi for Arc<T> {
    fn fetch_status(&self) -> impl Future<Output = Result<DetectorStatus, ApiError>> + Send {
        (**self).fetch_status()
    }

    fn fetch_detections(
        &self,
    ) -> impl Future<Output = Result<Vec<DetectionEvent>, ApiError>> + Send {
        (**self).fetch_detections()
    }

    fn fetch_settings(&self) -> impl Future<Output = Result<NotificationSettings, ApiError>> + Send {
        (**self).fetch_settings()
    }

    fn store_settings(
        &self,
        settings: &NotificationSettings,
    ) -> impl Future<Output = Result<Option<NotificationSettings>, ApiError>> + Send {
        (**self).store_settings(settings)
    }

    fn trigger_test_notification(&self) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).trigger_test_notification()
    }
}
