// Notification endpoints
//
// Settings read/replace and the one-shot test notification.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{DetectorClient, parse_json};
use crate::error::Error;
use crate::models::{NotificationSettings, TestNotificationResponse};

/// Strict shape for a save echo. Unlike [`NotificationSettings`], both
/// fields are required so an unrelated body (`{"ok": true}`) is not
/// mistaken for an acknowledged empty copy.
#[derive(Deserialize)]
struct SettingsEcho {
    topic: String,
    enabled: bool,
}

impl DetectorClient {
    /// Get the current notification settings.
    ///
    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<NotificationSettings, Error> {
        let url = self.api_url("settings")?;
        self.get(url).await
    }

    /// Replace the notification settings.
    ///
    /// `POST /api/settings` with `{topic, enabled}`
    ///
    /// Any 2xx counts as success. Returns the echoed settings when the
    /// response body is a complete `{topic, enabled}` object.
    pub async fn save_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<Option<NotificationSettings>, Error> {
        let url = self.api_url("settings")?;
        let raw = self.post_raw(url, Some(settings)).await?;
        if !raw.status.is_success() {
            return Err(Self::status_error(&raw));
        }

        let echo = serde_json::from_str::<SettingsEcho>(&raw.body)
            .ok()
            .map(|e| NotificationSettings {
                topic: e.topic,
                enabled: e.enabled,
            });
        debug!(echoed = echo.is_some(), "settings saved");
        Ok(echo)
    }

    /// Ask the service to send one test notification on the configured
    /// channel.
    ///
    /// `POST /api/test-notification`
    ///
    /// The `success` flag in the body decides the outcome, whatever the
    /// HTTP status. A body without the flag falls back to the status.
    pub async fn send_test_notification(&self) -> Result<(), Error> {
        let url = self.api_url("test-notification")?;
        let raw = self.post_raw(url, None::<&()>).await?;

        let parsed: Result<TestNotificationResponse, Error> = parse_json(&raw.body);
        match parsed {
            Ok(resp) if resp.success => {
                debug!(message = ?resp.message, "test notification sent");
                Ok(())
            }
            Ok(resp) => {
                let message = resp
                    .error
                    .or(resp.message)
                    .unwrap_or_else(|| "delivery failed".into());
                warn!(status = raw.status.as_u16(), %message, "test notification rejected");
                Err(Error::NotificationFailed { message })
            }
            Err(_) if !raw.status.is_success() => Err(Self::status_error(&raw)),
            Err(e) => Err(e),
        }
    }
}
