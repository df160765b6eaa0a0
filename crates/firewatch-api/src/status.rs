// Detector read endpoints
//
// Live status, the detection log, and service health.

use tracing::debug;

use crate::client::DetectorClient;
use crate::error::Error;
use crate::models::{DetectionEvent, DetectorHealth, DetectorStatus};

impl DetectorClient {
    /// Get the detector's current status.
    ///
    /// `GET /api/status`
    ///
    /// The service answers 503 with `{"error": "Detector not running"}`
    /// when the detector has not written a status sample yet.
    pub async fn get_status(&self) -> Result<DetectorStatus, Error> {
        let url = self.api_url("status")?;
        self.get(url).await
    }

    /// Get the full detection log in the order the service returns it.
    ///
    /// `GET /api/detections`
    ///
    /// The detector appends to its log, so this is oldest-first. Rows are
    /// decoded one by one: a row that cannot be read is skipped and the rest
    /// of the log still comes through.
    pub async fn list_detections(&self) -> Result<Vec<DetectionEvent>, Error> {
        let url = self.api_url("detections")?;
        let rows: Vec<serde_json::Value> = self.get(url).await?;
        let total = rows.len();
        let events = decode_rows(rows);
        debug!(count = events.len(), skipped = total - events.len(), "fetched detection log");
        Ok(events)
    }

    /// Get API and detector liveness.
    ///
    /// `GET /api/health`
    pub async fn health(&self) -> Result<DetectorHealth, Error> {
        let url = self.api_url("health")?;
        self.get(url).await
    }
}

fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<DetectionEvent> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!(index, error = %e, "skipping unreadable detection row");
                None
            }
        })
        .collect()
}
