use thiserror::Error;

/// Top-level error type for the `firewatch-api` crate.
///
/// Covers every failure mode of the detector service: transport, HTTP
/// status, body decoding, and the application-level failure flag returned
/// by the test-notification endpoint. `firewatch-core` maps these into
/// operator-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-success status. `message` is the service's `{"error": ...}`
    /// text when the body carried one.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Application ─────────────────────────────────────────────────
    /// The service answered but reported `success: false`.
    #[error("Notification delivery failed: {message}")]
    NotificationFailed { message: String },
}
