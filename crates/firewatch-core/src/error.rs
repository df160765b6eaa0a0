// ── Core error types ──
//
// Operator-facing errors from firewatch-core. The `From<firewatch_api::Error>`
// impl turns transport-layer failures into the messages the dashboard shows.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach detector: {reason}")]
    Unreachable { reason: String },

    #[error("Detector request timed out")]
    Timeout,

    // ── Response errors ──────────────────────────────────────────────
    /// Non-success HTTP status. `message` is the service's own error text,
    /// or "Detector not responding" when it sent none.
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {detail}")]
    Malformed { detail: String },

    #[error("Test notification failed: {message}")]
    NotificationFailed { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("A settings save is already in progress")]
    SaveInProgress,

    #[error("A test notification is already in progress")]
    TestInProgress,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Text for the persistent status banner.
    pub fn banner_message(&self) -> String {
        match self {
            Self::Malformed { .. } => "Malformed status response".into(),
            other => other.to_string(),
        }
    }
}

/// Innermost message of an error chain, e.g. "Connection refused (os error 111)"
/// rather than reqwest's "error sending request for url (...)".
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<firewatch_api::Error> for CoreError {
    fn from(err: firewatch_api::Error) -> Self {
        match err {
            firewatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_decode() {
                    CoreError::Malformed {
                        detail: e.to_string(),
                    }
                } else {
                    CoreError::Unreachable {
                        reason: root_cause(e),
                    }
                }
            }
            firewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            firewatch_api::Error::Timeout { .. } => CoreError::Timeout,
            firewatch_api::Error::Http { status, message } => {
                CoreError::Rejected { status, message }
            }
            firewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Malformed { detail: message }
            }
            firewatch_api::Error::NotificationFailed { message } => {
                CoreError::NotificationFailed { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_with_service_text() {
        let err = CoreError::from(firewatch_api::Error::Http {
            status: 503,
            message: "Detector not running".into(),
        });
        assert_eq!(err.banner_message(), "Detector not running (HTTP 503)");
    }

    #[test]
    fn http_error_without_service_text() {
        let err = CoreError::from(firewatch_api::Error::Http {
            status: 502,
            message: "Detector not responding".into(),
        });
        assert_eq!(err.banner_message(), "Detector not responding (HTTP 502)");
    }

    #[test]
    fn timeout_banner() {
        let err = CoreError::from(firewatch_api::Error::Timeout { timeout_secs: 10 });
        assert!(matches!(err, CoreError::Timeout));
        assert_eq!(err.banner_message(), "Detector request timed out");
    }

    #[test]
    fn malformed_banner_hides_parser_detail() {
        let err = CoreError::from(firewatch_api::Error::Deserialization {
            message: "missing field `state`".into(),
            body: "{}".into(),
        });
        assert_eq!(err.banner_message(), "Malformed status response");
        assert!(err.to_string().contains("missing field"));
    }
}
