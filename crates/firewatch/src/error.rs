//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use firewatch_config::ConfigError;
use firewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the detector at {url}")]
    #[diagnostic(
        code(firewatch::connection_failed),
        help(
            "Check that the detector service is running and reachable.\n\
             URL: {url}\n\
             Try: firewatch health --url <URL>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the detector timed out")]
    #[diagnostic(
        code(firewatch::timeout),
        help("Increase the timeout with --timeout or check the detector's load.")
    )]
    Timeout,

    // ── Detector responses ───────────────────────────────────────────
    #[error("Detector answered HTTP {status}: {message}")]
    #[diagnostic(
        code(firewatch::rejected),
        help("A 503 usually means the detector process is not running: firewatch health")
    )]
    Rejected { status: u16, message: String },

    #[error("Detector sent a response this client could not read")]
    #[diagnostic(code(firewatch::malformed), help("{detail}"))]
    Malformed { detail: String },

    #[error("Test notification was not delivered: {message}")]
    #[diagnostic(
        code(firewatch::notification_failed),
        help("Check the topic with: firewatch settings show")
    )]
    NotificationFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(firewatch::operation))]
    Operation { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(firewatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(firewatch::config),
        help("Inspect the resolved configuration with: firewatch config show")
    )]
    Config(#[from] ConfigError),

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(firewatch::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::ConfigExists { .. } => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a core error, attaching the detector URL for context.
    pub fn from_core(err: CoreError, url: &url::Url) -> Self {
        match err {
            CoreError::Unreachable { reason } => Self::ConnectionFailed {
                url: url.to_string(),
                source: reason.into(),
            },
            CoreError::Timeout => Self::Timeout,
            CoreError::Rejected { status, message } => Self::Rejected { status, message },
            CoreError::Malformed { detail } => Self::Malformed { detail },
            CoreError::NotificationFailed { message } => Self::NotificationFailed { message },
            CoreError::Config { message } => Self::Validation {
                field: "url".into(),
                reason: message,
            },
            busy @ (CoreError::SaveInProgress | CoreError::TestInProgress) => Self::Operation {
                message: busy.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("http://pi:5000").expect("url")
    }

    #[test]
    fn unreachable_maps_to_connection_exit_code() {
        let err = CliError::from_core(
            CoreError::Unreachable {
                reason: "Connection refused".into(),
            },
            &url(),
        );
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert!(err.to_string().contains("http://pi:5000"));
    }

    #[test]
    fn timeout_maps_to_timeout_exit_code() {
        let err = CliError::from_core(CoreError::Timeout, &url());
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn rejected_is_general_failure() {
        let err = CliError::from_core(
            CoreError::Rejected {
                status: 503,
                message: "Detector not running".into(),
            },
            &url(),
        );
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert_eq!(
            err.to_string(),
            "Detector answered HTTP 503: Detector not running"
        );
    }
}
