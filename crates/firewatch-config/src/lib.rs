//! Shared configuration for the firewatch CLI and TUI.
//!
//! One flat TOML file plus `FIREWATCH_*` environment overrides, and the
//! translation to `firewatch_core::DashboardConfig`. Both binaries depend
//! on this crate; the CLI layers its own flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use firewatch_core::DashboardConfig;

pub const DEFAULT_URL: &str = "http://localhost:5000";
pub const ENV_PREFIX: &str = "FIREWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Detector service root (e.g., "http://raspberrypi.local:5000").
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,

    #[serde(default = "default_history_interval_ms")]
    pub history_interval_ms: u64,

    /// How long save/test confirmations stay visible.
    #[serde(default = "default_message_ttl_ms")]
    pub message_ttl_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            status_interval_ms: default_status_interval_ms(),
            history_interval_ms: default_history_interval_ms(),
            message_ttl_ms: default_message_ttl_ms(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_status_interval_ms() -> u64 {
    1000
}
fn default_history_interval_ms() -> u64 {
    5000
}
fn default_message_ttl_ms() -> u64 {
    3000
}

impl Config {
    /// Validate and translate into the core's runtime config.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let url: url::Url = self.url.parse().map_err(|e| ConfigError::Validation {
            field: "url".into(),
            reason: format!("{e}: {}", self.url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "url".into(),
                reason: format!("expected http or https, got '{}'", url.scheme()),
            });
        }

        Ok(DashboardConfig {
            url,
            timeout: non_zero("timeout_secs", Duration::from_secs(self.timeout_secs))?,
            status_interval: non_zero(
                "status_interval_ms",
                Duration::from_millis(self.status_interval_ms),
            )?,
            history_interval: non_zero(
                "history_interval_ms",
                Duration::from_millis(self.history_interval_ms),
            )?,
            message_ttl: non_zero("message_ttl_ms", Duration::from_millis(self.message_ttl_ms))?,
        })
    }
}

fn non_zero(field: &str, value: Duration) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        })
    } else {
        Ok(value)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "firewatch", "firewatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("firewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file path + environment. A missing file is not
/// an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn load(path: &str) -> figment::Result<Config> {
        load_config_from(Path::new(path)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = load("missing.toml")?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.url, "http://localhost:5000");
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                url = "http://raspberrypi.local:5000"
                status_interval_ms = 2000
                "#,
            )?;

            let cfg = load("config.toml")?;
            assert_eq!(cfg.url, "http://raspberrypi.local:5000");
            assert_eq!(cfg.status_interval_ms, 2000);
            assert_eq!(cfg.history_interval_ms, 5000);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"url = "http://from-file:5000""#)?;
            jail.set_env("FIREWATCH_URL", "http://from-env:5000");
            jail.set_env("FIREWATCH_TIMEOUT_SECS", "3");

            let cfg = load("config.toml")?;
            assert_eq!(cfg.url, "http://from-env:5000");
            assert_eq!(cfg.timeout_secs, 3);
            Ok(())
        });
    }

    #[test]
    fn dashboard_config_translation() {
        let cfg = Config {
            url: "http://pi:5000".into(),
            status_interval_ms: 250,
            ..Config::default()
        };
        let dash = cfg.to_dashboard_config().expect("valid config");
        assert_eq!(dash.url.as_str(), "http://pi:5000/");
        assert_eq!(dash.status_interval, Duration::from_millis(250));
        assert_eq!(dash.history_interval, Duration::from_secs(5));
        assert_eq!(dash.message_ttl, Duration::from_secs(3));
        assert_eq!(dash.timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_bad_url_and_zero_interval() {
        let bad_url = Config {
            url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            bad_url.to_dashboard_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "url"
        ));

        let ftp = Config {
            url: "ftp://pi".into(),
            ..Config::default()
        };
        assert!(ftp.to_dashboard_config().is_err());

        let zero = Config {
            history_interval_ms: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero.to_dashboard_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "history_interval_ms"
        ));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            url: "http://garage-pi:5000".into(),
            ..Config::default()
        };

        save_config_to(&cfg, &path).expect("save");
        let text = std::fs::read_to_string(&path).expect("read back");
        let parsed: Config = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, cfg);
    }
}
