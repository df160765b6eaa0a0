//! CLI configuration: thin wrapper around `firewatch_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--url, --timeout, --config).

use std::path::PathBuf;

use firewatch_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use firewatch_config::{Config, config_path, load_config_from, save_config_to};

/// The config file in effect: `--config` when given, else the default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// File + environment, then flag overrides on top.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config_from(&active_config_path(global))?;

    // Flags beat file and environment
    if let Some(ref url) = global.url {
        cfg.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout_secs = timeout;
    }
    Ok(cfg)
}

/// Translate the resolved config into the core's runtime config.
pub fn resolve_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = resolve_config(global)?;
    cfg.to_dashboard_config().map_err(|e| match e {
        firewatch_config::ConfigError::Validation { field, reason } => {
            CliError::Validation { field, reason }
        }
        other => CliError::Config(other),
    })
}
