//! `firewatch-tui`: live terminal dashboard for a fire-alarm detector.
//!
//! Built on [ratatui](https://ratatui.rs) over `firewatch-core`'s
//! [`Dashboard`](firewatch_core::Dashboard). Two screens: the dashboard
//! (status card, readings, detection log) and the notification settings.
//!
//! Logs are written to a file (default `/tmp/firewatch-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use firewatch_core::{Dashboard, DashboardConfig};

use crate::app::App;

/// Terminal dashboard for a fire-alarm beep detector.
#[derive(Parser, Debug)]
#[command(name = "firewatch-tui", version, about)]
struct Cli {
    /// Detector service URL (e.g., http://raspberrypi.local:5000)
    #[arg(short = 'u', long, env = "FIREWATCH_URL")]
    url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, env = "FIREWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/firewatch-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr; that would
/// corrupt the TUI output. The returned guard must live as long as the
/// application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "firewatch_tui={log_level},firewatch_core={log_level},firewatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("firewatch-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file + environment, with `--url` on top.
fn build_config(cli: &Cli) -> Result<DashboardConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(firewatch_config::config_path);
    let mut cfg = firewatch_config::load_config_from(&path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))?;
    if let Some(ref url) = cli.url {
        cfg.url.clone_from(url);
    }
    cfg.to_dashboard_config()
        .wrap_err("invalid detector configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks(&cli.log_file)?;

    let _log_guard = setup_tracing(&cli);

    let config = build_config(&cli)?;
    info!(url = %config.url, "starting firewatch-tui");

    let dashboard = Dashboard::from_config(config).wrap_err("failed to create HTTP client")?;
    let mut app = App::new(dashboard);
    app.run().await?;

    Ok(())
}
