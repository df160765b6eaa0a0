//! Clap derive structures for the `firewatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// firewatch -- command-line client for the fire-alarm detector
#[derive(Debug, Parser)]
#[command(
    name = "firewatch",
    version,
    about = "Check on a fire-alarm detector from the command line",
    long_about = "Query a fire-alarm beep detector's live status and detection log,\n\
        manage its push-notification settings, and send test notifications.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Detector service URL (overrides config file)
    #[arg(long, short = 'u', env = "FIREWATCH_URL", global = true)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long, env = "FIREWATCH_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Config file to read instead of the default location
    #[arg(long, env = "FIREWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FIREWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the detector's current state
    #[command(alias = "st")]
    Status,

    /// Show the detection log, most recent first
    #[command(alias = "log")]
    History(HistoryArgs),

    /// View or change notification settings
    Settings(SettingsArgs),

    /// Ask the detector to send one test notification
    #[command(alias = "test")]
    TestNotification,

    /// Check that the API and the detector process are up
    Health,

    /// Follow the detector's state until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── History ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Show at most this many detections
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the detector's notification settings
    Show,

    /// Change notification settings (unspecified fields keep their value)
    Set {
        /// Push channel topic (empty string clears it)
        #[arg(long)]
        topic: Option<String>,

        /// Enable or disable notifications
        #[arg(long)]
        enabled: Option<bool>,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Exit after printing this many state changes
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file pointing at the detector given by --url
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
