//! Command dispatch: bridges CLI args -> detector calls -> output formatting.

pub mod config_cmd;
pub mod health;
pub mod history;
pub mod notify;
pub mod settings;
pub mod status;
pub mod util;
pub mod watch;

use firewatch_core::DashboardConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a detector-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: DashboardConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        // `watch` runs the full dashboard; everything else is one request
        Command::Watch(args) => watch::handle(config, args, global).await,
        cmd => {
            let client = util::build_client(&config)?;
            match cmd {
                Command::Status => status::handle(&client, global).await,
                Command::History(args) => history::handle(&client, args, global).await,
                Command::Settings(args) => settings::handle(&client, args, global).await,
                Command::TestNotification => notify::handle(&client, global).await,
                Command::Health => health::handle(&client, global).await,
                // Handled above or before dispatch
                Command::Watch(_) | Command::Config(_) | Command::Completions(_) => {
                    unreachable!()
                }
            }
        }
    }
}
