mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr so they never mix with rendered output.
///
/// `FIREWATCH_LOG` takes a full `EnvFilter` directive and wins over `-v`/`-q`.
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_env("FIREWATCH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,firewatch={level},firewatch_core={level},firewatch_api={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't talk to the detector
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "firewatch", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let dashboard_config = config::resolve_dashboard_config(&cli.global)?;

            tracing::debug!(command = ?cmd, url = %dashboard_config.url, "dispatching command");
            commands::dispatch(cmd, dashboard_config, &cli.global).await
        }
    }
}
