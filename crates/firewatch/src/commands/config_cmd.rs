//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::active_config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            if let Some(ref url) = global.url {
                cfg.url.clone_from(url);
            }
            if let Some(timeout) = global.timeout {
                cfg.timeout_secs = timeout;
            }
            // Refuse to write something that would not load
            cfg.to_dashboard_config()?;

            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve_config(global)?;
            let out = match global.output {
                OutputFormat::Table => toml::to_string_pretty(&cfg)?,
                format => output::render_single(format, &cfg, |_| String::new(), |c| c.url.clone())?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::active_config_path(global).display());
            Ok(())
        }
    }
}
