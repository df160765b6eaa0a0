//! `firewatch settings`: show or change notification settings.

use std::time::Duration;

use firewatch_api::DetectorClient;
use firewatch_core::{NotificationSettings, SettingsSync, TransientSlot};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    client: &DetectorClient,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            let settings = client
                .get_settings()
                .await
                .map_err(|e| util::api_error(e, client.base_url()))?;
            print_settings(&settings, global)
        }

        SettingsCommand::Set { topic, enabled } => {
            if topic.is_none() && enabled.is_none() {
                return Err(CliError::Validation {
                    field: "settings".into(),
                    reason: "pass --topic and/or --enabled".into(),
                });
            }

            // No banner to show; messages only need to outlive this call.
            let sync = SettingsSync::new(TransientSlot::new(Duration::from_secs(1)));
            sync.load(client)
                .await
                .map_err(|e| CliError::from_core(e, client.base_url()))?;

            sync.edit(|s| apply_flags(s, topic, enabled));
            if !sync.is_dirty() {
                if !global.quiet {
                    eprintln!("Settings unchanged");
                }
                return print_settings(&sync.working(), global);
            }

            sync.save(client)
                .await
                .map_err(|e| CliError::from_core(e, client.base_url()))?;
            if !global.quiet {
                eprintln!("{}", firewatch_core::settings::SAVE_SUCCEEDED);
            }
            print_settings(&sync.working(), global)
        }
    }
}

/// Flags override only the fields they name.
fn apply_flags(settings: &mut NotificationSettings, topic: Option<String>, enabled: Option<bool>) {
    if let Some(topic) = topic {
        settings.topic = topic;
    }
    if let Some(enabled) = enabled {
        settings.enabled = enabled;
    }
}

fn print_settings(settings: &NotificationSettings, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(
        global.output,
        settings,
        |s| {
            output::detail_lines(&[
                (
                    "Topic",
                    if s.topic.is_empty() {
                        "(none)".into()
                    } else {
                        s.topic.clone()
                    },
                ),
                ("Enabled", if s.enabled { "yes" } else { "no" }.into()),
            ])
        },
        |s| s.topic.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
