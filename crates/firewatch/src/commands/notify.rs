//! `firewatch test-notification`

use std::time::Duration;

use firewatch_api::DetectorClient;
use firewatch_core::{NotificationTestTrigger, TransientSlot};
use firewatch_core::notify::TEST_SENT;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(client: &DetectorClient, global: &GlobalOpts) -> Result<(), CliError> {
    let trigger = NotificationTestTrigger::new(TransientSlot::new(Duration::from_secs(1)));
    trigger
        .trigger(client)
        .await
        .map_err(|e| CliError::from_core(e, client.base_url()))?;

    if !global.quiet {
        println!("{TEST_SENT}");
    }
    Ok(())
}
