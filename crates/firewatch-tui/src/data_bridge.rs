//! Data bridge: connects the [`Dashboard`] state containers to TUI actions.
//!
//! Runs as a background task: starts the dashboard's poll loops, then
//! forwards every change of any state container as a freshly derived
//! view model through the TUI's action channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use firewatch_core::Dashboard;

use crate::action::Action;

/// Run the bridge until cancelled or until the dashboard goes away.
///
/// The dashboard's own tasks are left running; the app shuts the
/// dashboard down once the event loop exits.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut watch = dashboard.subscribe();
    dashboard.start().await;

    // Initial frame so screens render the connecting state immediately
    let _ = action_tx.send(Action::ViewUpdated(Arc::new(watch.view_model())));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            alive = watch.changed() => {
                if !alive {
                    break;
                }
                let view = watch.view_model();
                if action_tx.send(Action::ViewUpdated(Arc::new(view))).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge shut down");
}
