// ── Fixed-cadence poll loop ──
//
// Shared driver for the status and history pollers. Ticks are issued on a
// fixed cadence whether or not earlier fetches have completed; every fetch
// carries a sequence number and only responses newer than the last applied
// one reach the state container.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use firewatch_api::Error as ApiError;

/// Monotonic guard that keeps the most recently *issued* response
/// authoritative, whatever order responses arrive in.
#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    issued: u64,
    applied: u64,
}

impl Sequencer {
    /// Allocate the sequence number for a new request.
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns `true` if a response for `seq` should be applied.
    pub(crate) fn admit(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }
}

/// Run `fetch` every `period` (first fetch immediately) until `cancel`
/// fires, handing admitted results to `apply`.
///
/// In-flight fetches are owned by the loop and aborted on cancellation.
pub(crate) async fn run_poll_loop<T, F, Fut, A>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    fetch: F,
    mut apply: A,
) where
    T: Send + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    A: FnMut(Result<T, ApiError>),
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<(u64, Result<T, ApiError>)> = JoinSet::new();
    let mut sequencer = Sequencer::default();

    debug!(poller = name, ?period, "poll loop started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                match joined {
                    Ok((seq, result)) => {
                        if sequencer.admit(seq) {
                            apply(result);
                        } else {
                            trace!(poller = name, seq, "discarding stale response");
                        }
                    }
                    Err(e) => warn!(poller = name, error = %e, "fetch task failed"),
                }
            }
            _ = interval.tick() => {
                let seq = sequencer.issue();
                trace!(poller = name, seq, "tick");
                let request = fetch();
                in_flight.spawn(async move { (seq, request.await) });
            }
        }
    }

    in_flight.abort_all();
    debug!(poller = name, "poll loop stopped");
}
