//! Terminal input pump.
//!
//! A background task merges crossterm input with two clocks: a slow pulse
//! that advances spinners and "n s ago" labels, and a frame clock that
//! triggers redraws. Everything arrives on one channel in arrival order.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Spinner and relative-time refresh.
    Pulse,
    /// Time to draw a frame.
    Frame,
    /// The terminal input stream ended or failed.
    InputClosed,
}

/// Clock rates for the input pump.
#[derive(Debug, Clone, Copy)]
pub struct EventRates {
    pub pulse: Duration,
    pub frame: Duration,
}

impl Default for EventRates {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(250),
            frame: Duration::from_millis(50),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    /// Start pumping events until `cancel` fires or the receiver is dropped.
    pub fn spawn(rates: EventRates, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(pump(rates, tx, cancel));
        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn pump(rates: EventRates, tx: mpsc::UnboundedSender<Event>, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut pulse = interval(rates.pulse);
    let mut frame = interval(rates.frame);
    pulse.set_missed_tick_behavior(MissedTickBehavior::Skip);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    debug!(error = %e, "terminal input failed");
                    Event::InputClosed
                }
                None => Event::InputClosed,
            },
            _ = pulse.tick() => Event::Pulse,
            _ = frame.tick() => Event::Frame,
        };

        let closed = matches!(event, Event::InputClosed);
        if tx.send(event).is_err() || closed {
            break;
        }
    }
}

/// Key presses and resizes; releases, repeats, mouse and paste are dropped.
fn translate(raw: TermEvent) -> Option<Event> {
    match raw {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn key(kind: KeyEventKind) -> TermEvent {
        TermEvent::Key(KeyEvent {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_key_presses_pass() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert!(translate(key(KeyEventKind::Release)).is_none());
        assert!(translate(key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn resize_carries_dimensions() {
        assert!(matches!(
            translate(TermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        ));
        assert!(translate(TermEvent::FocusGained).is_none());
    }
}
