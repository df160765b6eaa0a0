//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use firewatch_core::ViewModel;

use crate::screen::ScreenId;

/// Edits to the topic field of the settings working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicInput {
    Push(char),
    Backspace,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Application lifecycle ──
    Quit,
    Resize(u16, u16),
    Pulse,
    Redraw,

    // ── Navigation ──
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data from the dashboard ──
    ViewUpdated(Arc<ViewModel>),

    // ── Operator commands ──
    TopicInput(TopicInput),
    ToggleEnabled,
    SaveSettings,
    SendTestNotification,
}
