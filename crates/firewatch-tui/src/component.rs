//! The trait every screen implements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// A screen reacts to keys with actions, absorbs broadcast actions such as
/// fresh view models, and draws itself from what it absorbed.
pub trait Component: Send {
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// True while a text field has focus, so printable keys bypass the
    /// global single-letter bindings.
    fn captures_text(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}
}
