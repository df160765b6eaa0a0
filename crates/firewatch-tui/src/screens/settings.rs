//! Settings screen: edit the notification working copy, save it, and
//! send a test notification.
//!
//! Field edits go straight to the dashboard's working copy; the form
//! re-renders from the next view model.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use firewatch_core::{MessageKind, ViewModel};

use crate::action::{Action, TopicInput};
use crate::component::Component;
use crate::theme;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    Topic,
    Enabled,
}

impl SettingsField {
    fn other(self) -> Self {
        match self {
            Self::Topic => Self::Enabled,
            Self::Enabled => Self::Topic,
        }
    }
}

pub struct SettingsScreen {
    focused: bool,
    active_field: SettingsField,
    view: Option<Arc<ViewModel>>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            active_field: SettingsField::Topic,
            view: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn busy(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.is_busy())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_panel(frame: &mut Frame, area: Rect) -> Rect {
        let panel_w = 60u16.min(area.width.saturating_sub(4));
        let panel_h = 16u16.min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(panel_w)) / 2;
        let y = (area.height.saturating_sub(panel_h)) / 2;
        let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("Notifications", theme::title_style()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        inner
    }

    fn render_topic(&self, frame: &mut Frame, area: Rect, topic: &str) {
        let active = self.focused && self.active_field == SettingsField::Topic;
        let [label_area, input_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Topic",
                if active {
                    Style::default().fg(theme::NEON_CYAN)
                } else {
                    Style::default().fg(theme::DIM_WHITE)
                },
            )),
            label_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let text = if active {
            format!("{topic}\u{2588}")
        } else {
            topic.to_owned()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::NEON_CYAN))).block(block),
            input_area,
        );
    }

    fn render_enabled(&self, frame: &mut Frame, area: Rect, enabled: bool) {
        let active = self.focused && self.active_field == SettingsField::Enabled;
        let (mark, colour) = if enabled {
            ("[x]", theme::SUCCESS_GREEN)
        } else {
            ("[ ]", theme::BORDER_GRAY)
        };
        let label_style = if active {
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(colour)),
                Span::styled(" Send push notifications on alarm", label_style),
            ])),
            area,
        );
    }

    fn render_state_line(&self, frame: &mut Frame, area: Rect, view: &ViewModel) {
        if self.busy() {
            let label = view
                .message
                .as_ref()
                .filter(|m| m.kind == MessageKind::Pending)
                .map_or_else(|| " Saving…".to_owned(), |m| format!(" {}", m.text));
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }

        let line = if let Some(ref message) = view.message {
            Span::styled(message.text.clone(), theme::message_style(message.kind))
        } else if !view.settings.loaded {
            Span::styled("Settings not loaded from the detector", theme::key_hint())
        } else if view.settings.dirty {
            Span::styled("● unsaved changes", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::styled("saved", theme::key_hint())
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_key_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.active_field {
            SettingsField::Topic => "type topic  ↑/↓ field  Enter save  Ctrl+t test  Esc back",
            SettingsField::Enabled => "Space toggle  ↑/↓ field  Enter save  t test  Esc back",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hints, theme::key_hint())).alignment(Alignment::Center),
            area,
        );
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Field navigation and save work the same on every field
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.active_field = self.active_field.other();
                return Ok(None);
            }
            KeyCode::Enter => return Ok(Some(Action::SaveSettings)),
            _ => {}
        }

        let action = match self.active_field {
            SettingsField::Topic => match key.code {
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::TopicInput(TopicInput::Clear))
                }
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    Some(Action::TopicInput(TopicInput::Push(c)))
                }
                KeyCode::Backspace => Some(Action::TopicInput(TopicInput::Backspace)),
                _ => None,
            },
            SettingsField::Enabled => match key.code {
                KeyCode::Char(' ') => Some(Action::ToggleEnabled),
                KeyCode::Char('t') => Some(Action::SendTestNotification),
                _ => None,
            },
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ViewUpdated(view) => self.view = Some(Arc::clone(view)),
            Action::Pulse => {
                if self.busy() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref view) = self.view else {
            return;
        };

        let inner = Self::render_panel(frame, area);
        let [_, topic_area, _, enabled_area, _, state_area, _, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let working = &view.settings.working;
        self.render_topic(frame, topic_area, &working.topic);
        self.render_enabled(frame, enabled_area, working.enabled);
        self.render_state_line(frame, state_area, view);
        self.render_key_hints(frame, hints_area);
    }

    fn captures_text(&self) -> bool {
        self.active_field == SettingsField::Topic
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(screen: &mut SettingsScreen, event: KeyEvent) -> Option<Action> {
        screen.handle_key_event(event).expect("key handling")
    }

    #[test]
    fn topic_field_takes_printable_keys() {
        let mut screen = SettingsScreen::new();
        assert!(screen.captures_text());

        // Letters that are global shortcuts elsewhere are plain text here
        for c in ['q', 't', ','] {
            assert_eq!(
                press(&mut screen, key(KeyCode::Char(c))),
                Some(Action::TopicInput(TopicInput::Push(c)))
            );
        }
        assert_eq!(
            press(&mut screen, key(KeyCode::Backspace)),
            Some(Action::TopicInput(TopicInput::Backspace))
        );
        assert_eq!(
            press(
                &mut screen,
                KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
            ),
            Some(Action::TopicInput(TopicInput::Clear))
        );
        assert_eq!(
            press(
                &mut screen,
                KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)
            ),
            None
        );
    }

    #[test]
    fn enabled_field_toggles_and_tests() {
        let mut screen = SettingsScreen::new();
        assert_eq!(press(&mut screen, key(KeyCode::Down)), None);
        assert!(!screen.captures_text());

        assert_eq!(
            press(&mut screen, key(KeyCode::Char(' '))),
            Some(Action::ToggleEnabled)
        );
        assert_eq!(
            press(&mut screen, key(KeyCode::Char('t'))),
            Some(Action::SendTestNotification)
        );
        assert_eq!(press(&mut screen, key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn enter_saves_from_any_field() {
        let mut screen = SettingsScreen::new();
        assert_eq!(
            press(&mut screen, key(KeyCode::Enter)),
            Some(Action::SaveSettings)
        );
        press(&mut screen, key(KeyCode::Up));
        assert_eq!(
            press(&mut screen, key(KeyCode::Enter)),
            Some(Action::SaveSettings)
        );
    }
}
