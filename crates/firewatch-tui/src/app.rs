//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use firewatch_core::{Dashboard, ViewModel};

use crate::action::{Action, TopicInput};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventRates, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::TerminalSession;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Latest view model, for the status bar and busy checks.
    view: Option<Arc<ViewModel>>,
    /// Action sender: the bridge and components dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver: main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            dashboard,
            active_screen: ScreenId::Dashboard,
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            view: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop, then tear the dashboard down.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::enter()?;

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        // Input pump and data bridge both stop on this token
        let shutdown = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            shutdown.child_token(),
        ));
        let mut events = EventReader::spawn(EventRates::default(), shutdown.child_token());

        info!(url = %self.dashboard.config().url, "TUI event loop started");
        let result = self.event_loop(&mut session, &mut events).await;

        shutdown.cancel();
        let _ = bridge.await;
        self.dashboard.shutdown().await;
        drop(session);
        info!("TUI event loop ended");
        result
    }

    async fn event_loop(
        &mut self,
        session: &mut TerminalSession,
        events: &mut EventReader,
    ) -> Result<()> {
        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Pulse => self.action_tx.send(Action::Pulse)?,
                Event::Frame => self.action_tx.send(Action::Redraw)?,
                Event::InputClosed => {
                    debug!("terminal input closed");
                    self.action_tx.send(Action::Quit)?;
                }
            }

            // Drain everything queued, drawing whenever a frame was due
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action).await?;

                if let Action::Redraw = action {
                    session.draw(|frame| self.render(frame))?;
                }
            }
        }
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Bindings that never collide with text input
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                return Ok(Some(Action::SendTestNotification));
            }
            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.other())));
            }
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),
            _ => {}
        }

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };

        // Single-letter globals yield to a focused text field
        if !screen.captures_text() && key.modifiers == KeyModifiers::NONE {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                KeyCode::Char(',') => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.other())));
                }
                KeyCode::Char(c) => {
                    if let Some(id) = ScreenId::from_hotkey(c) {
                        return Ok(Some(Action::SwitchScreen(id)));
                    }
                }
                _ => {}
            }
        }

        screen.handle_key_event(key)
    }

    /// Process a single action: update app state, call into the dashboard,
    /// and propagate to components.
    async fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::GoBack => {
                let target = self.previous_screen.take().unwrap_or(ScreenId::Dashboard);
                self.switch_screen(target);
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::ViewUpdated(view) => {
                self.view = Some(Arc::clone(view));
                self.broadcast(action)?;
            }

            Action::Pulse => self.broadcast(action)?,

            Action::TopicInput(input) => match input {
                TopicInput::Push(c) => self.dashboard.edit_settings(|s| s.topic.push(*c)),
                TopicInput::Backspace => self.dashboard.edit_settings(|s| {
                    s.topic.pop();
                }),
                TopicInput::Clear => self.dashboard.set_topic(String::new()),
            },

            Action::ToggleEnabled => self.dashboard.toggle_enabled(),

            Action::SaveSettings => {
                if self.view.as_ref().is_some_and(|v| v.settings.saving) {
                    debug!("save already in flight");
                } else {
                    self.dashboard.request_save().await;
                }
            }

            Action::SendTestNotification => {
                if self.dashboard.test_in_flight() {
                    debug!("test notification already in flight");
                } else {
                    self.dashboard.request_test_notification().await;
                }
            }

            // Drawn by the main loop; size is re-read on draw
            Action::Redraw | Action::Resize(..) => {}
        }

        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Data and ticks go to every screen so a background screen is current
    /// the moment it is shown.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.hotkey(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Connection indicator, the transient message, and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];

        if let Some(ref view) = self.view {
            let (text, colour) = theme::connection_indicator(&view.connection);
            spans.push(Span::styled(text, Style::default().fg(colour)));

            if let Some(ref message) = view.message {
                spans.push(Span::styled(" │ ", theme::key_hint()));
                spans.push(Span::styled(
                    message.text.clone(),
                    theme::message_style(message.kind),
                ));
            }
        }

        spans.push(Span::styled(
            " │ t test  , settings  ? help  q quit",
            theme::key_hint(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 52u16.min(area.width.saturating_sub(4));
        let help_height = 16u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            entry("1-2 Tab ,", "Switch screen"),
            entry("Esc", "Back / close"),
            entry("t  Ctrl+t", "Send test notification"),
            entry("j/k ↑/↓", "Scroll detections / move field"),
            entry("Enter", "Save settings"),
            entry("Space", "Toggle notifications"),
            entry("Ctrl+u", "Clear topic"),
            entry("q  Ctrl+c", "Quit"),
            Line::from(""),
            Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
