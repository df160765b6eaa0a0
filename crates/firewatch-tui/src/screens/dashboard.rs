//! Dashboard screen: status card, readings, error banner and detection log.

use std::sync::Arc;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table};

use firewatch_core::{BEEP_THRESHOLD, ViewModel};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::format;

pub struct DashboardScreen {
    focused: bool,
    view: Option<Arc<ViewModel>>,
    /// First visible history row.
    scroll: usize,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: None,
            scroll: 0,
        }
    }

    fn history_len(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.history.len())
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.history_len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_banner(frame: &mut Frame, area: Rect, banner: &str) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" ⚠ {banner}"),
                Style::default()
                    .fg(theme::ERROR_RED)
                    .add_modifier(Modifier::BOLD),
            )),
            area,
        );
    }

    fn render_status_card(frame: &mut Frame, area: Rect, view: &ViewModel) {
        let tone = view.presentation.tone;
        let block = Block::default()
            .title(" Status ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::tone_color(tone)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let updated = view.last_update.map_or_else(
            || "waiting for first reading".to_owned(),
            |ts| format!("updated {}", format::fmt_ago(ts, Local::now())),
        );

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}  ", view.presentation.label),
                theme::status_label(tone),
            )),
            Line::from(""),
            Line::from(Span::styled(updated, theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_metrics(frame: &mut Frame, area: Rect, view: &ViewModel) {
        let block = Block::default()
            .title(" Readings ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref metrics) = view.metrics else {
            frame.render_widget(
                Paragraph::new(Span::styled("  no readings yet", theme::key_hint())),
                inner,
            );
            return;
        };

        let [text_area, gauge_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(inner);

        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<11}"), theme::key_hint()),
                Span::styled(value, theme::table_row()),
            ])
        };
        let lines = vec![
            row("State", metrics.state.to_string()),
            row("Frequency", metrics.frequency_text()),
            row("Magnitude", metrics.magnitude_text()),
        ];
        frame.render_widget(Paragraph::new(lines), text_area);

        let ratio = f64::from(metrics.beep_count.min(BEEP_THRESHOLD)) / f64::from(BEEP_THRESHOLD);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme::tone_color(view.presentation.tone)))
            .ratio(ratio)
            .label(format!("beeps {}", metrics.beep_text()));
        frame.render_widget(gauge, gauge_area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect, view: &ViewModel) {
        let block = Block::default()
            .title(format!(" Detections ({}) ", view.history.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if view.history.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No detections yet", theme::key_hint()))
                    .block(block),
                area,
            );
            return;
        }

        let header = Row::new(["Time", "Event", "Frequency", "Magnitude"]).style(theme::table_header());
        let rows = view.history.iter().skip(self.scroll).map(|event| {
            Row::new(format::history_cells(event).map(Cell::from)).style(theme::table_row())
        });
        let widths = [
            Constraint::Length(20),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Min(10),
        ];
        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('t') => return Ok(Some(Action::SendTestNotification)),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll = self.history_len().saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewUpdated(view) = action {
            self.view = Some(Arc::clone(view));
            // Keep the viewport valid when the log shrinks
            self.scroll = self.scroll.min(self.history_len().saturating_sub(1));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref view) = self.view else {
            return;
        };

        let banner_height = u16::from(view.error_banner.is_some());
        let [banner_area, top_area, history_area] = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .areas(area);

        if let Some(ref banner) = view.error_banner {
            Self::render_banner(frame, banner_area, banner);
        }

        let [card_area, metrics_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(top_area);
        Self::render_status_card(frame, card_area, view);
        Self::render_metrics(frame, metrics_area, view);
        self.render_history(frame, history_area, view);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
