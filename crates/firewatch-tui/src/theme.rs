//! SilkCircuit Neon palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use firewatch_core::{ConnectionView, MessageKind, Tone};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Detector semantics ────────────────────────────────────────────────

/// Accent colour of the status card.
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => BORDER_GRAY,
        Tone::Alert => ERROR_RED,
        Tone::Warning => ELECTRIC_YELLOW,
        Tone::Nominal => SUCCESS_GREEN,
    }
}

/// Headline style of the status card. The alarm inverts so it reads from
/// across the room.
pub fn status_label(tone: Tone) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match tone {
        Tone::Alert => base.fg(BG_DARK).bg(ERROR_RED),
        other => base.fg(tone_color(other)),
    }
}

pub fn message_style(kind: MessageKind) -> Style {
    match kind {
        MessageKind::Pending => Style::default().fg(NEON_CYAN),
        MessageKind::Success => Style::default().fg(SUCCESS_GREEN),
        MessageKind::Failure => Style::default()
            .fg(ERROR_RED)
            .add_modifier(Modifier::BOLD),
    }
}

/// Status bar indicator for the status channel.
pub fn connection_indicator(connection: &ConnectionView) -> (&'static str, Color) {
    match connection {
        ConnectionView::Connecting => ("◐ connecting", ELECTRIC_YELLOW),
        ConnectionView::Live => ("● live", SUCCESS_GREEN),
        ConnectionView::Degraded { .. } => ("○ unreachable", ERROR_RED),
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tones_map_to_distinct_colours() {
        let colours = [
            tone_color(Tone::Neutral),
            tone_color(Tone::Alert),
            tone_color(Tone::Warning),
            tone_color(Tone::Nominal),
        ];
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn alarm_label_is_inverted() {
        let style = status_label(Tone::Alert);
        assert_eq!(style.bg, Some(ERROR_RED));
        assert_eq!(status_label(Tone::Nominal).bg, None);
    }

    #[test]
    fn degraded_connection_is_red() {
        let (text, colour) = connection_indicator(&ConnectionView::Degraded {
            error: "Detector request timed out".into(),
        });
        assert!(text.contains("unreachable"));
        assert_eq!(colour, ERROR_RED);
    }
}
