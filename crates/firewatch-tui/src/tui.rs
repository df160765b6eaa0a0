//! Terminal session: raw mode and alternate screen for the lifetime of a
//! value, restored on drop and on panic.

use std::io::{Stdout, stdout};
use std::path::Path;

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Switch the terminal into dashboard mode.
    pub fn enter() -> Result<Self> {
        let mut session = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
        };
        // From here on a failed step drops `session`, which restores
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

/// Best effort; each step runs even if an earlier one failed.
fn restore() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Route panics and eyre reports through a terminal restore first.
///
/// Call before [`TerminalSession::enter`] so startup failures print cleanly.
pub fn install_hooks(log_file: &Path) -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section(format!("Dashboard log: {}", log_file.display()))
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
