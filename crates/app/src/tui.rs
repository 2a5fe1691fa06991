use std::io::{self, stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use ratatui::DefaultTerminal;

/// Owns the terminal while the animation runs. Raw mode, the alternate
/// screen and mouse capture are undone on drop, including on error paths.
pub struct Tui {
    pub terminal: DefaultTerminal,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        let tui = Self {
            terminal: ratatui::try_init()?,
        };
        execute!(stdout(), EnableMouseCapture)?;
        tracing::debug!("entered terminal ui");
        Ok(tui)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        tracing::debug!("restored terminal");
    }
}
