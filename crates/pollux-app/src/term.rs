//! Terminal setup and teardown.
//!
//! Raw mode plus the alternate screen, restored on drop so a panic or
//! an error return still leaves the shell usable.

use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};

use pollux_gemtext::Viewport;

/// RAII guard for the terminal state.
pub struct TermGuard;

impl TermGuard {
    /// Enter raw mode on the alternate screen with the cursor hidden.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        let _ = io::stdout().flush();
    }
}

/// Current terminal geometry, read fresh each frame.
pub fn size() -> io::Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    Ok(Viewport { rows, cols })
}
