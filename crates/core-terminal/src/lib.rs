//! Terminal backend abstraction and crossterm implementation.
//!
//! The pager owns the whole screen: raw mode, the alternate screen, a hidden
//! cursor and (optionally) mouse capture. `TerminalGuard` restores all of it
//! on drop so an early return or panic never leaves the shell unusable.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
        size,
    },
};
use std::io::stdout;
use tracing::debug;

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size as (columns, rows).
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
    mouse: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CrosstermBackend {
    pub fn new(mouse: bool) -> Self {
        Self {
            entered: false,
            mouse,
        }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        enable_raw_mode().context("enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, Hide).context("enter alternate screen")?;
        if self.mouse {
            execute!(stdout(), EnableMouseCapture).context("enable mouse capture")?;
        }
        self.entered = true;
        debug!(target: "terminal", mouse = self.mouse, "terminal_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        if self.mouse {
            execute!(stdout(), DisableMouseCapture)?;
        }
        execute!(stdout(), LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        self.entered = false;
        debug!(target: "terminal", "terminal_left");
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        size().context("query terminal size")
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl TerminalGuard<'_> {
    pub fn backend(&mut self) -> &mut CrosstermBackend {
        self.backend
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_without_enter_is_noop() {
        let mut backend = CrosstermBackend::new(false);
        assert!(!backend.is_entered());
        assert!(backend.leave().is_ok());
        assert!(!backend.is_entered());
    }
}
