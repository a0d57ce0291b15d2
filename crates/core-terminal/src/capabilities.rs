//! Terminal capability probing, done once at startup.

use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// Emit colors. Off when `NO_COLOR` is set to a non-empty value.
    pub color: bool,
    /// stdout is a terminal (otherwise the pager prints and exits).
    pub interactive: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var_os("NO_COLOR").as_deref(),
            std::io::stdout().is_terminal(),
        )
    }

    pub fn from_env(no_color: Option<&std::ffi::OsStr>, interactive: bool) -> Self {
        Self {
            color: no_color.is_none_or(|v| v.is_empty()),
            interactive,
        }
    }
}
