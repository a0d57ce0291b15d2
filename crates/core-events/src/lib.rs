//! Event values exchanged between the input task, the main loop and the
//! viewport.

use std::fmt;

/// Capacity of the bounded main-loop channel. Producers await on a full
/// channel rather than dropping input.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event consumed by the main loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// The input source is gone; the loop should exit.
    Shutdown,
}

/// Normalized terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub mods: KeyModifiers,
}

impl MouseEvent {
    /// Wheel event at the origin; position is irrelevant to scrolling.
    pub const fn wheel(kind: MouseEventKind, mods: KeyModifiers) -> Self {
        Self {
            kind,
            column: 0,
            row: 0,
            mods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        let s = format!("{}", KeyEvent::ctrl('d'));
        assert!(s.contains("Char"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn constructors_set_modifiers() {
        assert!(KeyEvent::plain(KeyCode::Esc).mods.is_empty());
        assert_eq!(KeyEvent::ctrl('c').mods, KeyModifiers::CTRL);
        let wheel = MouseEvent::wheel(MouseEventKind::ScrollDown, KeyModifiers::SHIFT);
        assert_eq!((wheel.column, wheel.row), (0, 0));
        assert!(wheel.mods.contains(KeyModifiers::SHIFT));
    }
}
