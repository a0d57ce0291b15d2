use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods, MouseButton as CButton, MouseEvent as CMouseEvent,
    MouseEventKind as CMouseKind,
};

/// Translate a terminal event. `None` for events the pager ignores (key
/// releases, focus changes, unsupported keys).
pub(crate) fn map_event(event: &CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => map_key_event(key).map(InputEvent::Key),
        CEvent::Mouse(mouse) => Some(InputEvent::Mouse(map_mouse_event(mouse))),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
        _ => None,
    }
}

pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKind::Press | CKind::Repeat) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        // Terminals report shift+tab as a distinct code.
        CKeyCode::BackTab => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    Some(KeyEvent::new(code, mods))
}

pub(crate) fn map_mouse_event(event: &CMouseEvent) -> MouseEvent {
    let kind = match event.kind {
        CMouseKind::Down(b) => MouseEventKind::Down(map_button(b)),
        CMouseKind::Up(b) => MouseEventKind::Up(map_button(b)),
        CMouseKind::Drag(b) => MouseEventKind::Drag(map_button(b)),
        CMouseKind::Moved => MouseEventKind::Moved,
        CMouseKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseKind::ScrollLeft => MouseEventKind::ScrollLeft,
        CMouseKind::ScrollRight => MouseEventKind::ScrollRight,
    };
    MouseEvent {
        kind,
        column: event.column,
        row: event.row,
        mods: map_mods(event.modifiers),
    }
}

fn map_button(b: CButton) -> MouseButton {
    match b {
        CButton::Left => MouseButton::Left,
        CButton::Middle => MouseButton::Middle,
        CButton::Right => MouseButton::Right,
    }
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn back_tab_becomes_shift_tab() {
        let key = CKeyEvent::new(CKeyCode::BackTab, CMods::SHIFT);
        assert_eq!(
            map_key_event(&key),
            Some(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT))
        );
        let bare = CKeyEvent::new(CKeyCode::BackTab, CMods::NONE);
        assert_eq!(
            map_key_event(&bare),
            Some(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT))
        );
    }

    #[test]
    fn releases_and_unknown_keys_are_dropped() {
        let release = CKeyEvent {
            code: CKeyCode::Char('j'),
            modifiers: CMods::NONE,
            kind: CKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key_event(&release), None);
        assert_eq!(map_key_event(&CKeyEvent::new(CKeyCode::F(5), CMods::NONE)), None);
        assert_eq!(map_event(&CEvent::FocusGained), None);
    }

    #[test]
    fn modifiers_are_carried() {
        let key = CKeyEvent::new(CKeyCode::Char('d'), CMods::CONTROL | CMods::ALT);
        assert_eq!(
            map_key_event(&key),
            Some(KeyEvent::new(
                KeyCode::Char('d'),
                KeyModifiers::CTRL | KeyModifiers::ALT
            ))
        );
    }

    #[test]
    fn wheel_events_keep_shift() {
        let wheel = CMouseEvent {
            kind: CMouseKind::ScrollDown,
            column: 4,
            row: 2,
            modifiers: CMods::SHIFT,
        };
        assert_eq!(
            map_event(&CEvent::Mouse(wheel)),
            Some(InputEvent::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column: 4,
                row: 2,
                mods: KeyModifiers::SHIFT,
            }))
        );
    }
}
