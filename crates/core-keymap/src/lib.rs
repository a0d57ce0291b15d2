//! Key bindings for the pager.
//!
//! A [`KeyMap`] maps parsed [`KeyBinding`]s to [`PagerAction`]s. Resolution is
//! a linear scan in action order: the first action with a matching binding
//! wins. Defaults can be replaced per action from configuration strings such
//! as `"ctrl+d"`, `"pgdn"`, `"space"` or `"shift+tab"`.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Everything a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerAction {
    PageDown,
    PageUp,
    HalfPageDown,
    HalfPageUp,
    Down,
    Up,
    Left,
    Right,
    NextRevision,
    PrevRevision,
    ToggleDiffMode,
    ToggleViewMode,
    ToggleWordWrap,
    // Handled by the application shell rather than the viewport.
    Quit,
    OpenSearch,
    SearchNext,
    SearchPrevious,
    ClearSearch,
    GotoTop,
    GotoBottom,
    ToggleHunks,
}

impl PagerAction {
    pub const ALL: [PagerAction; 21] = [
        PagerAction::PageDown,
        PagerAction::PageUp,
        PagerAction::HalfPageDown,
        PagerAction::HalfPageUp,
        PagerAction::Down,
        PagerAction::Up,
        PagerAction::Left,
        PagerAction::Right,
        PagerAction::NextRevision,
        PagerAction::PrevRevision,
        PagerAction::ToggleDiffMode,
        PagerAction::ToggleViewMode,
        PagerAction::ToggleWordWrap,
        PagerAction::Quit,
        PagerAction::OpenSearch,
        PagerAction::SearchNext,
        PagerAction::SearchPrevious,
        PagerAction::ClearSearch,
        PagerAction::GotoTop,
        PagerAction::GotoBottom,
        PagerAction::ToggleHunks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PagerAction::PageDown => "page_down",
            PagerAction::PageUp => "page_up",
            PagerAction::HalfPageDown => "half_page_down",
            PagerAction::HalfPageUp => "half_page_up",
            PagerAction::Down => "down",
            PagerAction::Up => "up",
            PagerAction::Left => "left",
            PagerAction::Right => "right",
            PagerAction::NextRevision => "next_revision",
            PagerAction::PrevRevision => "prev_revision",
            PagerAction::ToggleDiffMode => "toggle_diff_mode",
            PagerAction::ToggleViewMode => "toggle_view_mode",
            PagerAction::ToggleWordWrap => "toggle_word_wrap",
            PagerAction::Quit => "quit",
            PagerAction::OpenSearch => "open_search",
            PagerAction::SearchNext => "search_next",
            PagerAction::SearchPrevious => "search_previous",
            PagerAction::ClearSearch => "clear_search",
            PagerAction::GotoTop => "goto_top",
            PagerAction::GotoBottom => "goto_bottom",
            PagerAction::ToggleHunks => "toggle_hunks",
        }
    }

    /// True for actions the viewport applies on its own.
    pub fn is_viewport(self) -> bool {
        !matches!(
            self,
            PagerAction::Quit
                | PagerAction::OpenSearch
                | PagerAction::SearchNext
                | PagerAction::SearchPrevious
                | PagerAction::ClearSearch
                | PagerAction::GotoTop
                | PagerAction::GotoBottom
                | PagerAction::ToggleHunks
        )
    }
}

impl fmt::Display for PagerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PagerAction {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        PagerAction::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| KeyParseError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

/// One key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Printable characters already encode shift in their case, so SHIFT is
    /// ignored when comparing them.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => {
                a == b && self.mods - KeyModifiers::SHIFT == key.mods - KeyModifiers::SHIFT
            }
            (a, b) => a == b && self.mods == key.mods,
        }
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    Some(match name {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdn" | "pgdown" | "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        _ => return None,
    })
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    /// `[modifier+]*key`, modifiers `ctrl`, `alt`, `shift`. A lone `+` is the
    /// plus key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let (mods_part, key_part) = match s.rfind('+') {
            Some(i) if i + 1 < s.len() => (&s[..i], &s[i + 1..]),
            _ => ("", s),
        };
        let mut mods = KeyModifiers::empty();
        for m in mods_part.split('+').filter(|m| !m.is_empty()) {
            mods |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CTRL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(KeyParseError::UnknownModifier(m.to_string())),
            };
        }
        let mut chars = key_part.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => named_key(&key_part.to_ascii_lowercase())
                .ok_or_else(|| KeyParseError::UnknownKey(key_part.to_string()))?,
        };
        Ok(Self { code, mods })
    }
}

type Bindings = SmallVec<[KeyBinding; 3]>;

#[derive(Debug, Clone)]
pub struct KeyMap {
    entries: Vec<(PagerAction, Bindings)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        use KeyCode as K;
        use PagerAction as A;
        let ctrl = |c| KeyBinding::new(K::Char(c), KeyModifiers::CTRL);
        let entries: Vec<(PagerAction, Bindings)> = vec![
            (
                A::PageDown,
                smallvec![
                    KeyBinding::key(K::PageDown),
                    KeyBinding::char(' '),
                    KeyBinding::char('f')
                ],
            ),
            (A::PageUp, smallvec![KeyBinding::key(K::PageUp), KeyBinding::char('b')]),
            (A::HalfPageDown, smallvec![KeyBinding::char('d'), ctrl('d')]),
            (A::HalfPageUp, smallvec![KeyBinding::char('u'), ctrl('u')]),
            (A::Down, smallvec![KeyBinding::key(K::Down), KeyBinding::char('j')]),
            (A::Up, smallvec![KeyBinding::key(K::Up), KeyBinding::char('k')]),
            (A::Left, smallvec![KeyBinding::key(K::Left), KeyBinding::char('h')]),
            (A::Right, smallvec![KeyBinding::key(K::Right), KeyBinding::char('l')]),
            (A::NextRevision, smallvec![KeyBinding::key(K::Tab)]),
            (
                A::PrevRevision,
                smallvec![KeyBinding::new(K::Tab, KeyModifiers::SHIFT)],
            ),
            (A::ToggleDiffMode, smallvec![KeyBinding::char('m')]),
            (A::ToggleViewMode, smallvec![KeyBinding::char('v')]),
            (A::ToggleWordWrap, smallvec![KeyBinding::char('w')]),
            (A::Quit, smallvec![KeyBinding::char('q'), ctrl('c')]),
            (A::OpenSearch, smallvec![KeyBinding::char('/')]),
            (A::SearchNext, smallvec![KeyBinding::char('n')]),
            (A::SearchPrevious, smallvec![KeyBinding::char('N')]),
            (A::ClearSearch, smallvec![KeyBinding::key(K::Esc)]),
            (A::GotoTop, smallvec![KeyBinding::char('g'), KeyBinding::key(K::Home)]),
            (A::GotoBottom, smallvec![KeyBinding::char('G'), KeyBinding::key(K::End)]),
            (A::ToggleHunks, smallvec![KeyBinding::char('H')]),
        ];
        Self { entries }
    }
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<PagerAction> {
        let hit = self
            .entries
            .iter()
            .find(|(_, bindings)| bindings.iter().any(|b| b.matches(key)))
            .map(|(action, _)| *action);
        trace!(target: "keymap", key = %key, action = ?hit, "resolve");
        hit
    }

    pub fn bindings(&self, action: PagerAction) -> &[KeyBinding] {
        self.entries
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, b)| b.as_slice())
            .unwrap_or(&[])
    }

    /// Replace every binding of `action`.
    pub fn set(&mut self, action: PagerAction, bindings: impl IntoIterator<Item = KeyBinding>) {
        let bindings: Bindings = bindings.into_iter().collect();
        match self.entries.iter_mut().find(|(a, _)| *a == action) {
            Some((_, slot)) => *slot = bindings,
            None => self.entries.push((action, bindings)),
        }
    }

    /// Apply `action name -> binding strings` overrides. Malformed entries are
    /// skipped and returned; an action whose bindings all fail keeps its
    /// defaults.
    pub fn apply_overrides<'a, I, S>(&mut self, overrides: I) -> Vec<KeyParseError>
    where
        I: IntoIterator<Item = (&'a str, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        let mut errors = Vec::new();
        for (name, keys) in overrides {
            let action = match name.parse::<PagerAction>() {
                Ok(a) => a,
                Err(e) => {
                    warn!(target: "keymap", action = name, "unknown_action");
                    errors.push(e);
                    continue;
                }
            };
            let mut parsed = Bindings::new();
            for key in keys {
                match key.as_ref().parse::<KeyBinding>() {
                    Ok(b) => parsed.push(b),
                    Err(e) => {
                        warn!(target: "keymap", action = name, error = %e, "bad_binding");
                        errors.push(e);
                    }
                }
            }
            if parsed.is_empty() && !keys.is_empty() {
                continue;
            }
            debug!(target: "keymap", action = name, count = parsed.len(), "bindings_overridden");
            self.set(action, parsed);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn parses_bindings() {
        assert_eq!(
            "ctrl+d".parse::<KeyBinding>(),
            Ok(KeyBinding::new(KeyCode::Char('d'), KeyModifiers::CTRL))
        );
        assert_eq!("pgdn".parse::<KeyBinding>(), Ok(KeyBinding::key(KeyCode::PageDown)));
        assert_eq!("space".parse::<KeyBinding>(), Ok(KeyBinding::char(' ')));
        assert_eq!(
            "shift+tab".parse::<KeyBinding>(),
            Ok(KeyBinding::new(KeyCode::Tab, KeyModifiers::SHIFT))
        );
        assert_eq!("+".parse::<KeyBinding>(), Ok(KeyBinding::char('+')));
        assert_eq!("G".parse::<KeyBinding>(), Ok(KeyBinding::char('G')));
        assert_eq!(
            "hyper+x".parse::<KeyBinding>(),
            Err(KeyParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            "ctrl+nope".parse::<KeyBinding>(),
            Err(KeyParseError::UnknownKey("nope".into()))
        );
        assert_eq!("  ".parse::<KeyBinding>(), Err(KeyParseError::Empty));
    }

    #[test]
    fn default_bindings_resolve() {
        let km = KeyMap::default();
        assert_eq!(km.resolve(&key(KeyCode::PageDown)), Some(PagerAction::PageDown));
        assert_eq!(km.resolve(&key(KeyCode::Char(' '))), Some(PagerAction::PageDown));
        assert_eq!(km.resolve(&KeyEvent::ctrl('d')), Some(PagerAction::HalfPageDown));
        assert_eq!(km.resolve(&key(KeyCode::Char('j'))), Some(PagerAction::Down));
        assert_eq!(km.resolve(&key(KeyCode::Tab)), Some(PagerAction::NextRevision));
        assert_eq!(
            km.resolve(&KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            Some(PagerAction::PrevRevision)
        );
        assert_eq!(km.resolve(&KeyEvent::ctrl('c')), Some(PagerAction::Quit));
        assert_eq!(km.resolve(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn shifted_chars_ignore_shift_flag() {
        let km = KeyMap::default();
        let shifted_n = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(km.resolve(&shifted_n), Some(PagerAction::SearchPrevious));
        assert_eq!(km.resolve(&key(KeyCode::Char('n'))), Some(PagerAction::SearchNext));
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut km = KeyMap::default();
        let down = vec!["x".to_string(), "ctrl+n".to_string()];
        let bad = vec!["ctrl+???".to_string()];
        let overrides: Vec<(&str, &[String])> = vec![
            ("down", down.as_slice()),
            ("not-an-action", down.as_slice()),
            ("up", bad.as_slice()),
        ];
        let errors = km.apply_overrides(overrides);
        assert_eq!(errors.len(), 2);
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), Some(PagerAction::Down));
        assert_eq!(km.resolve(&key(KeyCode::Char('j'))), None);
        assert_eq!(km.resolve(&key(KeyCode::Char('k'))), Some(PagerAction::Up));
    }

    #[test]
    fn action_names_round_trip() {
        for a in PagerAction::ALL {
            assert_eq!(a.name().parse::<PagerAction>(), Ok(a));
        }
        assert_eq!("half-page-down".parse::<PagerAction>(), Ok(PagerAction::HalfPageDown));
        assert!(PagerAction::Down.is_viewport());
        assert!(!PagerAction::Quit.is_viewport());
    }
}
