//! Presentation modes shared by the viewport, configuration and CLI.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which revision the current one is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMode {
    /// Immediate predecessor.
    #[default]
    Adjacent,
    /// First revision in the chain.
    Origin,
    /// No diff; show the current revision as-is.
    None,
}

impl DiffMode {
    /// Adjacent -> Origin -> None -> Adjacent.
    pub fn next(self) -> Self {
        match self {
            DiffMode::Adjacent => DiffMode::Origin,
            DiffMode::Origin => DiffMode::None,
            DiffMode::None => DiffMode::Adjacent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffMode::Adjacent => "adjacent",
            DiffMode::Origin => "origin",
            DiffMode::None => "none",
        }
    }
}

/// How the displayed source is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Unified diff (or the plain revision when no diff applies).
    #[default]
    Full,
    /// Changed regions with context.
    Hunks,
    /// Before and after panes.
    SideBySide,
}

impl ViewMode {
    /// Full <-> SideBySide. Hunks is only reachable through a direct set and
    /// toggles to SideBySide like the other single-pane mode.
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Full | ViewMode::Hunks => ViewMode::SideBySide,
            ViewMode::SideBySide => ViewMode::Full,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Full => "full",
            ViewMode::Hunks => "hunks",
            ViewMode::SideBySide => "side-by-side",
        }
    }
}

/// Leftmost column(s) of each printed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GutterMode {
    #[default]
    None,
    LineNumbers,
    DiffMarkers,
}

impl GutterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GutterMode::None => "none",
            GutterMode::LineNumbers => "line-numbers",
            GutterMode::DiffMarkers => "diff-markers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseModeError {}

macro_rules! impl_mode_str {
    ($ty:ident, $kind:literal, [$($variant:ident),+]) => {
        impl FromStr for $ty {
            type Err = ParseModeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
                $(
                    if wanted == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(ParseModeError { kind: $kind, input: s.to_string() })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_mode_str!(DiffMode, "diff mode", [Adjacent, Origin, None]);
impl_mode_str!(ViewMode, "view mode", [Full, Hunks, SideBySide]);
impl_mode_str!(GutterMode, "gutter mode", [None, LineNumbers, DiffMarkers]);
