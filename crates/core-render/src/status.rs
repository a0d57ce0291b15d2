//! Status line composition.
//!
//! Two stages: `compose_status` turns pager state into ordered segments,
//! `format_status` renders them. Segments that do not apply (no diff, no
//! search) are simply absent.

use crate::theme::Theme;
use core_model::{DiffMode, StyleCategory, ViewMode};
use core_text::styled;

/// Snapshot of what the status line reports.
pub struct StatusContext<'a> {
    pub name: &'a str,
    /// `(index, count)` of the current revision; `None` with no content.
    pub revision: Option<(usize, usize)>,
    pub diff_mode: DiffMode,
    pub view_mode: ViewMode,
    /// `(added, removed)` when a diff is shown.
    pub stats: Option<(usize, usize)>,
    /// `(selected, count)` when a search term is set.
    pub search: Option<(Option<usize>, usize)>,
    pub scroll_percent: f64,
    /// Active search prompt input; replaces the whole line while open.
    pub prompt: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusSegment<'a> {
    Name(&'a str),
    Revision { index_1: usize, count: usize },
    Modes { diff: DiffMode, view: ViewMode },
    Stats { added: usize, removed: usize },
    Search { index_1: Option<usize>, count: usize },
    Scroll(u8),
    Prompt(&'a str),
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    if let Some(input) = ctx.prompt {
        return vec![StatusSegment::Prompt(input)];
    }
    let mut out = Vec::with_capacity(6);
    out.push(StatusSegment::Name(if ctx.name.is_empty() {
        "[empty]"
    } else {
        ctx.name
    }));
    if let Some((index, count)) = ctx.revision {
        out.push(StatusSegment::Revision {
            index_1: index + 1,
            count,
        });
    }
    out.push(StatusSegment::Modes {
        diff: ctx.diff_mode,
        view: ctx.view_mode,
    });
    if let Some((added, removed)) = ctx.stats {
        out.push(StatusSegment::Stats { added, removed });
    }
    if let Some((selected, count)) = ctx.search {
        out.push(StatusSegment::Search {
            index_1: selected.map(|i| i + 1),
            count,
        });
    }
    out.push(StatusSegment::Scroll(
        (ctx.scroll_percent.clamp(0.0, 1.0) * 100.0).round() as u8,
    ));
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(64);
    for seg in segments {
        match seg {
            StatusSegment::Prompt(input) => {
                s.push('/');
                s.push_str(input);
            }
            StatusSegment::Name(name) => s.push_str(name),
            StatusSegment::Revision { index_1, count } => {
                let _ = write!(s, " [{index_1}/{count}]");
            }
            StatusSegment::Modes { diff, view } => {
                let _ = write!(s, " | {diff} {view}");
            }
            StatusSegment::Stats { added, removed } => {
                let _ = write!(s, " | +{added} -{removed}");
            }
            StatusSegment::Search { index_1, count } => match index_1 {
                Some(i) => {
                    let _ = write!(s, " | match {i}/{count}");
                }
                None => s.push_str(" | no matches"),
            },
            StatusSegment::Scroll(p) => {
                let _ = write!(s, " | {p}%");
            }
        }
    }
    s
}

/// Status text fitted to `width` cells in the theme's status style.
pub fn render_status(ctx: &StatusContext<'_>, theme: &Theme, width: usize) -> String {
    let text = format_status(&compose_status(ctx));
    let mut fitted = styled::truncate(&text, width);
    let pad = styled::pad_needed(&fitted, width);
    fitted.push_str(&" ".repeat(pad));
    theme.resolve(StyleCategory::Status).apply(fitted).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>() -> StatusContext<'a> {
        StatusContext {
            name: "a.yaml",
            revision: Some((1, 3)),
            diff_mode: DiffMode::Adjacent,
            view_mode: ViewMode::Full,
            stats: None,
            search: None,
            scroll_percent: 0.5,
            prompt: None,
        }
    }

    #[test]
    fn plain_revision_status() {
        let c = ctx();
        assert_eq!(
            format_status(&compose_status(&c)),
            "a.yaml [2/3] | adjacent full | 50%"
        );
    }

    #[test]
    fn diff_and_search_segments() {
        let c = StatusContext {
            stats: Some((3, 2)),
            search: Some((Some(0), 4)),
            view_mode: ViewMode::SideBySide,
            ..ctx()
        };
        assert_eq!(
            format_status(&compose_status(&c)),
            "a.yaml [2/3] | adjacent side-by-side | +3 -2 | match 1/4 | 50%"
        );
        let none = StatusContext {
            search: Some((None, 0)),
            ..ctx()
        };
        assert!(format_status(&compose_status(&none)).contains("no matches"));
    }

    #[test]
    fn prompt_replaces_line() {
        let c = StatusContext {
            prompt: Some("item"),
            ..ctx()
        };
        assert_eq!(compose_status(&c), vec![StatusSegment::Prompt("item")]);
        assert_eq!(format_status(&compose_status(&c)), "/item");
    }

    #[test]
    fn rendered_status_fills_width() {
        let c = ctx();
        let out = render_status(&c, &Theme::plain(), 12);
        assert_eq!(out, "a.yaml [2/3]");
        let wide = render_status(&c, &Theme::plain(), 40);
        assert_eq!(core_text::styled::visible_width(&wide), 40);
    }
}
