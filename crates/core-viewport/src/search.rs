use crate::viewport::{Display, Pane, SearchMatch, Viewport};
use core_model::{LineFlag, Source, StyleCategory};
use core_text::grapheme;
use tracing::debug;

impl Viewport {
    /// Set the search query and jump to the first hit. An empty term clears.
    pub fn set_search_term(&mut self, term: &str) {
        if term.is_empty() {
            self.clear_search();
            return;
        }
        self.search_term = term.to_string();
        self.refresh_search();
        self.reveal_selected();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.refresh_search();
    }

    pub fn search_next(&mut self) {
        self.step_search(true);
    }

    pub fn search_previous(&mut self) {
        self.step_search(false);
    }

    pub fn search_index(&self) -> Option<usize> {
        self.search_index
    }

    pub fn search_count(&self) -> usize {
        self.matches.len()
    }

    pub fn search_matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    fn step_search(&mut self, forward: bool) {
        let count = self.matches.len();
        let Some(index) = self.search_index else {
            return;
        };
        if count == 0 {
            return;
        }
        let next = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };
        self.search_index = Some(next);
        self.paint_overlays();
        self.reveal_selected();
    }

    /// Recompute matches against the displayed sources and repaint overlays.
    pub(crate) fn refresh_search(&mut self) {
        self.matches.clear();
        self.search_index = None;
        match &mut self.display {
            Display::Empty => {}
            Display::Single(s) => s.clear_overlays(),
            Display::Split(l, r) => {
                l.clear_overlays();
                r.clear_overlays();
            }
        }
        if self.search_term.is_empty() {
            return;
        }

        let mut found = Vec::new();
        match &self.display {
            Display::Empty => {}
            Display::Single(source) => {
                self.finder.load(source);
                found.extend(
                    self.finder
                        .find(&self.search_term)
                        .into_iter()
                        .map(|range| SearchMatch {
                            range,
                            pane: Pane::Single,
                        }),
                );
            }
            Display::Split(left, right) => {
                self.finder.load(left);
                for range in self.finder.find(&self.search_term) {
                    let pane = if is_equal_row(left, right, range.start.row) {
                        Pane::Both
                    } else {
                        Pane::Left
                    };
                    found.push(SearchMatch { range, pane });
                }
                self.finder.load(right);
                for range in self.finder.find(&self.search_term) {
                    if !is_equal_row(left, right, range.start.row) {
                        found.push(SearchMatch {
                            range,
                            pane: Pane::Right,
                        });
                    }
                }
            }
        }
        found.sort_by_key(|m| (m.range.start.row, m.range.start.col));
        self.matches = found;
        self.search_index = (!self.matches.is_empty()).then_some(0);
        debug!(
            target: "viewport.search",
            count = self.matches.len(),
            "search_refreshed"
        );
        self.paint_overlays();
    }

    fn paint_overlays(&mut self) {
        let selected = self.search_index;
        let (left, mut right) = match &mut self.display {
            Display::Empty => return,
            Display::Single(s) => (s, None),
            Display::Split(l, r) => (l, Some(r)),
        };
        left.clear_overlays();
        if let Some(r) = right.as_deref_mut() {
            r.clear_overlays();
        }
        for (i, m) in self.matches.iter().enumerate() {
            let style = if selected == Some(i) {
                StyleCategory::SearchSelected
            } else {
                StyleCategory::Search
            };
            match m.pane {
                Pane::Single | Pane::Left => left.add_overlay(style, m.range),
                Pane::Right => {
                    if let Some(r) = right.as_deref_mut() {
                        r.add_overlay(style, m.range);
                    }
                }
                Pane::Both => {
                    left.add_overlay(style, m.range);
                    if let Some(r) = right.as_deref_mut() {
                        r.add_overlay(style, m.range);
                    }
                }
            }
        }
    }

    /// Centre the selected match vertically and, without wrap, horizontally.
    fn reveal_selected(&mut self) {
        let Some(m) = self.search_index.and_then(|i| self.matches.get(i)).copied() else {
            return;
        };
        let start = m.range.start;
        let half = self.content_height() / 2;
        self.set_y_offset(start.row.saturating_sub(half));

        if self.word_wrap() {
            return;
        }
        let source = match (&self.display, m.pane) {
            (Display::Split(_, r), Pane::Right) => r,
            (Display::Split(l, _), _) | (Display::Single(l), _) => l,
            (Display::Empty, _) => return,
        };
        let Some(line) = source.line(start.row) else {
            return;
        };
        let col = grapheme::visual_col(&line.text(), start.col);
        let view = match &self.display {
            Display::Split(..) => self.pane_width(),
            _ => self.content_width(),
        }
        .saturating_sub(self.printer.gutter_width(source));
        let x = self.x_offset();
        if col < x || col >= x + view {
            let target = col.saturating_sub(view / 2);
            debug!(target: "viewport.search", col, x = target, "match_revealed");
            self.set_x_offset(target);
        }
    }
}

/// A row present unchanged in both panes.
fn is_equal_row(left: &Source, right: &Source, row: usize) -> bool {
    let plain = |s: &Source| {
        s.line(row)
            .is_some_and(|l| l.flag == LineFlag::Default && !l.is_placeholder())
    };
    plain(left) && plain(right)
}
