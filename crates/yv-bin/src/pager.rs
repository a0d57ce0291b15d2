//! Application state above the viewport: the search prompt, app-level key
//! actions and frame composition (viewport rows plus the status line).

use core_events::{InputEvent, KeyCode, KeyEvent};
use core_keymap::{KeyMap, PagerAction};
use core_render::Theme;
use core_render::status::{StatusContext, render_status};
use core_viewport::Viewport;
use tracing::{debug, trace};

/// Rows reserved below the viewport.
pub const STATUS_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue { redraw: bool },
    Quit,
}

pub struct Pager {
    viewport: Viewport,
    keymap: KeyMap,
    theme: Theme,
    prompt: Option<String>,
    width: u16,
    height: u16,
}

impl Pager {
    pub fn new(viewport: Viewport, keymap: KeyMap, theme: Theme) -> Self {
        let mut pager = Self {
            viewport,
            keymap,
            theme,
            prompt: None,
            width: 0,
            height: 0,
        };
        pager.viewport.init();
        pager
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.viewport.set_height(height.saturating_sub(STATUS_ROWS) as usize);
        self.viewport.set_width(width as usize);
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn handle_input(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::Resize(w, h) => {
                self.resize(*w, *h);
                LoopControl::Continue { redraw: true }
            }
            InputEvent::Key(key) if self.prompt.is_some() => self.handle_prompt_key(key),
            InputEvent::Key(key) => match self.keymap.resolve(key) {
                Some(action) => self.handle_action(action),
                None => LoopControl::Continue { redraw: false },
            },
            InputEvent::Mouse(_) => LoopControl::Continue {
                redraw: self.viewport.update(input),
            },
        }
    }

    fn handle_action(&mut self, action: PagerAction) -> LoopControl {
        trace!(target: "runtime", %action, "action");
        match action {
            PagerAction::Quit => LoopControl::Quit,
            PagerAction::OpenSearch => {
                self.prompt = Some(String::new());
                LoopControl::Continue { redraw: true }
            }
            other => LoopControl::Continue {
                redraw: self.viewport.apply(other),
            },
        }
    }

    fn handle_prompt_key(&mut self, key: &KeyEvent) -> LoopControl {
        let Some(input) = self.prompt.as_mut() else {
            return LoopControl::Continue { redraw: false };
        };
        if *key == KeyEvent::ctrl('c') {
            return LoopControl::Quit;
        }
        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let term = self.prompt.take().unwrap_or_default();
                self.viewport.set_search_term(&term);
                debug!(
                    target: "runtime",
                    term_len = term.len(),
                    matches = self.viewport.search_count(),
                    "search_committed"
                );
            }
            _ => return LoopControl::Continue { redraw: false },
        }
        LoopControl::Continue { redraw: true }
    }

    /// Viewport rows followed by the status line.
    pub fn frame(&self) -> String {
        let vp = &self.viewport;
        let name = vp.revision_name();
        let stats = vp.is_showing_diff().then(|| vp.diff_stats());
        let search =
            (!vp.search_term().is_empty()).then(|| (vp.search_index(), vp.search_count()));
        let ctx = StatusContext {
            name,
            revision: vp
                .has_revision()
                .then(|| (vp.revision_index(), vp.revision_count())),
            diff_mode: vp.diff_mode(),
            view_mode: vp.view_mode(),
            stats,
            search,
            scroll_percent: vp.scroll_percent(),
            prompt: self.prompt.as_deref(),
        };
        let status = render_status(&ctx, &self.theme, self.width as usize);
        let body = vp.view();
        let rows = self.height.saturating_sub(STATUS_ROWS) as usize;
        let mut lines: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('\n').collect()
        };
        lines.resize(rows, "");
        lines.push(&status);
        lines.join("\n")
    }
}
