use crate::container::ContainerStyle;
use core_diff::{DiffEngine, DiffResult};
use core_events::{InputEvent, KeyModifiers, MouseEvent, MouseEventKind};
use core_keymap::{KeyMap, PagerAction};
use core_model::{DiffMode, Range, RevisionChain, Source, ViewMode};
use core_render::{Printer, YamlPrinter};
use core_search::{Finder, TextFinder};
use tracing::debug;

/// Width of the side-by-side separator `" │ "`.
pub const SEPARATOR_WIDTH: usize = 3;
/// Narrowest pane side-by-side will render.
pub const MIN_PANE_WIDTH: usize = 8;

/// Behavioural settings, usually filled from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub word_wrap: bool,
    pub mouse: bool,
    pub mouse_delta: usize,
    pub horizontal_step: usize,
    pub hunk_context: usize,
    pub fill_height: bool,
    pub diff_mode: DiffMode,
    pub view_mode: ViewMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            word_wrap: false,
            mouse: true,
            mouse_delta: 3,
            horizontal_step: 4,
            hunk_context: 3,
            fill_height: false,
            diff_mode: DiffMode::Adjacent,
            view_mode: ViewMode::Full,
        }
    }
}

/// Which displayed pane a search match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Single-pane display.
    Single,
    Left,
    Right,
    /// Equal row of a side-by-side display; shown in both panes.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub range: Range,
    pub pane: Pane,
}

/// Sources currently on screen, derived from the revision chain and modes.
#[derive(Debug, Clone, Default)]
pub(crate) enum Display {
    #[default]
    Empty,
    Single(Source),
    Split(Source, Source),
}

impl Display {
    pub(crate) fn len(&self) -> usize {
        match self {
            Display::Empty => 0,
            Display::Single(s) => s.len(),
            Display::Split(l, r) => l.len().max(r.len()),
        }
    }
}

/// Bounded window over the displayed source(s).
pub struct Viewport {
    pub(crate) printer: Box<dyn Printer>,
    pub(crate) finder: Box<dyn Finder>,
    pub(crate) container: ContainerStyle,
    pub(crate) keymap: KeyMap,
    diff: DiffEngine,

    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) x_offset: usize,
    pub(crate) y_offset: usize,
    pub(crate) wrap: bool,
    mouse_enabled: bool,
    mouse_delta: usize,
    horizontal_step: usize,
    hunk_context: usize,
    pub(crate) fill_height: bool,

    revisions: RevisionChain,
    diff_mode: DiffMode,
    view_mode: ViewMode,
    diff_cache: Option<DiffResult>,
    pub(crate) display: Display,

    pub(crate) search_term: String,
    pub(crate) matches: Vec<SearchMatch>,
    pub(crate) search_index: Option<usize>,
}

#[derive(Default)]
pub struct ViewportBuilder {
    printer: Option<Box<dyn Printer>>,
    finder: Option<Box<dyn Finder>>,
    container: ContainerStyle,
    keymap: Option<KeyMap>,
    options: Options,
    size: (usize, usize),
}

impl ViewportBuilder {
    pub fn printer(mut self, printer: Box<dyn Printer>) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn finder(mut self, finder: Box<dyn Finder>) -> Self {
        self.finder = Some(finder);
        self
    }

    pub fn container(mut self, container: ContainerStyle) -> Self {
        self.container = container;
        self
    }

    pub fn keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = Some(keymap);
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.size = (width, height);
        self
    }

    pub fn build(self) -> Viewport {
        let o = self.options;
        let mut printer = self
            .printer
            .unwrap_or_else(|| Box::new(YamlPrinter::default()));
        printer.set_word_wrap(o.word_wrap);
        let mut vp = Viewport {
            printer,
            finder: self.finder.unwrap_or_else(|| Box::new(TextFinder::default())),
            container: self.container,
            keymap: self.keymap.unwrap_or_default(),
            diff: DiffEngine::new(),
            width: self.size.0,
            height: self.size.1,
            x_offset: 0,
            y_offset: 0,
            wrap: o.word_wrap,
            mouse_enabled: o.mouse,
            mouse_delta: o.mouse_delta,
            horizontal_step: o.horizontal_step,
            hunk_context: o.hunk_context,
            fill_height: o.fill_height,
            revisions: RevisionChain::new(),
            diff_mode: o.diff_mode,
            view_mode: o.view_mode,
            diff_cache: None,
            display: Display::Empty,
            search_term: String::new(),
            matches: Vec::new(),
            search_index: None,
        };
        vp.sync_printer_width();
        vp
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self::builder().size(width, height).build()
    }

    pub fn builder() -> ViewportBuilder {
        ViewportBuilder::default()
    }

    /// Lifecycle hook; nothing to start.
    pub fn init(&mut self) {}

    pub fn set_keymap(&mut self, keymap: KeyMap) {
        self.keymap = keymap;
    }

    // ---------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------

    /// Replace the chain with a single revision.
    pub fn set_tokens(&mut self, source: Source) {
        self.revisions.clear();
        self.add_revision(source);
    }

    pub fn add_revision(&mut self, source: Source) {
        let name = source.name().to_string();
        self.revisions.append(name, source);
        self.invalidate_diff();
    }

    pub fn clear_revisions(&mut self) {
        self.revisions.clear();
        self.invalidate_diff();
    }

    pub fn go_to_revision(&mut self, index: usize) {
        if self.revisions.go_to(index) {
            self.invalidate_diff();
        }
    }

    pub fn next_revision(&mut self) {
        if self.revisions.seek(1) {
            self.invalidate_diff();
        }
    }

    pub fn prev_revision(&mut self) {
        if self.revisions.seek(-1) {
            self.invalidate_diff();
        }
    }

    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }

    pub fn revision_index(&self) -> usize {
        self.revisions.index()
    }

    pub fn revision_name(&self) -> &str {
        self.revisions.name()
    }

    pub fn revision_names(&self) -> Vec<String> {
        self.revisions.names()
    }

    pub fn has_revision(&self) -> bool {
        !self.revisions.is_empty()
    }

    pub fn is_at_first_revision(&self) -> bool {
        self.revisions.at_origin()
    }

    pub fn is_at_latest_revision(&self) -> bool {
        self.revisions.at_tip()
    }

    pub fn is_showing_diff(&self) -> bool {
        self.revisions.len() > 1 && !self.revisions.at_origin() && self.diff_mode != DiffMode::None
    }

    /// `(added, removed)` of the shown diff; zero when no diff is shown.
    pub fn diff_stats(&self) -> (usize, usize) {
        match (&self.diff_cache, self.is_showing_diff()) {
            (Some(d), true) => (d.stats().added, d.stats().removed),
            _ => (0, 0),
        }
    }

    // ---------------------------------------------------------------------
    // Modes
    // ---------------------------------------------------------------------

    pub fn diff_mode(&self) -> DiffMode {
        self.diff_mode
    }

    pub fn set_diff_mode(&mut self, mode: DiffMode) {
        if self.diff_mode != mode {
            self.diff_mode = mode;
            self.invalidate_diff();
        }
    }

    pub fn toggle_diff_mode(&mut self) {
        self.set_diff_mode(self.diff_mode.next());
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.sync_printer_width();
            self.refresh();
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.toggle());
    }

    pub fn word_wrap(&self) -> bool {
        self.wrap
    }

    pub fn toggle_word_wrap(&mut self) {
        self.wrap = !self.wrap;
        self.printer.set_word_wrap(self.wrap);
        if self.wrap {
            self.x_offset = 0;
        }
        self.clamp_offsets();
    }

    pub fn hunk_context(&self) -> usize {
        self.hunk_context
    }

    pub fn set_hunk_context(&mut self, context: usize) {
        if self.hunk_context != context {
            self.hunk_context = context;
            if self.view_mode == ViewMode::Hunks {
                self.refresh();
            }
        }
    }

    pub fn set_mouse_enabled(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
    }

    pub fn set_mouse_delta(&mut self, delta: usize) {
        self.mouse_delta = delta;
    }

    pub fn set_horizontal_step(&mut self, step: usize) {
        self.horizontal_step = step;
    }

    pub fn set_fill_height(&mut self, fill: bool) {
        self.fill_height = fill;
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
        self.sync_printer_width();
        self.clamp_offsets();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.clamp_offsets();
    }

    pub fn content_width(&self) -> usize {
        self.width.saturating_sub(self.container.frame_width())
    }

    pub fn content_height(&self) -> usize {
        self.height.saturating_sub(self.container.frame_height())
    }

    /// Width of each side-by-side pane.
    pub fn pane_width(&self) -> usize {
        self.content_width().saturating_sub(SEPARATOR_WIDTH) / 2
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn set_y_offset(&mut self, y: usize) {
        self.y_offset = y.min(self.max_y_offset());
    }

    pub fn x_offset(&self) -> usize {
        self.x_offset
    }

    pub fn set_x_offset(&mut self, x: usize) {
        self.x_offset = x.min(self.max_x_offset());
    }

    pub fn max_y_offset(&self) -> usize {
        self.display.len().saturating_sub(self.content_height())
    }

    pub fn max_x_offset(&self) -> usize {
        if self.wrap {
            return 0;
        }
        let (text, view) = match &self.display {
            Display::Empty => (0, 0),
            Display::Single(s) => (
                s.width(),
                self.content_width()
                    .saturating_sub(self.printer.gutter_width(s)),
            ),
            Display::Split(l, r) => (
                l.width().max(r.width()),
                self.pane_width().saturating_sub(self.printer.gutter_width(l)),
            ),
        };
        text.saturating_sub(view)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    pub fn scroll_left(&mut self, n: usize) {
        self.set_x_offset(self.x_offset.saturating_sub(n));
    }

    pub fn scroll_right(&mut self, n: usize) {
        self.set_x_offset(self.x_offset.saturating_add(n));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.content_height());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.content_height());
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up(self.content_height() / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.content_height() / 2);
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    pub fn past_bottom(&self) -> bool {
        self.y_offset > self.max_y_offset()
    }

    /// Vertical position in `[0, 1]`; 1 when everything fits.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_y_offset();
        if max == 0 {
            return 1.0;
        }
        (self.y_offset as f64 / max as f64).clamp(0.0, 1.0)
    }

    pub fn horizontal_scroll_percent(&self) -> f64 {
        let max = self.max_x_offset();
        if max == 0 {
            return 1.0;
        }
        (self.x_offset as f64 / max as f64).clamp(0.0, 1.0)
    }

    pub fn total_line_count(&self) -> usize {
        self.display.len()
    }

    pub fn visible_line_count(&self) -> usize {
        self.content_height()
            .min(self.display.len().saturating_sub(self.y_offset))
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    /// Apply an input event. Returns true when the event was consumed.
    pub fn update(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => match self.keymap.resolve(key) {
                Some(action) if action.is_viewport() => self.apply(action),
                _ => false,
            },
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize(w, h) => {
                self.height = *h as usize;
                self.set_width(*w as usize);
                true
            }
        }
    }

    /// Perform `action`. Returns false for actions the viewport does not own.
    pub fn apply(&mut self, action: PagerAction) -> bool {
        match action {
            PagerAction::PageDown => self.page_down(),
            PagerAction::PageUp => self.page_up(),
            PagerAction::HalfPageDown => self.half_page_down(),
            PagerAction::HalfPageUp => self.half_page_up(),
            PagerAction::Down => self.scroll_down(1),
            PagerAction::Up => self.scroll_up(1),
            PagerAction::Left => self.scroll_left(self.horizontal_step),
            PagerAction::Right => self.scroll_right(self.horizontal_step),
            PagerAction::NextRevision => self.next_revision(),
            PagerAction::PrevRevision => self.prev_revision(),
            PagerAction::ToggleDiffMode => self.toggle_diff_mode(),
            PagerAction::ToggleViewMode => self.toggle_view_mode(),
            PagerAction::ToggleWordWrap => self.toggle_word_wrap(),
            PagerAction::SearchNext => self.search_next(),
            PagerAction::SearchPrevious => self.search_previous(),
            PagerAction::ClearSearch => self.clear_search(),
            PagerAction::GotoTop => self.goto_top(),
            PagerAction::GotoBottom => self.goto_bottom(),
            PagerAction::ToggleHunks => {
                let next = if self.view_mode == ViewMode::Hunks {
                    ViewMode::Full
                } else {
                    ViewMode::Hunks
                };
                self.set_view_mode(next);
            }
            PagerAction::Quit | PagerAction::OpenSearch => return false,
        }
        true
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !self.mouse_enabled {
            return false;
        }
        let shift = mouse.mods.contains(KeyModifiers::SHIFT);
        match mouse.kind {
            MouseEventKind::ScrollUp if shift => self.scroll_left(self.horizontal_step),
            MouseEventKind::ScrollDown if shift => self.scroll_right(self.horizontal_step),
            MouseEventKind::ScrollUp => self.scroll_up(self.mouse_delta),
            MouseEventKind::ScrollDown => self.scroll_down(self.mouse_delta),
            MouseEventKind::ScrollLeft => self.scroll_left(self.horizontal_step),
            MouseEventKind::ScrollRight => self.scroll_right(self.horizontal_step),
            _ => return false,
        }
        true
    }

    // ---------------------------------------------------------------------
    // Derivation
    // ---------------------------------------------------------------------

    fn invalidate_diff(&mut self) {
        self.diff_cache = None;
        self.refresh();
    }

    /// Re-derive the displayed sources, re-run the search and clamp offsets.
    pub(crate) fn refresh(&mut self) {
        self.display = self.derive();
        debug!(
            target: "viewport",
            rows = self.display.len(),
            diff = self.is_showing_diff(),
            view = %self.view_mode,
            "display_derived"
        );
        self.refresh_search();
        self.clamp_offsets();
    }

    fn derive(&mut self) -> Display {
        let showing_diff = self.is_showing_diff();
        let Some(current) = self.revisions.current() else {
            return Display::Empty;
        };
        if !showing_diff {
            let source = current.source().clone();
            return match self.view_mode {
                ViewMode::SideBySide => Display::Split(source.clone(), source),
                ViewMode::Full | ViewMode::Hunks => Display::Single(source),
            };
        }
        let base = match self.diff_mode {
            DiffMode::Origin => self.revisions.origin(),
            DiffMode::Adjacent | DiffMode::None => current.prev(),
        };
        let Some(base) = base else {
            return Display::Single(current.source().clone());
        };
        let diff = self
            .diff_cache
            .get_or_insert_with(|| self.diff.diff(base.source(), current.source()));
        match self.view_mode {
            ViewMode::Full => Display::Single(diff.unified().clone()),
            ViewMode::Hunks => Display::Single(diff.hunks(self.hunk_context)),
            ViewMode::SideBySide => {
                Display::Split(diff.before_pane().clone(), diff.after_pane().clone())
            }
        }
    }

    pub(crate) fn clamp_offsets(&mut self) {
        self.y_offset = self.y_offset.min(self.max_y_offset());
        self.x_offset = self.x_offset.min(self.max_x_offset());
    }

    pub(crate) fn sync_printer_width(&mut self) {
        let width = match self.view_mode {
            ViewMode::SideBySide => self.pane_width(),
            ViewMode::Full | ViewMode::Hunks => self.content_width(),
        };
        self.printer.set_width(width);
    }
}
