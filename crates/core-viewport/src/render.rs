use crate::viewport::{Display, MIN_PANE_WIDTH, Viewport};
use core_model::{Source, Span, StyleCategory};
use core_render::Printer;
use core_text::styled;
use crossterm::style::ContentStyle;
use tracing::trace;

/// Horizontal window applied to a printed pane.
#[derive(Clone, Copy)]
struct Window {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    wrap: bool,
}

impl Viewport {
    /// Compose the visible frame. Empty when the content area is degenerate.
    pub fn view(&self) -> String {
        let (cw, ch) = (self.content_width(), self.content_height());
        if cw == 0 || ch == 0 {
            return String::new();
        }
        let text = self.style_or_default(StyleCategory::Text);
        let window = Window {
            width: cw,
            height: ch,
            x: self.x_offset,
            y: self.y_offset,
            wrap: self.wrap,
        };

        let mut rows = match &self.display {
            Display::Empty => Vec::new(),
            Display::Single(source) => render_pane(self.printer.as_ref(), source, window, text),
            Display::Split(left, right) => {
                let pane = self.pane_width();
                if pane < MIN_PANE_WIDTH {
                    trace!(target: "viewport", pane, "pane_too_narrow");
                    Vec::new()
                } else {
                    let window = Window {
                        width: pane,
                        ..window
                    };
                    let sep = self
                        .style_or_default(StyleCategory::Separator)
                        .apply(" │ ")
                        .to_string();
                    render_split(self.printer.as_ref(), left, right, window, text, &sep)
                }
            }
        };

        if self.fill_height {
            let blank = text.apply(" ".repeat(cw)).to_string();
            rows.resize(ch, blank);
        }
        let border = self.style_or_default(self.container.border_style);
        self.container.wrap(rows, cw, text, border).join("\n")
    }

    fn style_or_default(&self, category: StyleCategory) -> ContentStyle {
        self.printer.style(category).unwrap_or_default()
    }
}

/// Print the visible rows of `source`, then cut each to the window.
fn render_pane(
    printer: &dyn Printer,
    source: &Source,
    window: Window,
    text: ContentStyle,
) -> Vec<String> {
    let span = Span::new(window.y, window.y + window.height);
    let mut rows = pane_rows(printer, source, span, window, text);
    rows.truncate(window.height);
    rows
}

/// Pair the panes one logical line at a time: a line that wraps on one side
/// is matched by blank rows on the other, so equal lines stay level.
fn render_split(
    printer: &dyn Printer,
    left: &Source,
    right: &Source,
    window: Window,
    text: ContentStyle,
    sep: &str,
) -> Vec<String> {
    let blank = text.apply(" ".repeat(window.width)).to_string();
    let total = left.len().max(right.len());
    let mut rows = Vec::with_capacity(window.height);
    for line in window.y..total {
        if rows.len() >= window.height {
            break;
        }
        let span = Span::new(line, line + 1);
        let l = pane_rows(printer, left, span, window, text);
        let r = pane_rows(printer, right, span, window, text);
        let pairs = (0..l.len().max(r.len())).map(|i| {
            let a = l.get(i).unwrap_or(&blank);
            let b = r.get(i).unwrap_or(&blank);
            format!("{a}{sep}{b}")
        });
        rows.extend(pairs.take(window.height - rows.len()));
    }
    rows
}

/// Print `span` of `source` and fit every resulting row to the window.
///
/// The gutter stays fixed while the text behind it scrolls horizontally.
fn pane_rows(
    printer: &dyn Printer,
    source: &Source,
    span: Span,
    window: Window,
    text: ContentStyle,
) -> Vec<String> {
    if source.iter(span).len() == 0 {
        return Vec::new();
    }
    let gutter = printer.gutter_width(source).min(window.width);
    printer
        .print(source, Some(span))
        .split('\n')
        .map(|row| {
            let row = if window.wrap || window.x == 0 {
                styled::truncate(row, window.width)
            } else {
                let start = gutter + window.x;
                let end = start + window.width - gutter;
                format!(
                    "{}{}",
                    styled::truncate(row, gutter),
                    styled::cut(row, start, end)
                )
            };
            let pad = styled::pad_needed(&row, window.width);
            if pad == 0 {
                row
            } else {
                format!("{row}{}", text.apply(" ".repeat(pad)))
            }
        })
        .collect()
}
