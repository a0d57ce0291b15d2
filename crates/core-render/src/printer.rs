//! Source -> styled text.
//!
//! A printed row is built from cells, one per grapheme cluster of the line's
//! token origins. Each cell's style is composed in a fixed order: text base,
//! token kind, the line's style override, then every overlay covering the
//! cell in insertion order. Adjacent cells with equal styles are emitted as
//! one SGR-wrapped run.

use crate::theme::{Theme, layer, token_category};
use core_model::{GutterMode, Line, LineFlag, Position, Source, Span, StyleCategory};
use core_text::grapheme;
use crossterm::style::ContentStyle;
use std::fmt::Write as _;
use std::ops::Range as Cells;
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use tracing::trace;

/// Rendering capability consumed by the viewport.
pub trait Printer: Send {
    /// Render `span` (or the whole source) as newline-joined rows. With word
    /// wrap on, one line may produce several rows.
    fn print(&self, source: &Source, span: Option<Span>) -> String;
    fn set_width(&mut self, width: usize);
    fn set_word_wrap(&mut self, wrap: bool);
    fn style(&self, category: StyleCategory) -> Option<ContentStyle>;
    /// Cells taken by the gutter for `source`.
    fn gutter_width(&self, _source: &Source) -> usize {
        0
    }
}

struct Cell<'a> {
    text: &'a str,
    width: usize,
    style: ContentStyle,
    blank: bool,
}

pub struct YamlPrinter {
    theme: Theme,
    width: usize,
    wrap: bool,
    gutter: GutterMode,
}

impl Default for YamlPrinter {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl YamlPrinter {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            width: 0,
            wrap: false,
            gutter: GutterMode::None,
        }
    }

    pub fn with_gutter(mut self, gutter: GutterMode) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn set_gutter(&mut self, gutter: GutterMode) {
        self.gutter = gutter;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn number_width(source: &Source) -> usize {
        let max = source
            .lines()
            .iter()
            .filter_map(|l| l.source_row)
            .max()
            .map_or(1, |r| r + 1);
        max.to_string().len()
    }

    fn cells<'a>(&self, source: &Source, line: &'a Line) -> Vec<Cell<'a>> {
        let base = self.theme.resolve(StyleCategory::Text);
        let row_style = line.style_override.map(|c| self.theme.resolve(c));
        let overlays: Vec<_> = source
            .overlays()
            .iter()
            .filter(|o| o.range.touches_row(line.row))
            .collect();

        let mut cells = Vec::with_capacity(line.len());
        let mut col = 0;
        for token in &line.tokens {
            let token_style = layer(base, self.theme.resolve(token_category(token.kind)));
            let mut leading = true;
            for g in grapheme::iter(&token.origin) {
                let blank = grapheme::is_blank(g);
                leading &= blank;
                let mut style = if leading { base } else { token_style };
                if let Some(row) = row_style {
                    style = layer(style, row);
                }
                let pos = Position::new(line.row, col);
                for o in overlays.iter().filter(|o| o.range.contains(pos)) {
                    style = layer(style, self.theme.resolve(o.style));
                }
                let (text, width) = if g == "\t" {
                    (" ", 1)
                } else if g.chars().all(char::is_control) {
                    ("", 0)
                } else {
                    (g, grapheme::cluster_width(g))
                };
                cells.push(Cell {
                    text,
                    width,
                    style,
                    blank,
                });
                col += 1;
            }
        }
        cells
    }

    fn gutter_text(&self, source: &Source, line: &Line, first: bool) -> String {
        match self.gutter {
            GutterMode::None => String::new(),
            GutterMode::LineNumbers => {
                let w = Self::number_width(source);
                match line.source_row {
                    Some(row) if first => format!("{:>w$} ", row + 1),
                    _ => " ".repeat(w + 1),
                }
            }
            GutterMode::DiffMarkers => {
                let marker = match line.flag {
                    _ if !first || line.is_placeholder() => ' ',
                    LineFlag::Deleted => '-',
                    LineFlag::Inserted => '+',
                    LineFlag::Default => ' ',
                };
                format!("{marker} ")
            }
        }
    }

    fn print_line(&self, source: &Source, line: &Line, gutter: usize, rows: &mut Vec<String>) {
        let cells = self.cells(source, line);
        let avail = if self.wrap && self.width > gutter {
            self.width - gutter
        } else {
            usize::MAX
        };
        let pieces = wrap_cells(&cells, avail, line.indent());
        let indent = continuation_indent(line.indent(), avail);
        let base = self.theme.resolve(StyleCategory::Text);
        let row_style = line
            .style_override
            .map_or(base, |c| layer(base, self.theme.resolve(c)));
        let gutter_style = layer(base, self.theme.resolve(StyleCategory::Gutter));
        let last = pieces.len() - 1;

        for (i, piece) in pieces.into_iter().enumerate() {
            let mut out = String::new();
            if gutter > 0 {
                let text = self.gutter_text(source, line, i == 0);
                let _ = write!(out, "{}", gutter_style.apply(text));
            }
            if i > 0 && indent > 0 {
                let _ = write!(out, "{}", row_style.apply(" ".repeat(indent)));
            }
            emit_runs(&mut out, &cells[piece]);
            if i == last {
                if let Some(note) = &line.annotation {
                    let style = self.theme.resolve(StyleCategory::Annotation);
                    out.push(' ');
                    let _ = write!(out, "{}", style.apply(note));
                }
            }
            rows.push(out);
        }
    }
}

impl Printer for YamlPrinter {
    fn print(&self, source: &Source, span: Option<Span>) -> String {
        let span = span.unwrap_or(Span::new(0, source.len()));
        let gutter = self.gutter_width(source);
        let mut rows = Vec::with_capacity(span.len());
        for line in source.iter(span) {
            self.print_line(source, line, gutter, &mut rows);
        }
        trace!(target: "render", lines = span.len(), rows = rows.len(), "printed");
        rows.join("\n")
    }

    fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    fn set_word_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    fn style(&self, category: StyleCategory) -> Option<ContentStyle> {
        self.theme.get(category)
    }

    fn gutter_width(&self, source: &Source) -> usize {
        match self.gutter {
            GutterMode::None => 0,
            GutterMode::LineNumbers => Self::number_width(source) + 1,
            GutterMode::DiffMarkers => 2,
        }
    }
}

fn emit_runs(out: &mut String, cells: &[Cell<'_>]) {
    let mut i = 0;
    while i < cells.len() {
        let style = cells[i].style;
        let mut run = String::new();
        while i < cells.len() && cells[i].style == style {
            run.push_str(cells[i].text);
            i += 1;
        }
        let _ = write!(out, "{}", style.apply(run));
    }
}

/// Indent applied to wrapped continuation rows; dropped when it would leave
/// no room for content.
fn continuation_indent(indent: usize, avail: usize) -> usize {
    if indent < avail / 2 { indent } else { 0 }
}

/// A wrap unit: a run of content cells plus the blank cells after it.
#[derive(Debug)]
struct Word {
    cells: Cells<usize>,
    width: usize,
    space: usize,
}

impl Fragment for Word {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn whitespace_width(&self) -> f64 {
        self.space as f64
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Split `cells` into words. Leading blanks belong to the first word, and
/// any word wider than `max` is cut into chunks that fit.
fn words(cells: &[Cell<'_>], max: usize) -> Vec<Word> {
    let lead = cells.iter().take_while(|c| c.blank).count();
    let mut out = Vec::new();
    let mut start = 0;
    while start < cells.len() {
        let mut body = if start == 0 { lead } else { start };
        while body < cells.len() && !cells[body].blank {
            body += 1;
        }
        let mut end = body;
        while end < cells.len() && cells[end].blank {
            end += 1;
        }
        let mut chunk = start;
        let mut width = 0;
        for (i, cell) in cells.iter().enumerate().take(body).skip(start) {
            if width > 0 && width + cell.width > max {
                out.push(Word {
                    cells: chunk..i,
                    width,
                    space: 0,
                });
                chunk = i;
                width = 0;
            }
            width += cell.width;
        }
        let space = cells[body..end].iter().map(|c| c.width).sum();
        out.push(Word {
            cells: chunk..end,
            width,
            space,
        });
        start = end;
    }
    out
}

/// First-fit word wrap over cells. Rows break after whitespace that follows
/// content; blanks that would overflow a row are dropped. A cell wider than
/// the row still gets a row of its own.
fn wrap_cells(cells: &[Cell<'_>], avail: usize, indent: usize) -> Vec<Cells<usize>> {
    if avail == usize::MAX || cells.is_empty() {
        return vec![0..cells.len()];
    }
    let rest = avail - continuation_indent(indent, avail);
    let words = words(cells, rest);
    let widths = [avail as f64, rest as f64];
    wrap_first_fit(&words, &widths)
        .into_iter()
        .enumerate()
        .map(|(n, line)| {
            let (Some(first), Some(last)) = (line.first(), line.last()) else {
                return 0..0;
            };
            let cap = if n == 0 { avail } else { rest };
            let start = first.cells.start;
            let mut end = last.cells.end;
            let mut used: usize = cells[start..end].iter().map(|c| c.width).sum();
            while used > cap && end > start && cells[end - 1].blank {
                end -= 1;
                used -= cells[end].width;
            }
            start..end
        })
        .collect()
}
