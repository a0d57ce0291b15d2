use crate::lexer::tokenize;
use crate::line::{Line, assemble};
use crate::style::StyleCategory;
use crate::token::Token;
use core_text::{Position, Range, Span};

/// Style painted over a range of cells on top of token styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub style: StyleCategory,
    pub range: Range,
}

/// Named, ordered sequence of lines plus an overlay side table.
///
/// Content is fixed at construction; only overlays change afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Source {
    name: String,
    lines: Vec<Line>,
    width: usize,
    overlays: Vec<Overlay>,
}

impl Source {
    /// Build from already assembled lines. Visual rows are reassigned densely.
    pub fn new(name: impl Into<String>, mut lines: Vec<Line>) -> Self {
        for (row, line) in lines.iter_mut().enumerate() {
            line.row = row;
        }
        let width = lines.iter().map(Line::width).max().unwrap_or(0);
        Self {
            name: name.into(),
            lines,
            width,
            overlays: Vec::new(),
        }
    }

    pub fn from_tokens(name: impl Into<String>, tokens: &[Token]) -> Self {
        Self::new(name, assemble(tokens))
    }

    /// Tokenize raw YAML with the reference lexer.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::from_tokens(name, &tokenize(text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Widest line in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lines in `span`, clamped to `[0, len)`.
    pub fn iter(&self, span: Span) -> std::slice::Iter<'_, Line> {
        let span = span.clamp(self.lines.len());
        self.lines[span.rows()].iter()
    }

    pub fn add_overlay(&mut self, style: StyleCategory, range: Range) {
        self.overlays.push(Overlay { style, range });
    }

    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    /// Overlays in insertion order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Overlay styles covering `pos`, in paint order.
    pub fn overlays_at(&self, pos: Position) -> impl Iterator<Item = StyleCategory> + '_ {
        self.overlays
            .iter()
            .filter(move |o| o.range.contains(pos))
            .map(|o| o.style)
    }

    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text());
        }
        out
    }
}
