use crate::style::StyleCategory;
use crate::token::Token;
use core_text::{Position, grapheme, str_width};

/// Diff classification of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineFlag {
    #[default]
    Default,
    Deleted,
    Inserted,
}

/// One visual row of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub tokens: Vec<Token>,
    pub flag: LineFlag,
    /// Short text rendered dim after the content (hunk headers).
    pub annotation: Option<String>,
    /// Style applied under overlays to every cell of the row.
    pub style_override: Option<StyleCategory>,
    /// Visual row inside the owning `Source`.
    pub row: usize,
    /// Row in the text this line was assembled from; `None` for placeholders.
    pub source_row: Option<usize>,
    width: usize,
    len: usize,
    indent: usize,
}

impl Line {
    pub fn new(row: usize, source_row: Option<usize>) -> Self {
        Self {
            row,
            source_row,
            ..Self::default()
        }
    }

    /// Blank row used to keep side-by-side panes aligned.
    pub fn placeholder(row: usize, flag: LineFlag) -> Self {
        Self {
            row,
            flag,
            ..Self::default()
        }
    }

    pub fn from_tokens(row: usize, source_row: Option<usize>, tokens: Vec<Token>) -> Self {
        let mut line = Self::new(row, source_row);
        for t in tokens {
            line.push(t);
        }
        line
    }

    pub fn push(&mut self, token: Token) {
        let blank_so_far = self.indent == self.width;
        self.width += str_width(&token.origin);
        self.len += grapheme::count(&token.origin);
        if blank_so_far {
            self.indent += grapheme::indent_width(&token.origin);
        }
        self.tokens.push(token);
    }

    /// Visible width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of grapheme clusters (columns in `Position` units).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Width of leading whitespace in cells.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn is_placeholder(&self) -> bool {
        self.source_row.is_none()
    }

    /// Concatenated origin text; the identity used for diffing.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.origin.as_str()).collect()
    }

    /// Copy of this line flagged for a diff view.
    pub fn flagged(&self, row: usize, flag: LineFlag, style: Option<StyleCategory>) -> Self {
        let mut line = self.clone();
        line.row = row;
        line.flag = flag;
        line.style_override = style;
        line.annotation = None;
        line
    }
}

/// Group a token stream into visual lines.
///
/// A new line opens at every line break inside a token origin and whenever a
/// token without line breaks reports a later source row than the current
/// line. A trailing line break does not produce a final empty line.
pub fn assemble(tokens: &[Token]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut source_row = 0usize;
    let mut current = Line::new(0, Some(0));
    let mut opened_by_break = false;

    for token in tokens {
        let broken = token.origin.contains(['\n', '\r']);
        if !broken && token.position.row > source_row {
            let target = token.position.row;
            while source_row < target {
                lines.push(std::mem::replace(
                    &mut current,
                    Line::new(lines.len() + 1, Some(source_row + 1)),
                ));
                source_row += 1;
            }
        }
        let mut first = true;
        for piece in split_breaks(&token.origin) {
            if !first {
                source_row += 1;
                lines.push(std::mem::replace(
                    &mut current,
                    Line::new(lines.len() + 1, Some(source_row)),
                ));
                opened_by_break = true;
            }
            if !piece.is_empty() {
                let fragment = if first && !broken {
                    token.clone()
                } else {
                    let lead = piece.len() - piece.trim_start().len();
                    let col = current.len() + grapheme::count(&piece[..lead]);
                    token.fragment(piece, Position::new(source_row, col))
                };
                current.push(fragment);
                opened_by_break = false;
            }
            first = false;
        }
    }

    if !(current.is_empty() && opened_by_break && !lines.is_empty()) {
        lines.push(current);
    }
    if lines.len() == 1 && lines[0].tokens.is_empty() && tokens.is_empty() {
        lines.clear();
    }
    lines
}

/// Split at `\n`, `\r\n` and lone `\r`, the breaks the lexer counts rows by.
fn split_breaks(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let width = match bytes[i] {
            b'\n' => 1,
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\r' => 1,
            _ => {
                i += 1;
                continue;
            }
        };
        out.push(&s[start..i]);
        i += width;
        start = i;
    }
    out.push(&s[start..]);
    out
}
