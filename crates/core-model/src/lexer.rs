//! Reference YAML tokenizer.
//!
//! Produces the flat token stream the rest of the pipeline consumes. It is a
//! highlighting lexer, not a validating parser: malformed input still yields
//! tokens, and concatenating every token's `origin` always reproduces the
//! input byte for byte. Leading whitespace (line breaks included) belongs to
//! the token that follows it; whitespace after the last token becomes a
//! trailing [`TokenKind::Space`] token.
//!
//! Positions are `(row, col)` with `col` counted in grapheme clusters.

use crate::token::{Indicator, Token, TokenKind};
use core_text::Position;
use unicode_segmentation::UnicodeSegmentation;

/// Tokenize `src`.
pub fn tokenize(src: &str) -> Vec<Token> {
    let tokens = Lexer::new(src).run();
    tracing::trace!(target: "lexer", bytes = src.len(), tokens = tokens.len(), "tokenized");
    tokens
}

fn is_newline(g: &str) -> bool {
    g == "\n" || g == "\r\n" || g == "\r"
}

fn is_blank(g: &str) -> bool {
    g == " " || g == "\t"
}

fn is_space(g: &str) -> bool {
    is_blank(g) || is_newline(g)
}

fn is_flow_indicator(g: &str) -> bool {
    matches!(g, "," | "[" | "]" | "{" | "}")
}

struct Lexer<'a> {
    src: &'a str,
    graphemes: Vec<&'a str>,
    offsets: Vec<usize>,
    i: usize,
    row: usize,
    col: usize,
    line_indent: usize,
    at_line_start: bool,
    flow_depth: usize,
    /// Indentation of the line holding a `|`/`>` indicator whose content is due.
    pending_block: Option<usize>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let mut graphemes = Vec::new();
        let mut offsets = Vec::new();
        for (off, g) in src.grapheme_indices(true) {
            offsets.push(off);
            graphemes.push(g);
        }
        Self {
            src,
            graphemes,
            offsets,
            i: 0,
            row: 0,
            col: 0,
            line_indent: 0,
            at_line_start: true,
            flow_depth: 0,
            pending_block: None,
            tokens: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.graphemes.len()
    }

    fn off(&self, j: usize) -> usize {
        self.offsets.get(j).copied().unwrap_or(self.src.len())
    }

    fn at(&self, j: usize) -> Option<&'a str> {
        self.graphemes.get(j).copied()
    }

    /// True when grapheme `j` is whitespace or past the end.
    fn space_or_end(&self, j: usize) -> bool {
        self.at(j).is_none_or(is_space)
    }

    fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    fn advance(&mut self) {
        let Some(g) = self.at(self.i) else {
            return;
        };
        self.i += 1;
        if is_newline(g) {
            self.row += 1;
            self.col = 0;
            self.line_indent = 0;
            self.at_line_start = true;
            return;
        }
        if self.at_line_start {
            if is_blank(g) {
                self.line_indent += 1;
            } else {
                self.at_line_start = false;
            }
        }
        self.col += 1;
    }

    fn advance_to(&mut self, j: usize) {
        while self.i < j.min(self.len()) {
            self.advance();
        }
    }

    fn run(mut self) -> Vec<Token> {
        loop {
            let mut origin_start = self.off(self.i);
            while let Some(g) = self.at(self.i) {
                if !is_space(g) {
                    break;
                }
                let newline = is_newline(g);
                self.advance();
                if newline
                    && let Some(parent) = self.pending_block.take()
                    && self.block_content(origin_start, parent)
                {
                    origin_start = self.off(self.i);
                }
            }
            if self.i >= self.len() {
                if origin_start < self.src.len() {
                    let origin = &self.src[origin_start..];
                    self.tokens.push(Token::new(
                        TokenKind::Space,
                        "",
                        origin,
                        self.position(),
                    ));
                }
                break;
            }
            self.scan_token(origin_start);
        }
        self.tokens
    }

    fn emit(&mut self, kind: TokenKind, origin_start: usize, end: usize) -> &mut Token {
        let position = self.position();
        let value_start = self.off(self.i);
        self.advance_to(end);
        let end_byte = self.off(end);
        let token = Token::new(
            kind,
            &self.src[value_start..end_byte],
            &self.src[origin_start..end_byte],
            position,
        );
        self.tokens.push(token);
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    fn scan_token(&mut self, origin_start: usize) {
        let i = self.i;
        let g = self.graphemes[i];
        let next = self.at(i + 1);
        match g {
            "#" => {
                let end = self.line_end(i);
                self.emit(TokenKind::Comment, origin_start, end);
            }
            "%" if self.col == 0 => {
                let end = self.line_end(i);
                self.emit(TokenKind::Directive, origin_start, end);
            }
            "-" | "." if self.col == 0 && self.marker_at(i, g) => {
                let kind = if g == "-" {
                    TokenKind::DocumentHeader
                } else {
                    TokenKind::DocumentEnd
                };
                self.flow_depth = 0;
                self.emit(kind, origin_start, i + 3);
            }
            "-" if self.space_or_end(i + 1) => {
                self.emit(TokenKind::SequenceIndicator, origin_start, i + 1);
            }
            "?" if self.space_or_end(i + 1) => {
                self.emit(TokenKind::ExplicitKey, origin_start, i + 1);
            }
            ":" if self.space_or_end(i + 1)
                || (self.flow_depth > 0 && next.is_some_and(is_flow_indicator)) =>
            {
                self.mark_previous_as_key();
                self.emit(TokenKind::KeyIndicator, origin_start, i + 1);
            }
            "[" | "{" => {
                self.flow_depth += 1;
                self.emit(TokenKind::FlowStart, origin_start, i + 1);
            }
            "]" | "}" => {
                self.flow_depth = self.flow_depth.saturating_sub(1);
                self.emit(TokenKind::FlowEnd, origin_start, i + 1);
            }
            "," if self.flow_depth > 0 => {
                self.emit(TokenKind::FlowSeparator, origin_start, i + 1);
            }
            "!" | "&" | "*" => {
                let kind = match g {
                    "!" => TokenKind::Tag,
                    "&" => TokenKind::Anchor,
                    _ => TokenKind::Alias,
                };
                let end = self.property_end(i + 1);
                self.emit(kind, origin_start, end);
            }
            "|" | ">" if self.flow_depth == 0 => {
                let mut end = i + 1;
                while let Some(m) = self.at(end) {
                    if m == "+" || m == "-" || m.chars().all(|c| c.is_ascii_digit()) {
                        end += 1;
                    } else {
                        break;
                    }
                }
                self.pending_block = Some(self.line_indent);
                self.emit(TokenKind::BlockIndicator, origin_start, end);
            }
            "\"" | "'" => {
                let end = self.quoted_end(i, g);
                self.emit(TokenKind::String, origin_start, end)
                    .indicator = Indicator::QuotedScalar;
            }
            _ => {
                let end = self.plain_end(i);
                let kind = classify_plain(&self.src[self.off(i)..self.off(end)]);
                self.emit(kind, origin_start, end);
            }
        }
    }

    /// `---` or `...` at column zero followed by whitespace or end of input.
    fn marker_at(&self, i: usize, g: &str) -> bool {
        self.at(i + 1) == Some(g) && self.at(i + 2) == Some(g) && self.space_or_end(i + 3)
    }

    fn line_end(&self, from: usize) -> usize {
        let mut j = from;
        while self.at(j).is_some_and(|g| !is_newline(g)) {
            j += 1;
        }
        j
    }

    fn property_end(&self, from: usize) -> usize {
        let mut j = from;
        while let Some(g) = self.at(j) {
            if is_space(g) || (self.flow_depth > 0 && is_flow_indicator(g)) {
                break;
            }
            j += 1;
        }
        j
    }

    fn quoted_end(&self, open: usize, quote: &str) -> usize {
        let mut j = open + 1;
        while let Some(g) = self.at(j) {
            if quote == "\"" && g == "\\" {
                j += 2;
                continue;
            }
            if g == quote {
                if quote == "'" && self.at(j + 1) == Some("'") {
                    j += 2;
                    continue;
                }
                return j + 1;
            }
            j += 1;
        }
        self.len()
    }

    fn plain_end(&self, from: usize) -> usize {
        let mut j = from;
        let mut last_visible = from;
        while let Some(g) = self.at(j) {
            if is_newline(g) {
                break;
            }
            if g == ":"
                && j > from
                && (self.space_or_end(j + 1)
                    || (self.flow_depth > 0 && self.at(j + 1).is_some_and(is_flow_indicator)))
            {
                break;
            }
            if self.flow_depth > 0 && is_flow_indicator(g) {
                break;
            }
            if is_blank(g) {
                if self.at(j + 1) == Some("#") {
                    break;
                }
            } else {
                last_visible = j + 1;
            }
            j += 1;
        }
        last_visible.max(from + 1).min(self.len())
    }

    /// Block scalar content: following lines that are blank or indented deeper
    /// than `parent`. Emits one multi-line token; returns false when empty.
    fn block_content(&mut self, origin_start: usize, parent: usize) -> bool {
        let mut j = self.i;
        let mut first = None;
        let mut content_end = None;
        loop {
            let mut k = j;
            let mut indent = 0usize;
            while self.at(k).is_some_and(is_blank) {
                k += 1;
                indent += 1;
            }
            let blank_line = self.at(k).is_none_or(is_newline);
            if !blank_line && indent <= parent {
                break;
            }
            let e = self.line_end(k);
            if !blank_line {
                first.get_or_insert(k);
                content_end = Some(e);
            }
            if e >= self.len() {
                break;
            }
            j = e + 1;
        }
        let (Some(first), Some(end)) = (first, content_end) else {
            return false;
        };
        self.advance_to(first);
        self.emit(TokenKind::BlockScalar, origin_start, end);
        true
    }

    fn mark_previous_as_key(&mut self) {
        if let Some(prev) = self.tokens.last_mut()
            && matches!(
                prev.kind,
                TokenKind::String | TokenKind::Number | TokenKind::Bool | TokenKind::Null
            )
            && prev.position.row == self.row
        {
            prev.kind = TokenKind::Key;
        }
    }
}

fn classify_plain(text: &str) -> TokenKind {
    match text {
        "~" | "null" | "Null" | "NULL" => return TokenKind::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return TokenKind::Bool,
        ".inf" | "-.inf" | "+.inf" | ".Inf" | "-.Inf" | ".INF" | ".nan" | ".NaN" | ".NAN" => {
            return TokenKind::Number;
        }
        _ => {}
    }
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let numeric = if let Some(hex) = digits.strip_prefix("0x") {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(oct) = digits.strip_prefix("0o") {
        !oct.is_empty() && oct.chars().all(|c| ('0'..='7').contains(&c))
    } else {
        digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && text.parse::<f64>().is_ok()
    };
    if numeric {
        TokenKind::Number
    } else {
        TokenKind::String
    }
}
