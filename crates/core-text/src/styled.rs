//! Measurement and cutting of styled strings.
//!
//! A styled string is plain text interleaved with ANSI escape sequences (SGR
//! colour/attribute codes as written by `crossterm::style`). Escape sequences
//! occupy no cells. Every helper here keeps escape sequences intact: cutting
//! a string drops visible clusters outside the window but never drops or
//! splits an escape, so style resets emitted after a run still apply.
//!
//! A wide cluster straddling a cut boundary is replaced by spaces for the
//! cells that fall inside the window.

use crate::egc_width;
use unicode_segmentation::UnicodeSegmentation;
use vte::{Params, Parser, Perform};

/// A piece of a styled string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Bytes of an escape sequence, kept verbatim.
    Escape(&'a str),
    /// One visible grapheme cluster.
    Cluster(&'a str),
}

/// What the parser completed on the last byte fed to it.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// A printable char of this many UTF-8 bytes.
    Print(usize),
    Control,
    Sequence,
}

#[derive(Default)]
struct Steps {
    last: Option<Step>,
}

impl Perform for Steps {
    fn print(&mut self, c: char) {
        self.last = Some(Step::Print(c.len_utf8()));
    }

    fn execute(&mut self, _byte: u8) {
        self.last = Some(Step::Control);
    }

    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {
        self.last = Some(Step::Sequence);
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {
        self.last = Some(Step::Sequence);
    }

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        self.last = Some(Step::Sequence);
    }

    fn unhook(&mut self) {
        self.last = Some(Step::Sequence);
    }
}

fn push_clusters<'a>(out: &mut Vec<Piece<'a>>, text: &'a str) {
    out.extend(text.graphemes(true).map(Piece::Cluster));
}

/// Split a styled string into escapes and visible clusters, in order.
///
/// Bytes are fed to a `vte` parser one at a time so every escape keeps its
/// exact source bytes. Printable runs between escapes are segmented into
/// grapheme clusters. C0 controls outside a sequence count as text; an
/// aborted or unterminated sequence is kept as an escape.
pub fn pieces(s: &str) -> Vec<Piece<'_>> {
    let bytes = s.as_bytes();
    let mut parser = Parser::new();
    let mut steps = Steps::default();
    let mut out = Vec::new();
    // Text run `text..pending`; bytes from `pending` are not yet classified.
    let mut text = 0;
    let mut pending = 0;

    for (i, byte) in bytes.iter().enumerate() {
        parser.advance(&mut steps, std::slice::from_ref(byte));
        let end = i + 1;
        match steps.last.take() {
            None => {}
            Some(Step::Print(len)) => {
                let ch = end - len;
                if ch > pending {
                    push_clusters(&mut out, &s[text..pending]);
                    out.push(Piece::Escape(&s[pending..ch]));
                    text = ch;
                }
                pending = end;
            }
            // Controls inside an open sequence do not end it.
            Some(Step::Control) if pending < i => {}
            Some(Step::Control) => pending = end,
            Some(Step::Sequence) => {
                push_clusters(&mut out, &s[text..pending]);
                out.push(Piece::Escape(&s[pending..end]));
                text = end;
                pending = end;
            }
        }
    }
    push_clusters(&mut out, &s[text..pending]);
    if pending < bytes.len() {
        out.push(Piece::Escape(&s[pending..]));
    }
    out
}

/// Visible width in cells, ignoring escape sequences.
pub fn visible_width(s: &str) -> usize {
    pieces(s)
        .into_iter()
        .map(|p| match p {
            Piece::Escape(_) => 0,
            Piece::Cluster(g) => egc_width(g) as usize,
        })
        .sum()
}

/// Remove every escape sequence, leaving plain text.
pub fn strip(s: &str) -> String {
    strip_ansi_escapes::strip_str(s)
}

/// Keep the cells in `[start, end)` (display columns) of a styled string.
pub fn cut(s: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut col = 0usize;
    for p in pieces(s) {
        match p {
            Piece::Escape(e) => out.push_str(e),
            Piece::Cluster(g) => {
                let w = egc_width(g) as usize;
                let next = col + w;
                if col >= start && next <= end {
                    out.push_str(g);
                } else if next > start && col < end {
                    // Straddles a boundary: fill the covered cells with blanks.
                    let covered = next.min(end) - col.max(start);
                    out.extend(std::iter::repeat_n(' ', covered));
                }
                col = next;
            }
        }
    }
    out
}

/// Keep at most `width` leading cells.
pub fn truncate(s: &str, width: usize) -> String {
    cut(s, 0, width)
}

/// Number of blank cells needed to bring `s` up to `width`.
pub fn pad_needed(s: &str, width: usize) -> usize {
    width.saturating_sub(visible_width(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = "\u{1b}[38;5;9m";
    const RESET: &str = "\u{1b}[0m";

    #[test]
    fn width_ignores_sgr() {
        let s = format!("{RED}key{RESET}: value");
        assert_eq!(visible_width(&s), 10);
        assert_eq!(strip(&s), "key: value");
    }

    #[test]
    fn cut_preserves_escapes() {
        let s = format!("{RED}abcdef{RESET}");
        let c = cut(&s, 2, 4);
        assert_eq!(strip(&c), "cd");
        assert!(c.starts_with(RED));
        assert!(c.ends_with(RESET));
    }

    #[test]
    fn cut_wide_cluster_straddling_start() {
        let c = cut("a界b", 2, 4);
        assert_eq!(c, " b");
        assert_eq!(visible_width(&c), 2);
    }

    #[test]
    fn cut_wide_cluster_straddling_end() {
        let c = cut("a界b", 0, 2);
        assert_eq!(c, "a ");
    }

    #[test]
    fn truncate_past_end_is_identity_on_text() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn pieces_keep_escapes_verbatim() {
        let s = format!("{RED}e\u{301}x{RESET}\u{1b}[");
        assert_eq!(
            pieces(&s),
            vec![
                Piece::Escape(RED),
                Piece::Cluster("e\u{301}"),
                Piece::Cluster("x"),
                Piece::Escape(RESET),
                Piece::Escape("\u{1b}["),
            ]
        );
    }

    #[test]
    fn osc_sequences_are_opaque() {
        let s = "\u{1b}]0;title\u{7}ab";
        assert_eq!(visible_width(s), 2);
        assert_eq!(strip(s), "ab");
    }

    #[test]
    fn pad_needed_counts_missing_cells() {
        assert_eq!(pad_needed("abc", 5), 2);
        assert_eq!(pad_needed("abcdef", 5), 0);
    }

    proptest::proptest! {
        #[test]
        fn cut_covers_window_cells(
            text in "[a-z界 ]{0,24}",
            a in 0usize..40,
            len in 0usize..40,
        ) {
            let styled = format!("{RED}{text}{RESET}");
            let b = a + len;
            let c = cut(&styled, a, b);
            let expected = b.min(visible_width(&text)).saturating_sub(a);
            proptest::prop_assert_eq!(visible_width(&c), expected);
            let escapes = |s: &str| {
                pieces(s)
                    .into_iter()
                    .filter(|p| matches!(p, Piece::Escape(_)))
                    .count()
            };
            proptest::prop_assert_eq!(escapes(&c), 2);
        }
    }
}
