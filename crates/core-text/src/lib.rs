//! Text primitives shared by every layer of the pager.
//!
//! * [`Position`], [`Range`] and [`Span`] describe locations in a rendered
//!   document. Columns count grapheme clusters ("visible characters"), never
//!   bytes, so a search hit and the printer agree on where a cell lives.
//! * [`grapheme`] wraps segmentation + the width engine for single lines.
//! * [`styled`] measures and cuts strings that already carry ANSI SGR codes.

mod geom;
pub mod styled;
pub mod width;

pub use geom::{Position, Range, Span};
pub use width::{egc_width, str_width};

/// Grapheme and width utilities. These are pure helpers operating on a single line.
pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Number of grapheme clusters (visible characters) in `line`.
    pub fn count(line: &str) -> usize {
        line.graphemes(true).count()
    }

    /// Width in terminal cells of this grapheme cluster.
    pub fn cluster_width(g: &str) -> usize {
        egc_width(g) as usize
    }

    /// Compute the visual column (terminal cells) of grapheme index `col`.
    pub fn visual_col(line: &str, col: usize) -> usize {
        line.graphemes(true)
            .take(col)
            .map(|g| egc_width(g) as usize)
            .sum()
    }

    /// Whitespace classification used by word wrapping.
    pub fn is_blank(g: &str) -> bool {
        g.chars().all(char::is_whitespace)
    }

    /// Width of the leading whitespace run, in cells.
    pub fn indent_width(line: &str) -> usize {
        line.graphemes(true)
            .take_while(|g| is_blank(g))
            .map(|g| egc_width(g) as usize)
            .sum()
    }
}
