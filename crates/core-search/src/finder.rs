use crate::normalize::{Normalizer, StripMarks};
use core_model::{Position, Range, Source};
use core_text::grapheme;
use tracing::{debug, trace};

/// Locates query matches in a loaded source.
pub trait Finder: Send {
    fn load(&mut self, source: &Source);
    fn find(&self, query: &str) -> Vec<Range>;
}

/// Substring finder over the normalized text of a source.
///
/// `buffer[i]` was produced by the grapheme at `positions[i]`. Line breaks
/// are kept as `'\n'` mapped to the end of their line, so a query containing
/// a newline can match across rows.
pub struct TextFinder {
    normalizer: Box<dyn Normalizer>,
    buffer: Vec<char>,
    positions: Vec<Position>,
    end: Position,
}

impl Default for TextFinder {
    fn default() -> Self {
        Self::new(Box::new(StripMarks))
    }
}

impl TextFinder {
    pub fn new(normalizer: Box<dyn Normalizer>) -> Self {
        Self {
            normalizer,
            buffer: Vec::new(),
            positions: Vec::new(),
            end: Position::origin(),
        }
    }

    /// Length of the normalized buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn position(&self, i: usize) -> Position {
        self.positions.get(i).copied().unwrap_or(self.end)
    }
}

impl Finder for TextFinder {
    fn load(&mut self, source: &Source) {
        self.buffer.clear();
        self.positions.clear();
        self.end = Position::origin();
        let last = source.len().saturating_sub(1);
        for (row, line) in source.lines().iter().enumerate() {
            let text = line.text();
            let mut col = 0;
            for g in grapheme::iter(&text) {
                for c in self.normalizer.normalize(g).chars() {
                    self.buffer.push(c);
                    self.positions.push(Position::new(row, col));
                }
                col += 1;
            }
            if row < last {
                self.buffer.push('\n');
                self.positions.push(Position::new(row, col));
            } else {
                self.end = Position::new(row, col);
            }
        }
        debug!(target: "search", rows = source.len(), chars = self.buffer.len(), "finder_loaded");
    }

    fn find(&self, query: &str) -> Vec<Range> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle: Vec<char> = self.normalizer.normalize(query).chars().collect();
        let k = needle.len();
        let mut ranges = Vec::new();
        if k == 0 || k > self.buffer.len() {
            trace!(target: "search", query_len = query.len(), matches = 0, "find");
            return ranges;
        }

        let mut i = 0;
        while i + k <= self.buffer.len() {
            if self.buffer[i..i + k] == needle[..] {
                let start = self.position(i);
                let last = self.position(i + k - 1);
                let mut end = self.position(i + k);
                if end <= last {
                    end = Position::new(last.row, last.col + 1);
                }
                ranges.push(Range::new(start, end));
                i += k;
            } else {
                i += 1;
            }
        }
        trace!(target: "search", query_len = query.len(), matches = ranges.len(), "find");
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CaseFold, Identity};
    use pretty_assertions::assert_eq;

    fn range(r0: usize, c0: usize, r1: usize, c1: usize) -> Range {
        Range::new(Position::new(r0, c0), Position::new(r1, c1))
    }

    fn find(text: &str, query: &str) -> Vec<Range> {
        let mut f = TextFinder::default();
        f.load(&Source::from_text("t", text));
        f.find(query)
    }

    #[test]
    fn finds_every_row() {
        let text = "item1: first\nitem2: second\nother: third\nitem3: fourth";
        assert_eq!(
            find(text, "item"),
            vec![range(0, 0, 0, 4), range(1, 0, 1, 4), range(3, 0, 3, 4)]
        );
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert!(find("a: b", "").is_empty());
    }

    #[test]
    fn matches_do_not_overlap() {
        assert_eq!(find("k: aaaa", "aa"), vec![range(0, 3, 0, 5), range(0, 5, 0, 7)]);
    }

    #[test]
    fn match_at_line_end_ends_at_line_length() {
        assert_eq!(find("k: abc\nz: 1", "abc"), vec![range(0, 3, 0, 6)]);
        assert_eq!(find("k: abc", "abc"), vec![range(0, 3, 0, 6)]);
    }

    #[test]
    fn multi_line_match() {
        let hits = find("a: x\nb: y", "x\nb");
        assert_eq!(hits, vec![range(0, 3, 1, 1)]);
    }

    #[test]
    fn combining_marks_are_ignored_by_default() {
        assert_eq!(find("name: Cafe\u{301}", "Cafe"), vec![range(0, 6, 0, 10)]);
        assert_eq!(find("name: Café", "Cafe"), vec![range(0, 6, 0, 10)]);
        assert_eq!(find("name: Cafe", "Café"), vec![range(0, 6, 0, 10)]);
    }

    #[test]
    fn columns_count_clusters() {
        assert_eq!(find("k: 界x", "x"), vec![range(0, 4, 0, 5)]);
    }

    #[test]
    fn normalizer_is_pluggable() {
        let src = Source::from_text("t", "Key: VALUE");
        let mut fold = TextFinder::new(Box::new(CaseFold));
        fold.load(&src);
        assert_eq!(fold.find("value").len(), 1);
        let mut exact = TextFinder::new(Box::new(Identity));
        exact.load(&src);
        assert!(exact.find("value").is_empty());
    }

    #[test]
    fn reload_replaces_buffer() {
        let mut f = TextFinder::default();
        f.load(&Source::from_text("a", "a: long text"));
        f.load(&Source::from_text("b", "b: x"));
        assert_eq!(f.len(), 4);
        assert!(f.find("long").is_empty());
    }
}
