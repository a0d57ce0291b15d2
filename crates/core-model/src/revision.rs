//! Linear revision history with a single cursor.
//!
//! Stored as a vector plus a cursor index; `prev`/`next` are neighbouring
//! slots, so every query is O(1).

use crate::source::Source;
use tracing::debug;

/// A named snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub name: String,
    pub source: Source,
}

#[derive(Debug, Clone, Default)]
pub struct RevisionChain {
    revisions: Vec<Revision>,
    cursor: Option<usize>,
}

/// Borrowed view of one revision and its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct RevisionRef<'a> {
    chain: &'a RevisionChain,
    index: usize,
}

impl<'a> RevisionRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'a str {
        &self.chain.revisions[self.index].name
    }

    pub fn source(&self) -> &'a Source {
        &self.chain.revisions[self.index].source
    }

    pub fn prev(&self) -> Option<RevisionRef<'a>> {
        self.index.checked_sub(1).map(|index| RevisionRef {
            chain: self.chain,
            index,
        })
    }

    pub fn next(&self) -> Option<RevisionRef<'a>> {
        let index = self.index + 1;
        (index < self.chain.revisions.len()).then_some(RevisionRef {
            chain: self.chain,
            index,
        })
    }

    pub fn at_origin(&self) -> bool {
        self.index == 0
    }

    pub fn at_tip(&self) -> bool {
        self.index + 1 == self.chain.revisions.len()
    }
}

impl RevisionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `source` after the cursor, dropping any successors, and move the
    /// cursor onto it.
    pub fn append(&mut self, name: impl Into<String>, source: Source) -> usize {
        if let Some(cursor) = self.cursor {
            let dropped = self.revisions.len() - (cursor + 1);
            if dropped > 0 {
                debug!(target: "revision", dropped, "revision_tail_truncated");
            }
            self.revisions.truncate(cursor + 1);
        }
        self.revisions.push(Revision {
            name: name.into(),
            source,
        });
        let index = self.revisions.len() - 1;
        self.cursor = Some(index);
        debug!(target: "revision", index, len = self.revisions.len(), "revision_appended");
        index
    }

    /// Move the cursor by `delta`, stopping at either end. Returns true when it moved.
    pub fn seek(&mut self, delta: isize) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let last = self.revisions.len() as isize - 1;
        let target = (cursor as isize + delta).clamp(0, last) as usize;
        self.cursor = Some(target);
        target != cursor
    }

    /// Move the cursor to `index`, clamped into range.
    pub fn go_to(&mut self, index: usize) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let target = index.min(self.revisions.len() - 1);
        self.cursor = Some(target);
        target != cursor
    }

    pub fn at(&self, index: usize) -> Option<RevisionRef<'_>> {
        (index < self.revisions.len()).then_some(RevisionRef { chain: self, index })
    }

    pub fn origin(&self) -> Option<RevisionRef<'_>> {
        self.at(0)
    }

    pub fn tip(&self) -> Option<RevisionRef<'_>> {
        self.revisions.len().checked_sub(1).and_then(|i| self.at(i))
    }

    pub fn current(&self) -> Option<RevisionRef<'_>> {
        self.cursor.and_then(|i| self.at(i))
    }

    pub fn at_origin(&self) -> bool {
        self.cursor == Some(0)
    }

    pub fn at_tip(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 == self.revisions.len())
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.revisions.iter().map(|r| r.name.clone()).collect()
    }

    /// Cursor index; zero on an empty chain.
    pub fn index(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    pub fn name(&self) -> &str {
        self.current().map(|r| r.name()).unwrap_or("")
    }

    pub fn source(&self) -> Option<&Source> {
        self.current().map(|r| r.source())
    }

    /// Mutable access to the current revision's source (overlays only change).
    pub fn source_mut(&mut self) -> Option<&mut Source> {
        let i = self.cursor?;
        self.revisions.get_mut(i).map(|r| &mut r.source)
    }

    pub fn clear(&mut self) {
        self.revisions.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> RevisionChain {
        let mut c = RevisionChain::new();
        for n in names {
            c.append(*n, Source::from_text(*n, &format!("{n}: 1")));
        }
        c
    }

    #[test]
    fn empty_chain_returns_zero_values() {
        let mut c = RevisionChain::new();
        assert!(c.current().is_none());
        assert!(c.origin().is_none());
        assert!(c.tip().is_none());
        assert!(!c.at_origin());
        assert!(!c.at_tip());
        assert!(!c.seek(1));
        assert!(!c.go_to(3));
        assert_eq!(c.index(), 0);
        assert_eq!(c.name(), "");
        assert!(c.names().is_empty());
    }

    #[test]
    fn append_moves_cursor_to_tip() {
        let c = chain(&["a", "b", "c"]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.index(), 2);
        assert!(c.at_tip());
        assert_eq!(c.name(), "c");
    }

    #[test]
    fn append_from_middle_truncates_tail() {
        let mut c = chain(&["a", "b", "c"]);
        assert!(c.go_to(1));
        c.append("d", Source::default());
        assert_eq!(c.names(), vec!["a", "b", "d"]);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn seek_and_go_to_clamp() {
        let mut c = chain(&["a", "b", "c"]);
        assert!(!c.seek(1));
        assert!(c.seek(-5));
        assert!(c.at_origin());
        assert!(c.go_to(99));
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn refs_walk_neighbours() {
        let c = chain(&["a", "b", "c"]);
        let origin = c.origin().unwrap();
        assert!(origin.at_origin());
        assert!(origin.prev().is_none());
        let mid = origin.next().unwrap();
        assert_eq!(mid.name(), "b");
        assert_eq!(mid.index(), 1);
        let tip = mid.next().unwrap();
        assert!(tip.at_tip());
        assert!(tip.next().is_none());
        assert_eq!(tip.prev().unwrap().name(), "b");
    }
}
