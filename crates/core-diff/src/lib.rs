//! Line diff between two sources.
//!
//! Lines are compared by their concatenated origin text. Each distinct text
//! is interned to a `u32` id, then [`LcsEngine`] runs Hirschberg's algorithm
//! over the id sequences. The resulting edit script is materialised by
//! [`DiffResult`] into unified, before/after pane and hunk views.

mod hunk;
mod lcs;
mod result;

pub use hunk::Hunk;
pub use lcs::{LcsEngine, Op, OpKind};
pub use result::{DiffResult, DiffStats};

use ahash::AHashMap;
use core_model::Source;
use tracing::debug;

/// Owns the LCS scratch rows and the interning table between runs.
#[derive(Debug, Default)]
pub struct DiffEngine {
    lcs: LcsEngine,
    ids: AHashMap<String, u32>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diff(&mut self, before: &Source, after: &Source) -> DiffResult {
        self.ids.clear();
        let a = self.intern(before);
        let b = self.intern(after);
        let ops = self.lcs.diff(&a, &b);
        let result = DiffResult::build(ops, before, after);
        let stats = result.stats();
        debug!(
            target: "diff",
            before = before.len(),
            after = after.len(),
            added = stats.added,
            removed = stats.removed,
            "diff_computed"
        );
        result
    }

    fn intern(&mut self, source: &Source) -> Vec<u32> {
        source
            .lines()
            .iter()
            .map(|line| {
                let next = self.ids.len() as u32;
                *self.ids.entry(line.text()).or_insert(next)
            })
            .collect()
    }
}

/// One-shot diff with a fresh engine.
pub fn diff(before: &Source, after: &Source) -> DiffResult {
    DiffEngine::new().diff(before, after)
}
