use crate::lcs::{Op, OpKind};
use core_model::{Line, LineFlag, Source, StyleCategory};

/// Counts of inserted and deleted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Materialised views of one diff.
///
/// Row `i` of `unified`, `before_pane` and `after_pane` all describe `ops[i]`;
/// hunk extraction relies on that alignment.
#[derive(Debug, Clone)]
pub struct DiffResult {
    ops: Vec<Op>,
    unified: Source,
    before_pane: Source,
    after_pane: Source,
    stats: DiffStats,
}

fn tinted(line: &Line, row: usize, flag: LineFlag) -> Line {
    let style = match flag {
        LineFlag::Deleted => Some(StyleCategory::Deleted),
        LineFlag::Inserted => Some(StyleCategory::Inserted),
        LineFlag::Default => None,
    };
    line.flagged(row, flag, style)
}

impl DiffResult {
    pub(crate) fn build(ops: Vec<Op>, before: &Source, after: &Source) -> Self {
        let mut unified = Vec::with_capacity(ops.len());
        let mut left = Vec::with_capacity(ops.len());
        let mut right = Vec::with_capacity(ops.len());
        let mut stats = DiffStats::default();
        let mut before_row = 0usize;

        for (row, op) in ops.iter().enumerate() {
            match op.kind {
                OpKind::Equal => {
                    if let (Some(old), Some(new)) = (before.line(before_row), after.line(op.index))
                    {
                        unified.push(tinted(new, row, LineFlag::Default));
                        left.push(tinted(old, row, LineFlag::Default));
                        right.push(tinted(new, row, LineFlag::Default));
                    }
                    before_row += 1;
                }
                OpKind::Delete => {
                    if let Some(old) = before.line(op.index) {
                        unified.push(tinted(old, row, LineFlag::Deleted));
                        left.push(tinted(old, row, LineFlag::Deleted));
                        right.push(Line::placeholder(row, LineFlag::Deleted));
                    }
                    before_row = op.index + 1;
                    stats.removed += 1;
                }
                OpKind::Insert => {
                    if let Some(new) = after.line(op.index) {
                        unified.push(tinted(new, row, LineFlag::Inserted));
                        left.push(Line::placeholder(row, LineFlag::Inserted));
                        right.push(tinted(new, row, LineFlag::Inserted));
                    }
                    stats.added += 1;
                }
            }
        }

        Self {
            ops,
            unified: Source::new(after.name(), unified),
            before_pane: Source::new(before.name(), left),
            after_pane: Source::new(after.name(), right),
            stats,
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Deletes then inserts at each change, equal lines shown once.
    pub fn unified(&self) -> &Source {
        &self.unified
    }

    /// Delete and equal lines; insert positions hold placeholders.
    pub fn before_pane(&self) -> &Source {
        &self.before_pane
    }

    /// Insert and equal lines; delete positions hold placeholders.
    pub fn after_pane(&self) -> &Source {
        &self.after_pane
    }

    pub fn stats(&self) -> DiffStats {
        self.stats
    }

    pub fn is_identical(&self) -> bool {
        self.stats == DiffStats::default()
    }
}
