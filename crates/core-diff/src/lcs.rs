//! Hirschberg longest-common-subsequence over interned line ids.
//!
//! Time O(m·n), auxiliary space O(n) in the after-sequence length. The four
//! rows are owned by the engine and only ever grow, so repeated diffs on one
//! engine stop allocating once the largest input has been seen.

/// Edit operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Equal,
    Delete,
    Insert,
}

/// One step of an edit script. `index` points into the before-sequence for
/// `Delete` and into the after-sequence for `Insert` and `Equal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Op {
    pub kind: OpKind,
    pub index: usize,
}

impl Op {
    pub const fn equal(index: usize) -> Self {
        Self {
            kind: OpKind::Equal,
            index,
        }
    }

    pub const fn delete(index: usize) -> Self {
        Self {
            kind: OpKind::Delete,
            index,
        }
    }

    pub const fn insert(index: usize) -> Self {
        Self {
            kind: OpKind::Insert,
            index,
        }
    }
}

#[derive(Debug, Default)]
pub struct LcsEngine {
    prev: Vec<usize>,
    cur: Vec<usize>,
    fwd: Vec<usize>,
    bwd: Vec<usize>,
}

fn grow(row: &mut Vec<usize>, len: usize) {
    if row.len() < len {
        row.resize(len, 0);
    }
}

impl LcsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity of the scratch rows; never decreases.
    pub fn scratch_len(&self) -> usize {
        self.prev.len()
    }

    /// Edit script turning `a` into `b`. Within every run of changes the
    /// deletes precede the inserts.
    pub fn diff(&mut self, a: &[u32], b: &[u32]) -> Vec<Op> {
        let mut ops = Vec::with_capacity(a.len().max(b.len()));
        self.recurse(a, 0, b, 0, &mut ops);
        deletes_first(&mut ops);
        ops
    }

    fn recurse(&mut self, a: &[u32], a_off: usize, b: &[u32], b_off: usize, ops: &mut Vec<Op>) {
        if a.is_empty() {
            ops.extend((0..b.len()).map(|j| Op::insert(b_off + j)));
            return;
        }
        if b.is_empty() {
            ops.extend((0..a.len()).map(|i| Op::delete(a_off + i)));
            return;
        }
        if a.len() == 1 {
            match b.iter().position(|&y| y == a[0]) {
                Some(j) => {
                    ops.extend((0..j).map(|k| Op::insert(b_off + k)));
                    ops.push(Op::equal(b_off + j));
                    ops.extend((j + 1..b.len()).map(|k| Op::insert(b_off + k)));
                }
                None => {
                    ops.push(Op::delete(a_off));
                    ops.extend((0..b.len()).map(|k| Op::insert(b_off + k)));
                }
            }
            return;
        }

        let mid = a.len() / 2;
        let n = b.len();
        self.last_row(&a[..mid], b, false);
        std::mem::swap(&mut self.fwd, &mut self.prev);
        self.last_row(&a[mid..], b, true);
        std::mem::swap(&mut self.bwd, &mut self.prev);

        let mut best = 0;
        let mut split = 0;
        for k in 0..=n {
            let score = self.fwd[k] + self.bwd[n - k];
            if score > best {
                best = score;
                split = k;
            }
        }

        self.recurse(&a[..mid], a_off, &b[..split], b_off, ops);
        self.recurse(&a[mid..], a_off + mid, &b[split..], b_off + split, ops);
    }

    /// LCS lengths of `a` against every prefix of `b` (or, reversed, every
    /// suffix), left in `self.prev[..=b.len()]`.
    fn last_row(&mut self, a: &[u32], b: &[u32], reverse: bool) {
        let n = b.len();
        grow(&mut self.prev, n + 1);
        grow(&mut self.cur, n + 1);
        grow(&mut self.fwd, n + 1);
        grow(&mut self.bwd, n + 1);
        self.prev[..=n].fill(0);
        for i in 0..a.len() {
            let x = if reverse { a[a.len() - 1 - i] } else { a[i] };
            self.cur[0] = 0;
            for j in 1..=n {
                let y = if reverse { b[n - j] } else { b[j - 1] };
                self.cur[j] = if x == y {
                    self.prev[j - 1] + 1
                } else {
                    self.prev[j].max(self.cur[j - 1])
                };
            }
            std::mem::swap(&mut self.prev, &mut self.cur);
        }
    }
}

/// Stable-partition every maximal non-equal run so deletes come first.
fn deletes_first(ops: &mut [Op]) {
    let mut start = 0;
    while start < ops.len() {
        if ops[start].kind == OpKind::Equal {
            start += 1;
            continue;
        }
        let end = ops[start..]
            .iter()
            .position(|op| op.kind == OpKind::Equal)
            .map_or(ops.len(), |p| start + p);
        ops[start..end].sort_by_key(|op| op.kind != OpKind::Delete);
        start = end;
    }
}
