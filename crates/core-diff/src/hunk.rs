use crate::lcs::OpKind;
use crate::result::DiffResult;
use core_model::{Line, Source, Span};

/// A contiguous group of changes plus context, as rows of the unified view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub span: Span,
    /// `@@ -old_start,old_len +new_start,new_len @@`
    pub header: String,
}

/// Start reported in a hunk header. An empty side points at the line before
/// the hunk (0 when the hunk is at the top).
fn header_start(pane: &Source, span: Span, len: usize) -> usize {
    let rows = |r: usize| pane.line(r).and_then(|l| l.source_row);
    if len > 0 {
        return span
            .rows()
            .find_map(rows)
            .map_or(0, |row| row + 1);
    }
    (0..span.start).rev().find_map(rows).map_or(0, |row| row + 1)
}

impl DiffResult {
    /// Decompose into hunks with up to `context` equal rows around each change.
    pub fn hunk_spans(&self, context: usize) -> Vec<Hunk> {
        let ops = self.ops();
        let mut keep = vec![false; ops.len()];
        for (i, op) in ops.iter().enumerate() {
            if op.kind != OpKind::Equal {
                let lo = i.saturating_sub(context);
                let hi = (i + context + 1).min(ops.len());
                keep[lo..hi].iter_mut().for_each(|k| *k = true);
            }
        }

        let mut hunks = Vec::new();
        let mut row = 0;
        while row < ops.len() {
            if !keep[row] {
                row += 1;
                continue;
            }
            let start = row;
            while row < ops.len() && keep[row] {
                row += 1;
            }
            let span = Span::new(start, row);
            let old_len = ops[start..row]
                .iter()
                .filter(|op| op.kind != OpKind::Insert)
                .count();
            let new_len = ops[start..row]
                .iter()
                .filter(|op| op.kind != OpKind::Delete)
                .count();
            let old_start = header_start(self.before_pane(), span, old_len);
            let new_start = header_start(self.after_pane(), span, new_len);
            hunks.push(Hunk {
                span,
                header: format!("@@ -{old_start},{old_len} +{new_start},{new_len} @@"),
            });
        }
        hunks
    }

    /// Source holding only the hunk rows; each hunk's first row carries its
    /// header as annotation. `context == 0` keeps only changed rows.
    pub fn hunks(&self, context: usize) -> Source {
        let unified = self.unified();
        let mut lines: Vec<Line> = Vec::new();
        for hunk in self.hunk_spans(context) {
            let first = lines.len();
            lines.extend(unified.iter(hunk.span).cloned());
            if let Some(line) = lines.get_mut(first) {
                line.annotation = Some(hunk.header);
            }
        }
        Source::new(unified.name(), lines)
    }
}
