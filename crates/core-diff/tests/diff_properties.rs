//! Universal properties of the diff views over random line sequences.

use core_diff::{DiffEngine, OpKind, diff};
use core_model::{LineFlag, Source};
use proptest::prelude::*;

fn source(name: &str, keys: &[u8]) -> Source {
    let text: Vec<String> = keys.iter().map(|k| format!("k{k}: v")).collect();
    Source::from_text(name, &text.join("\n"))
}

fn lines() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 0..24)
}

proptest! {
    #[test]
    fn deletes_precede_inserts(a in lines(), b in lines()) {
        let d = diff(&source("a", &a), &source("b", &b));
        let flags: Vec<LineFlag> = d.unified().lines().iter().map(|l| l.flag).collect();
        for pair in flags.windows(2) {
            prop_assert!(!(pair[0] == LineFlag::Inserted && pair[1] == LineFlag::Deleted));
        }
    }

    #[test]
    fn identical_sources_diff_to_themselves(a in lines()) {
        let s = source("s", &a);
        let d = diff(&s, &s);
        prop_assert_eq!(d.stats().added, 0);
        prop_assert_eq!(d.stats().removed, 0);
        prop_assert_eq!(d.unified(), &s);
        prop_assert!(d.unified().lines().iter().all(|l| l.flag == LineFlag::Default));
    }

    #[test]
    fn script_rebuilds_both_sides(a in lines(), b in lines()) {
        let before = source("a", &a);
        let after = source("b", &b);
        let d = diff(&before, &after);
        let old: Vec<String> = d.unified().lines().iter()
            .filter(|l| l.flag != LineFlag::Inserted)
            .map(|l| l.text())
            .collect();
        let new: Vec<String> = d.unified().lines().iter()
            .filter(|l| l.flag != LineFlag::Deleted)
            .map(|l| l.text())
            .collect();
        let expect_old: Vec<String> = before.lines().iter().map(|l| l.text()).collect();
        let expect_new: Vec<String> = after.lines().iter().map(|l| l.text()).collect();
        prop_assert_eq!(old, expect_old);
        prop_assert_eq!(new, expect_new);
        prop_assert_eq!(d.stats().added + d.ops().iter().filter(|o| o.kind == OpKind::Equal).count(), after.len());
    }

    #[test]
    fn panes_have_equal_length(a in lines(), b in lines()) {
        let d = diff(&source("a", &a), &source("b", &b));
        prop_assert_eq!(d.before_pane().len(), d.after_pane().len());
        prop_assert_eq!(d.before_pane().len(), d.unified().len());
    }

    #[test]
    fn reused_engine_matches_fresh(a in lines(), b in lines(), c in lines()) {
        let mut engine = DiffEngine::new();
        let _ = engine.diff(&source("c", &c), &source("a", &a));
        let reused = engine.diff(&source("a", &a), &source("b", &b));
        let fresh = diff(&source("a", &a), &source("b", &b));
        prop_assert_eq!(reused.ops(), fresh.ops());
    }
}

#[test]
fn one_side_empty() {
    let empty = Source::from_text("e", "");
    let full = source("f", &[1, 2, 3]);
    let d = diff(&empty, &full);
    assert!(d.ops().iter().all(|o| o.kind == OpKind::Insert));
    let d = diff(&full, &empty);
    assert!(d.ops().iter().all(|o| o.kind == OpKind::Delete));
    assert!(diff(&empty, &empty).unified().is_empty());
}
