//! Cursor invariants for the revision chain under arbitrary operation sequences.

use core_model::{RevisionChain, Source};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Append,
    Seek(isize),
    GoTo(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Append),
        (-3isize..=3).prop_map(Op::Seek),
        (0usize..8).prop_map(Op::GoTo),
    ]
}

#[test]
fn append_from_middle_truncates() {
    let mut chain = RevisionChain::new();
    for name in ["A", "B", "C"] {
        chain.append(name, Source::from_text(name, "k: v"));
    }
    chain.go_to(1);
    chain.append("D", Source::from_text("D", "k: d"));
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.names(), vec!["A", "B", "D"]);
    assert_eq!(chain.index(), 2);
    assert_eq!(chain.source().map(Source::text).as_deref(), Some("k: d"));
}

proptest! {
    #[test]
    fn cursor_stays_in_range(ops in prop::collection::vec(op(), 1..40)) {
        let mut chain = RevisionChain::new();
        let mut appended = 0usize;
        for op in ops {
            match op {
                Op::Append => {
                    let before = chain.len();
                    let at = chain.index();
                    appended += 1;
                    let name = format!("r{appended}");
                    chain.append(name.clone(), Source::default());
                    let expected = if before == 0 { 1 } else { at + 2 };
                    prop_assert_eq!(chain.len(), expected);
                    prop_assert!(chain.at_tip());
                    prop_assert_eq!(chain.name(), name.as_str());
                }
                Op::Seek(d) => { chain.seek(d); }
                Op::GoTo(i) => { chain.go_to(i); }
            }
            if chain.is_empty() {
                prop_assert!(chain.current().is_none());
                continue;
            }
            let idx = chain.index();
            prop_assert!(idx < chain.len());
            prop_assert_eq!(chain.at_origin(), idx == 0);
            prop_assert_eq!(chain.at_tip(), idx + 1 == chain.len());
            let current = chain.current().unwrap();
            prop_assert_eq!(current.prev().is_none(), chain.at_origin());
            prop_assert_eq!(current.next().is_none(), chain.at_tip());
        }
    }
}
