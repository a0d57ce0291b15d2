use core_keymap::PagerAction;
use core_model::{DiffMode, Source, ViewMode};
use core_render::{Theme, YamlPrinter};
use core_text::styled;
use core_viewport::Viewport;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Action(PagerAction),
    AddRevision(Vec<String>),
    GoTo(usize),
    ScrollDown(usize),
    ScrollRight(usize),
    SetY(usize),
    SetX(usize),
    Resize(usize, usize),
    Search(String),
    HunkContext(usize),
    ViewMode(ViewMode),
}

fn line() -> impl Strategy<Value = String> {
    ("[a-c]{1,3}", "[a-z ]{0,30}").prop_map(|(k, v)| format!("{k}: {v}"))
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::sample::select(PagerAction::ALL.to_vec()).prop_map(Step::Action),
        prop::collection::vec(line(), 0..25).prop_map(Step::AddRevision),
        (0usize..8).prop_map(Step::GoTo),
        (0usize..40).prop_map(Step::ScrollDown),
        (0usize..40).prop_map(Step::ScrollRight),
        (0usize..100).prop_map(Step::SetY),
        (0usize..100).prop_map(Step::SetX),
        (0usize..60, 0usize..20).prop_map(|(w, h)| Step::Resize(w, h)),
        "[a-c]{0,2}".prop_map(Step::Search),
        (0usize..5).prop_map(Step::HunkContext),
        prop_oneof![
            Just(ViewMode::Full),
            Just(ViewMode::Hunks),
            Just(ViewMode::SideBySide)
        ]
        .prop_map(Step::ViewMode),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Kept {
    Both,
    Before,
    After,
}

fn edit() -> impl Strategy<Value = (Kept, String)> {
    (
        prop_oneof![Just(Kept::Both), Just(Kept::Before), Just(Kept::After)],
        "[a-z ]{0,30}",
    )
}

/// Before/after documents; shared lines are keyed `SAME{i}` so they are the
/// only lines the two sides have in common.
fn revisions(edits: &[(Kept, String)]) -> (String, String) {
    let (mut before, mut after) = (Vec::new(), Vec::new());
    for (i, (kept, value)) in edits.iter().enumerate() {
        match kept {
            Kept::Both => {
                before.push(format!("SAME{i}: {value}"));
                after.push(format!("SAME{i}: {value}"));
            }
            Kept::Before => before.push(format!("old{i}: {value}")),
            Kept::After => after.push(format!("new{i}: {value}")),
        }
    }
    (before.join("\n"), after.join("\n"))
}

fn run(vp: &mut Viewport, step: &Step) {
    match step {
        Step::Action(a) => {
            vp.apply(*a);
        }
        Step::AddRevision(lines) => {
            let name = format!("r{}", vp.revision_count());
            vp.add_revision(Source::from_text(name, &lines.join("\n")));
        }
        Step::GoTo(i) => vp.go_to_revision(*i),
        Step::ScrollDown(n) => vp.scroll_down(*n),
        Step::ScrollRight(n) => vp.scroll_right(*n),
        Step::SetY(n) => vp.set_y_offset(*n),
        Step::SetX(n) => vp.set_x_offset(*n),
        Step::Resize(w, h) => {
            vp.set_width(*w);
            vp.set_height(*h);
        }
        Step::Search(term) => vp.set_search_term(term),
        Step::HunkContext(n) => vp.set_hunk_context(*n),
        Step::ViewMode(m) => vp.set_view_mode(*m),
    }
}

fn check(vp: &Viewport) -> Result<(), TestCaseError> {
    prop_assert!(vp.y_offset() <= vp.max_y_offset());
    prop_assert!(vp.x_offset() <= vp.max_x_offset());
    if vp.word_wrap() {
        prop_assert_eq!(vp.x_offset(), 0);
    }
    match vp.search_index() {
        Some(i) => prop_assert!(i < vp.search_count()),
        None => prop_assert_eq!(vp.search_count(), 0),
    }
    if vp.revision_count() > 0 {
        prop_assert!(vp.revision_index() < vp.revision_count());
    }
    let expect_diff = vp.revision_count() > 1
        && !vp.is_at_first_revision()
        && vp.diff_mode() != DiffMode::None;
    prop_assert_eq!(vp.is_showing_diff(), expect_diff);
    if !vp.is_showing_diff() {
        prop_assert_eq!(vp.diff_stats(), (0, 0));
    }
    let sp = vp.scroll_percent();
    prop_assert!((0.0..=1.0).contains(&sp));
    Ok(())
}

proptest! {
    #[test]
    fn state_stays_within_bounds(steps in prop::collection::vec(step(), 1..40)) {
        let mut vp = Viewport::builder()
            .printer(Box::new(YamlPrinter::new(Theme::plain())))
            .size(40, 10)
            .build();
        for s in &steps {
            run(&mut vp, s);
            check(&vp)?;
            let frame = vp.view();
            if !frame.is_empty() {
                let rows: Vec<&str> = frame.split('\n').collect();
                prop_assert!(rows.len() <= vp.height());
                for row in rows {
                    prop_assert_eq!(styled::visible_width(row), vp.width());
                }
            }
        }
    }

    #[test]
    fn search_next_cycles_back(lines in prop::collection::vec(line(), 1..30), term in "[a-c]{1,2}") {
        let mut vp = Viewport::new(40, 10);
        vp.set_tokens(Source::from_text("s", &lines.join("\n")));
        vp.set_search_term(&term);
        let start = vp.search_index();
        for _ in 0..vp.search_count() {
            vp.search_next();
        }
        prop_assert_eq!(vp.search_index(), start);
    }

    #[test]
    fn toggles_have_fixed_periods(lines in prop::collection::vec(line(), 0..10)) {
        let mut vp = Viewport::new(40, 10);
        vp.add_revision(Source::from_text("a", &lines.join("\n")));
        vp.add_revision(Source::from_text("b", "a: 1"));
        let (diff, view) = (vp.diff_mode(), vp.view_mode());
        for _ in 0..3 {
            vp.toggle_diff_mode();
        }
        prop_assert_eq!(vp.diff_mode(), diff);
        vp.toggle_view_mode();
        vp.toggle_view_mode();
        prop_assert_eq!(vp.view_mode(), view);
    }

    #[test]
    fn append_moves_to_tip(count in 1usize..6, back in 0usize..6) {
        let mut vp = Viewport::new(40, 10);
        for i in 0..count {
            vp.add_revision(Source::from_text(format!("r{i}"), "k: v"));
        }
        vp.go_to_revision(count.saturating_sub(1 + back));
        let before = vp.revision_index();
        vp.add_revision(Source::from_text("new", "k: w"));
        prop_assert!(vp.is_at_latest_revision());
        prop_assert_eq!(vp.revision_count(), before + 2);
        prop_assert_eq!(vp.revision_name(), "new");
    }

    #[test]
    fn enabling_wrap_resets_x(x in 0usize..100) {
        let mut vp = Viewport::new(10, 4);
        vp.set_tokens(Source::from_text("w", &format!("key: {}", "v".repeat(60))));
        vp.set_x_offset(x);
        vp.toggle_word_wrap();
        prop_assert!(vp.word_wrap());
        prop_assert_eq!(vp.x_offset(), 0);
    }

    #[test]
    fn side_by_side_rows_stay_level(
        edits in prop::collection::vec(edit(), 1..12),
        width in 30usize..70,
        height in 1usize..30,
        wrap in any::<bool>(),
    ) {
        let (before, after) = revisions(&edits);
        let mut vp = Viewport::builder()
            .printer(Box::new(YamlPrinter::new(Theme::plain())))
            .size(width, height)
            .build();
        vp.set_view_mode(ViewMode::SideBySide);
        vp.add_revision(Source::from_text("before", &before));
        vp.add_revision(Source::from_text("after", &after));
        if wrap {
            vp.toggle_word_wrap();
        }
        let frame = vp.view();
        for row in frame.split('\n').filter(|r| !r.is_empty()) {
            prop_assert_eq!(styled::visible_width(row), width);
            let plain = styled::strip(row);
            let (left, right) = plain.split_once(" │ ").ok_or_else(|| {
                TestCaseError::fail(format!("row without separator: {plain:?}"))
            })?;
            if left.contains("SAME") || right.contains("SAME") {
                prop_assert_eq!(left.trim_end(), right.trim_end());
            }
        }
    }
}
