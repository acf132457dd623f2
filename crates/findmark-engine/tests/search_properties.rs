use std::time::{Duration, Instant};

use findmark_engine::page::{parse_page, to_html};
use findmark_engine::search::{
    QueryMatcher, SearchController, SearchSettings, SearchState, apply_highlights, find_markers,
    revert_highlights,
};
use findmark_engine::tree::{DocTree, NodeId, RenderTree, ScrollIntoView, ScrollOptions};
use pretty_assertions::assert_eq;
use rstest::rstest;

const PORTFOLIO: &str = "\
# Abhiroop's Portfolio

Visual design, *party* posters and generative **art**.

## Frontend Projects

- Art direction for a festival site
- A React party planner
- Smart ARTIFACT viewer

```
const art = new Canvas();
```

> Start with the part that matters.
";

#[derive(Default)]
struct RecordingViewport {
    scrolled: Vec<NodeId>,
}

impl ScrollIntoView<NodeId> for RecordingViewport {
    fn scroll_into_view(&mut self, node: NodeId, _options: ScrollOptions) {
        self.scrolled.push(node);
    }
}

fn portfolio() -> DocTree {
    let mut tree = parse_page(PORTFOLIO);
    let root = tree.root();
    let nav = tree.append_element(root, "nav", &["search-container"]);
    tree.append_text(nav, "art");
    let script = tree.append_element(root, "script", &[]);
    tree.append_text(script, "window.art = true;");
    tree
}

fn all_text(tree: &DocTree) -> String {
    tree.text_content(tree.root())
}

fn marker_texts(tree: &DocTree, settings: &SearchSettings) -> Vec<String> {
    find_markers(tree, &settings.marker)
        .into_iter()
        .map(|m| tree.text_content(m))
        .collect()
}

#[rstest]
#[case("art")]
#[case("ART")]
#[case("a")]
#[case(" ")]
#[case("party planner")]
#[case("(")]
#[case("zzz")]
#[case("e")]
fn round_trip_identity(#[case] query: &str) {
    let mut tree = portfolio();
    let original_text = all_text(&tree);
    let original_html = to_html(&tree);
    let settings = SearchSettings::default();

    if let Some(matcher) = QueryMatcher::new(query) {
        apply_highlights(&mut tree, &matcher, &settings);
    }
    assert_eq!(all_text(&tree), original_text);

    revert_highlights(&mut tree, &settings.marker);
    assert_eq!(all_text(&tree), original_text);
    assert_eq!(to_html(&tree), original_html);
}

#[test]
fn idempotent_revert() {
    let mut tree = portfolio();
    let settings = SearchSettings::default();
    let matcher = QueryMatcher::new("art").unwrap();
    apply_highlights(&mut tree, &matcher, &settings);

    revert_highlights(&mut tree, &settings.marker);
    let once = to_html(&tree);
    let revision = tree.revision();

    assert_eq!(revert_highlights(&mut tree, &settings.marker), 0);
    assert_eq!(to_html(&tree), once);
    assert_eq!(tree.revision(), revision);
}

#[test]
fn case_insensitive_match_keeps_source_casing() {
    let mut tree = parse_page("Party Hard");
    let settings = SearchSettings::default();
    let mut controller = SearchController::new(settings.clone());

    controller.set_query(&mut tree, "ART");

    assert_eq!(marker_texts(&tree, &settings), vec!["art"]);
    assert_eq!(
        to_html(&tree),
        "<p>P<mark class=\"highlight\">art</mark>y Hard</p>"
    );
}

#[test]
fn exclusions_are_respected() {
    let mut tree = portfolio();
    let settings = SearchSettings::default();
    let mut controller = SearchController::new(settings.clone());

    controller.set_query(&mut tree, "art");

    for marker in find_markers(&tree, &settings.marker) {
        let mut ancestor = tree.parent(marker);
        while let Some(node) = ancestor {
            assert_ne!(tree.tag(node), Some("script"));
            assert!(!tree.has_class(node, "search-container"));
            ancestor = tree.parent(node);
        }
    }
    assert!(to_html(&tree).contains("<nav class=\"search-container\">art</nav>"));
    assert!(to_html(&tree).contains("<script>window.art = true;</script>"));
}

#[test]
fn exactly_one_scroll_to_first_match_per_query() {
    let mut tree = parse_page("one art\n\ntwo art\n\nthree art");
    let mut controller = SearchController::new(SearchSettings::default());
    let mut viewport = RecordingViewport::default();
    let now = Instant::now();

    controller.set_query_at(&mut tree, "art", now);
    let first = find_markers(&tree, &controller.settings().marker)[0];
    assert_eq!(controller.match_count(), 3);

    let fired = controller.run_due_scrolls(&tree, &mut viewport, now + Duration::from_secs(1));
    assert_eq!(fired, 1);
    assert_eq!(viewport.scrolled, vec![first]);

    // Nothing left to fire.
    let fired = controller.run_due_scrolls(&tree, &mut viewport, now + Duration::from_secs(2));
    assert_eq!(fired, 0);
}

#[test]
fn clear_restores_everything() {
    let mut tree = portfolio();
    let before = to_html(&tree);
    let mut controller = SearchController::new(SearchSettings::default());

    controller.set_query(&mut tree, "x");
    controller.set_query(&mut tree, "art");
    controller.clear(&mut tree);

    assert_eq!(controller.state(), SearchState::Idle);
    assert!(find_markers(&tree, &controller.settings().marker).is_empty());
    assert_eq!(to_html(&tree), before);
}

#[test]
fn rapid_requery_leaves_only_latest_markers() {
    let mut tree = portfolio();
    let settings = SearchSettings::default();
    let mut controller = SearchController::new(settings.clone());

    controller.set_query(&mut tree, "a");
    controller.set_query(&mut tree, "b");

    let texts = marker_texts(&tree, &settings);
    assert!(!texts.is_empty());
    assert!(texts.iter().all(|t| t.eq_ignore_ascii_case("b")));
    assert_eq!(controller.query(), "b");
}

#[test]
fn typing_incrementally_never_corrupts_text() {
    let mut tree = portfolio();
    let original = to_html(&tree);
    let original_text = all_text(&tree);
    let mut controller = SearchController::new(SearchSettings::default());

    let typed = "party planner";
    for end in 1..=typed.len() {
        controller.set_query(&mut tree, &typed[..end]);
        assert_eq!(
            all_text(&tree),
            original_text,
            "after typing {:?}",
            &typed[..end]
        );
    }
    assert_eq!(controller.match_count(), 1);

    for end in (0..typed.len()).rev() {
        controller.set_query(&mut tree, &typed[..end]);
    }
    assert_eq!(controller.state(), SearchState::Idle);
    assert_eq!(to_html(&tree), original);
}

#[test]
fn empty_query_while_idle_does_not_mutate() {
    let mut tree = portfolio();
    let revision = tree.revision();
    let mut controller = SearchController::new(SearchSettings::default());

    controller.set_query(&mut tree, "");
    controller.clear(&mut tree);

    assert_eq!(controller.state(), SearchState::Idle);
    assert_eq!(tree.revision(), revision);
}

#[test]
fn stray_markers_are_cleared_on_next_query() {
    let mut tree = parse_page("left right");
    let root = tree.root();
    let stray = tree.append_element(root, "mark", &["highlight"]);
    tree.append_text(stray, "stray");
    let mut controller = SearchController::new(SearchSettings::default());

    controller.set_query(&mut tree, "right");

    assert_eq!(
        to_html(&tree),
        "<p>left <mark class=\"highlight\">right</mark></p>stray"
    );
}

#[test]
fn navigation_clears_before_the_next_page_is_searched() {
    let mut first = parse_page("art on page one");
    let mut second = parse_page("art on page two");
    let mut controller = SearchController::new(SearchSettings::default());

    controller.set_query(&mut first, "art");
    controller.on_navigate(&mut first);
    assert!(find_markers(&first, &controller.settings().marker).is_empty());

    controller.set_query(&mut second, "art");
    assert_eq!(controller.match_count(), 1);
    assert!(find_markers(&first, &controller.settings().marker).is_empty());
}
