use crate::tree::{Fragment, RenderTree};

use super::MarkerStyle;

/// Every highlight marker in the tree, in document order.
///
/// This walks the whole tree, excluded containers included, so markers left
/// behind by anything are found.
pub fn find_markers<T: RenderTree>(tree: &T, marker: &MarkerStyle) -> Vec<T::Id> {
    let mut found = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if marker.is_marker(tree, node) {
            found.push(node);
        }
        stack.extend(tree.children(node).into_iter().rev());
    }
    found
}

/// Unwrap every marker back into plain text, merged with its text neighbours.
///
/// Returns how many markers were removed. With no markers present the tree is
/// not touched.
pub fn revert_highlights<T: RenderTree>(tree: &mut T, marker: &MarkerStyle) -> usize {
    let mut reverted = 0;
    for node in find_markers(tree, marker) {
        // Nested inside a marker unwrapped earlier in this loop.
        if !tree.contains(node) {
            continue;
        }
        let text = tree.text_content(node);
        let replaced = tree.replace_with(node, vec![Fragment::Text(text)]);
        let Some(&leaf) = replaced.first() else {
            log::warn!("marker {node:?} could not be replaced");
            continue;
        };
        merge_text_neighbours(tree, leaf);
        reverted += 1;
    }
    if reverted > 0 {
        log::debug!("reverted {reverted} highlight markers");
    }
    reverted
}

/// Fold adjacent text siblings into `leaf`; drop it if it ends up empty.
fn merge_text_neighbours<T: RenderTree>(tree: &mut T, leaf: T::Id) {
    let original = tree.text(leaf).unwrap_or_default().to_string();
    let mut merged = original.clone();

    while let Some(prev) = tree.previous_sibling(leaf).filter(|&p| tree.is_text(p)) {
        merged.insert_str(0, tree.text(prev).unwrap_or_default());
        tree.replace_with(prev, Vec::new());
    }
    while let Some(next) = tree.next_sibling(leaf).filter(|&n| tree.is_text(n)) {
        merged.push_str(tree.text(next).unwrap_or_default());
        tree.replace_with(next, Vec::new());
    }

    if merged.is_empty() {
        tree.replace_with(leaf, Vec::new());
    } else if merged != original {
        tree.set_text(leaf, &merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{QueryMatcher, SearchSettings, apply_highlights};
    use crate::tree::DocTree;
    use pretty_assertions::assert_eq;

    fn highlighted_paragraph() -> (DocTree, crate::tree::NodeId) {
        let mut tree = DocTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", &[]);
        tree.append_text(p, "P");
        let mark = tree.append_element(p, "mark", &["highlight"]);
        tree.append_text(mark, "art");
        tree.append_text(p, "y Hard");
        (tree, p)
    }

    #[test]
    fn finds_markers_inside_excluded_containers_too() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let nav = tree.append_element(root, "nav", &["search-container"]);
        let stray = tree.append_element(nav, "mark", &["highlight"]);
        tree.append_text(stray, "x");

        assert_eq!(find_markers(&tree, &MarkerStyle::default()), vec![stray]);
    }

    #[test]
    fn revert_merges_back_into_one_leaf() {
        let (mut tree, p) = highlighted_paragraph();
        let reverted = revert_highlights(&mut tree, &MarkerStyle::default());

        assert_eq!(reverted, 1);
        let children = tree.children(p);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.text(children[0]), Some("Party Hard"));
    }

    #[test]
    fn revert_without_markers_is_noop() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", &[]);
        tree.append_text(p, "plain");
        let revision = tree.revision();

        assert_eq!(revert_highlights(&mut tree, &MarkerStyle::default()), 0);
        assert_eq!(tree.revision(), revision);
    }

    #[test]
    fn revert_twice_equals_revert_once() {
        let (mut tree, p) = highlighted_paragraph();
        revert_highlights(&mut tree, &MarkerStyle::default());
        let once = tree.children(p);
        let revision = tree.revision();

        assert_eq!(revert_highlights(&mut tree, &MarkerStyle::default()), 0);
        assert_eq!(tree.children(p), once);
        assert_eq!(tree.revision(), revision);
    }

    #[test]
    fn revert_does_not_merge_across_elements() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", &[]);
        tree.append_text(p, "a ");
        let em = tree.append_element(p, "em", &[]);
        tree.append_text(em, "b");
        let mark = tree.append_element(p, "mark", &["highlight"]);
        tree.append_text(mark, "c");

        revert_highlights(&mut tree, &MarkerStyle::default());

        let children = tree.children(p);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.tag(children[1]), Some("em"));
        assert_eq!(tree.text(children[2]), Some("c"));
    }

    #[test]
    fn revert_drops_empty_marker_without_residue() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", &[]);
        tree.append_element(p, "mark", &["highlight"]);

        revert_highlights(&mut tree, &MarkerStyle::default());
        assert!(tree.children(p).is_empty());
    }

    #[test]
    fn revert_handles_nested_markers() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let outer = tree.append_element(root, "mark", &["highlight"]);
        let inner = tree.append_element(outer, "mark", &["highlight"]);
        tree.append_text(inner, "deep");

        assert_eq!(revert_highlights(&mut tree, &MarkerStyle::default()), 1);
        assert!(find_markers(&tree, &MarkerStyle::default()).is_empty());
        assert_eq!(tree.text_content(root), "deep");
    }

    #[test]
    fn apply_then_revert_restores_structure() {
        let mut tree = DocTree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", &[]);
        tree.append_text(p, "Art and party art");
        let before = tree.children(p).len();

        let settings = SearchSettings::default();
        let matcher = QueryMatcher::new("art").unwrap();
        apply_highlights(&mut tree, &matcher, &settings);
        assert_eq!(find_markers(&tree, &settings.marker).len(), 3);

        revert_highlights(&mut tree, &settings.marker);
        let children = tree.children(p);
        assert_eq!(children.len(), before);
        assert_eq!(tree.text(children[0]), Some("Art and party art"));
    }
}
