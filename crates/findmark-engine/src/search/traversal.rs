use crate::tree::RenderTree;

use super::SearchSettings;

/// Lazy pre-order walk over the text leaves that search may touch.
///
/// Subtrees rooted at an excluded container or an existing highlight marker
/// are skipped whole. The iterator borrows the tree, so it cannot outlive a
/// mutation; call [`eligible_leaves`] again to restart.
pub struct EligibleLeaves<'a, T: RenderTree> {
    tree: &'a T,
    settings: &'a SearchSettings,
    stack: Vec<T::Id>,
}

impl<'a, T: RenderTree> EligibleLeaves<'a, T> {
    pub fn new(tree: &'a T, from: T::Id, settings: &'a SearchSettings) -> Self {
        Self {
            tree,
            settings,
            stack: vec![from],
        }
    }

    fn is_skipped_container(&self, node: T::Id) -> bool {
        self.settings.exclusions.excludes(self.tree, node)
            || self.settings.marker.is_marker(self.tree, node)
    }
}

impl<T: RenderTree> Iterator for EligibleLeaves<'_, T> {
    type Item = T::Id;

    fn next(&mut self) -> Option<T::Id> {
        while let Some(node) = self.stack.pop() {
            if self.tree.is_text(node) {
                return Some(node);
            }
            if self.is_skipped_container(node) {
                continue;
            }
            self.stack.extend(self.tree.children(node).into_iter().rev());
        }
        None
    }
}

/// Eligible leaves of the whole tree in document order.
pub fn eligible_leaves<'a, T: RenderTree>(
    tree: &'a T,
    settings: &'a SearchSettings,
) -> EligibleLeaves<'a, T> {
    EligibleLeaves::new(tree, tree.root(), settings)
}
