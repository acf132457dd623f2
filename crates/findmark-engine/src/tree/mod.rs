//! Render tree capability interface.
//!
//! The search engine never owns the tree it searches. Whoever renders the page
//! implements [`RenderTree`] and hands the engine a `&mut` borrow for the
//! duration of one search pass. The engine only ever rewrites leaf-level text
//! structure through [`RenderTree::replace_with`] and [`RenderTree::set_text`].
//!
//! [`DocTree`] is the in-memory implementation used by the CLI and the tests.

pub mod doc_tree;

pub use doc_tree::{DocTree, NodeData, NodeId};

use std::fmt::Debug;

/// New structure handed to [`RenderTree::replace_with`].
///
/// The collaborator materializes fragments into real nodes in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Element {
        tag: String,
        classes: Vec<String>,
        children: Vec<Fragment>,
    },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text(text.into())
    }
}

/// Traversable, mutable document tree supplied by the rendering collaborator.
pub trait RenderTree {
    /// Node handle. Must stay comparable after the node is removed so that a
    /// captured reference can be checked with [`RenderTree::contains`].
    type Id: Copy + Eq + Debug;

    fn root(&self) -> Self::Id;

    fn parent(&self, node: Self::Id) -> Option<Self::Id>;

    /// Children in document order. Empty for text leaves.
    fn children(&self, node: Self::Id) -> Vec<Self::Id>;

    /// Tag name for container nodes, `None` for text leaves.
    fn tag(&self, node: Self::Id) -> Option<&str>;

    fn has_class(&self, node: Self::Id, class: &str) -> bool;

    /// Text of a leaf, `None` for containers.
    fn text(&self, node: Self::Id) -> Option<&str>;

    /// Overwrite the text of a leaf. Ignored for containers and dead nodes.
    fn set_text(&mut self, node: Self::Id, text: &str);

    /// Whether `node` is still attached to this tree.
    fn contains(&self, node: Self::Id) -> bool;

    /// Replace `node` in place with `fragments`, returning the ids of the new
    /// top-level nodes in order. An empty slice removes `node`.
    fn replace_with(&mut self, node: Self::Id, fragments: Vec<Fragment>) -> Vec<Self::Id>;

    fn is_text(&self, node: Self::Id) -> bool {
        self.text(node).is_some()
    }

    /// Sibling immediately before `node`, if any.
    fn previous_sibling(&self, node: Self::Id) -> Option<Self::Id> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Sibling immediately after `node`, if any.
    fn next_sibling(&self, node: Self::Id) -> Option<Self::Id> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == node)?;
        siblings.get(index + 1).copied()
    }

    /// Concatenated text of every leaf under `node` in document order.
    fn text_content(&self, node: Self::Id) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text(current) {
                out.push_str(text);
            } else {
                stack.extend(self.children(current).into_iter().rev());
            }
        }
        out
    }
}

/// Smoothness hint for [`ScrollIntoView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Where the target should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// "Scroll node into view" primitive supplied by the rendering collaborator.
pub trait ScrollIntoView<Id> {
    fn scroll_into_view(&mut self, node: Id, options: ScrollOptions);
}
