//! Pages rendered into [`DocTree`]s.
//!
//! A page is the navigation bar (holding the live search text inside the
//! search container) followed by the markdown content in `main`.

pub mod html;
pub mod markdown;

pub use html::{node_to_html, to_html};
pub use markdown::{append_markdown, parse_page};

use crate::tree::{DocTree, NodeId, RenderTree};

/// Class of the navigation bar's search widget. Text under it is never
/// searched.
pub const SEARCH_CONTAINER_CLASS: &str = "search-container";

/// One rendered page: chrome plus content.
#[derive(Debug, Clone)]
pub struct PageView {
    tree: DocTree,
    search_input: NodeId,
    content: NodeId,
}

impl PageView {
    pub fn from_markdown(markdown: &str) -> Self {
        let mut tree = DocTree::new();
        let root = tree.root();

        let nav = tree.append_element(root, "nav", &[]);
        let search = tree.append_element(nav, "div", &[SEARCH_CONTAINER_CLASS]);
        let input = tree.append_element(search, "div", &["search-input"]);
        let search_input = tree.append_text(input, "");

        let content = tree.append_element(root, "main", &[]);
        append_markdown(&mut tree, content, markdown);

        Self {
            tree,
            search_input,
            content,
        }
    }

    pub fn tree(&self) -> &DocTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocTree {
        &mut self.tree
    }

    /// The `main` element holding the page content.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// Mirror what the user typed into the search widget.
    pub fn set_search_text(&mut self, text: &str) {
        if self.tree.text(self.search_input) != Some(text) {
            self.tree.set_text(self.search_input, text);
        }
    }

    pub fn search_text(&self) -> &str {
        self.tree.text(self.search_input).unwrap_or_default()
    }
}
