use slotmap::{SlotMap, new_key_type};

use super::{Fragment, RenderTree};

new_key_type! {
    /// Generational handle into a [`DocTree`]. A removed node's id is never
    /// handed out again, so stale handles are always detectable.
    pub struct NodeId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { tag: String, classes: Vec<String> },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed render tree.
///
/// The root is a `body` element. Every mutation bumps [`DocTree::revision`].
#[derive(Debug, Clone)]
pub struct DocTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    revision: u64,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTree {
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node {
            data: NodeData::Element {
                tag: "body".to_string(),
                classes: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            revision: 0,
        }
    }

    /// Incremented on every structural or text change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 1
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.arena.get(id).map(|n| &n.data)
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        match self.arena.get(id).map(|n| &n.data) {
            Some(NodeData::Element { classes, .. }) => classes.as_slice(),
            _ => &[],
        }
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let data = NodeData::Element {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        };
        self.append(parent, data)
    }

    /// Append a text leaf as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeData::Text(text.to_string()))
    }

    /// `from` and everything below it, in pre-order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First element in pre-order carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.has_class(id, class))
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.arena.insert(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(id);
        }
        self.revision += 1;
        id
    }

    fn materialize(&mut self, fragment: Fragment, parent: NodeId) -> NodeId {
        match fragment {
            Fragment::Text(text) => self.arena.insert(Node {
                data: NodeData::Text(text),
                parent: Some(parent),
                children: Vec::new(),
            }),
            Fragment::Element {
                tag,
                classes,
                children,
            } => {
                let id = self.arena.insert(Node {
                    data: NodeData::Element { tag, classes },
                    parent: Some(parent),
                    children: Vec::new(),
                });
                let child_ids: Vec<_> = children
                    .into_iter()
                    .map(|child| self.materialize(child, id))
                    .collect();
                if let Some(node) = self.arena.get_mut(id) {
                    node.children = child_ids;
                }
                id
            }
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
    }
}

impl RenderTree for DocTree {
    type Id = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match self.arena.get(node).map(|n| &n.data) {
            Some(NodeData::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match self.arena.get(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(Node {
            data: NodeData::Text(existing),
            ..
        }) = self.arena.get_mut(node)
        {
            existing.clear();
            existing.push_str(text);
            self.revision += 1;
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.arena.contains_key(node)
    }

    fn replace_with(&mut self, node: NodeId, fragments: Vec<Fragment>) -> Vec<NodeId> {
        // The root has no siblings to splice into.
        let Some(parent) = self.parent(node) else {
            return Vec::new();
        };
        let Some(index) = self
            .arena
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == node))
        else {
            return Vec::new();
        };

        let new_ids: Vec<_> = fragments
            .into_iter()
            .map(|fragment| self.materialize(fragment, parent))
            .collect();

        if let Some(p) = self.arena.get_mut(parent) {
            p.children.splice(index..=index, new_ids.iter().copied());
        }
        self.remove_subtree(node);
        self.revision += 1;
        new_ids
    }
}
