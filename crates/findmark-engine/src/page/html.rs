use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::tree::{DocTree, NodeData, NodeId, RenderTree};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Serialize the children of the root as HTML.
pub fn to_html(tree: &DocTree) -> String {
    let mut out = String::new();
    for child in tree.children(tree.root()) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialize one node and its subtree as HTML.
pub fn node_to_html(tree: &DocTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, &mut out);
    out
}

fn write_node(tree: &DocTree, node: NodeId, out: &mut String) {
    match tree.data(node) {
        Some(NodeData::Text(text)) => out.push_str(&encode_text(text)),
        Some(NodeData::Element { tag, classes }) => {
            out.push('<');
            out.push_str(tag);
            if !classes.is_empty() {
                out.push_str(" class=\"");
                out.push_str(&encode_double_quoted_attribute(&classes.join(" ")));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for child in tree.children(node) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => {}
    }
}
