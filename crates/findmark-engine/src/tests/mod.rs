use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::tree::{DocTree, NodeId, RenderTree};

/// Create a temporary pages directory
pub fn create_test_pages_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test markdown file with content
pub fn create_test_file(pages_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = pages_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Body with one paragraph per entry in `paragraphs`.
pub fn paragraphs(paragraphs: &[&str]) -> (DocTree, Vec<NodeId>) {
    let mut tree = DocTree::new();
    let root = tree.root();
    let ids = paragraphs
        .iter()
        .map(|text| {
            let p = tree.append_element(root, "p", &[]);
            tree.append_text(p, text);
            p
        })
        .collect();
    (tree, ids)
}
