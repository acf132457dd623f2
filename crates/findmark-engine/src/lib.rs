pub mod io;
pub mod models;
pub mod page;
pub mod search;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::*;
pub use models::{Page, SiteMap};
pub use page::PageView;
pub use search::{SearchController, SearchSettings, SearchState};
pub use tree::{DocTree, Fragment, NodeId, RenderTree, ScrollIntoView, ScrollOptions};
