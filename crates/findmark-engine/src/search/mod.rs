/*!
 * # In-page search and highlight
 *
 * Live substring search over whatever document the caller renders, with every
 * occurrence wrapped in a highlight marker and the first one scrolled into
 * view.
 *
 * ## Pipeline
 *
 * Each query change runs the same sequence, synchronously, against a tree
 * passed in by the caller:
 *
 * 1. **`revert`**: every highlight marker in the tree is unwrapped back into
 *    plain text and merged with its neighbouring text leaves.
 * 2. **`traversal`**: eligible text leaves are enumerated in document order,
 *    skipping `script`/`style`, existing markers and the search UI itself.
 * 3. **`matcher`**: each leaf's text is scanned for case-insensitive literal
 *    occurrences of the query.
 * 4. **`apply`**: leaves with matches are replaced by plain text / marker /
 *    plain text siblings that concatenate back to the original text.
 * 5. **`controller`**: records the query, the match count, and a pending
 *    scroll to the first marker that the caller fires once layout settles.
 *
 * The engine never keeps node references between passes except the pending
 * scroll target, which is re-validated before use.
 */

pub mod apply;
pub mod controller;
pub mod matcher;
pub mod revert;
pub mod traversal;

pub use apply::{ApplyOutcome, apply_highlights};
pub use controller::{PendingScroll, SearchController, SearchState};
pub use matcher::{MatchSpan, QueryMatcher, find_spans};
pub use revert::{find_markers, revert_highlights};
pub use traversal::{EligibleLeaves, eligible_leaves};

use std::time::Duration;

use crate::tree::{Fragment, RenderTree, ScrollOptions};

/// How highlight markers are tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Element tag for markers.
    pub tag: String,
    /// Class that identifies an element as a marker. Markers are found by
    /// `tag` + `class`, never by bookkeeping.
    pub class: String,
    /// Purely decorative classes added after `class`.
    pub extra_classes: Vec<String>,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            tag: "mark".to_string(),
            class: "highlight".to_string(),
            extra_classes: Vec::new(),
        }
    }
}

impl MarkerStyle {
    pub fn is_marker<T: RenderTree>(&self, tree: &T, node: T::Id) -> bool {
        tree.tag(node) == Some(self.tag.as_str()) && tree.has_class(node, &self.class)
    }

    /// Marker wrapping exactly `text`.
    pub fn fragment(&self, text: &str) -> Fragment {
        let mut classes = Vec::with_capacity(1 + self.extra_classes.len());
        classes.push(self.class.clone());
        classes.extend(self.extra_classes.iter().cloned());
        Fragment::Element {
            tag: self.tag.clone(),
            classes,
            children: vec![Fragment::text(text)],
        }
    }
}

/// Containers whose text is never searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    pub tags: Vec<String>,
    pub classes: Vec<String>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            tags: vec!["script".to_string(), "style".to_string()],
            classes: vec!["search-container".to_string()],
        }
    }
}

impl Exclusions {
    pub fn excludes<T: RenderTree>(&self, tree: &T, node: T::Id) -> bool {
        let Some(tag) = tree.tag(node) else {
            return false;
        };
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
            || self.classes.iter().any(|c| tree.has_class(node, c))
    }
}

/// Everything the search pipeline needs to know besides the tree and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub marker: MarkerStyle,
    pub exclusions: Exclusions,
    pub scroll: ScrollOptions,
    /// How long a pending scroll waits before it is due.
    pub scroll_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            marker: MarkerStyle::default(),
            exclusions: Exclusions::default(),
            scroll: ScrollOptions::default(),
            scroll_delay: Duration::from_millis(100),
        }
    }
}
