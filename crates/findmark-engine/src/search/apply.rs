use crate::tree::{Fragment, RenderTree};

use super::{MarkerStyle, MatchSpan, QueryMatcher, SearchSettings, eligible_leaves};

/// Result of one highlight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome<Id> {
    /// Leaves that were split into plain text and markers.
    pub leaves: usize,
    /// Markers created, one per match.
    pub markers: usize,
    /// First marker in document order, the scroll target.
    pub first_marker: Option<Id>,
}

impl<Id> Default for ApplyOutcome<Id> {
    fn default() -> Self {
        Self {
            leaves: 0,
            markers: 0,
            first_marker: None,
        }
    }
}

/// Split `text` around `spans` into plain text and marker fragments.
///
/// Marker content is the source slice, so original casing survives. Empty
/// plain runs are dropped.
pub fn split_fragments(text: &str, spans: &[MatchSpan], marker: &MarkerStyle) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            fragments.push(Fragment::text(&text[cursor..span.start]));
        }
        fragments.push(marker.fragment(&text[span.start..span.end]));
        cursor = span.end;
    }
    if cursor < text.len() {
        fragments.push(Fragment::text(&text[cursor..]));
    }
    fragments
}

/// Wrap every match of `matcher` in the eligible leaves of `tree`.
///
/// Leaves are collected before any mutation, so the walk never observes its
/// own markers.
pub fn apply_highlights<T: RenderTree>(
    tree: &mut T,
    matcher: &QueryMatcher,
    settings: &SearchSettings,
) -> ApplyOutcome<T::Id> {
    let pending: Vec<(T::Id, Vec<Fragment>)> = eligible_leaves(tree, settings)
        .filter_map(|leaf| {
            let text = tree.text(leaf)?;
            let spans = matcher.spans(text);
            if spans.is_empty() {
                return None;
            }
            Some((leaf, split_fragments(text, &spans, &settings.marker)))
        })
        .collect();

    let mut outcome = ApplyOutcome::default();
    for (leaf, fragments) in pending {
        let new_ids = tree.replace_with(leaf, fragments);
        for id in new_ids {
            if settings.marker.is_marker(tree, id) {
                outcome.markers += 1;
                outcome.first_marker.get_or_insert(id);
            }
        }
        outcome.leaves += 1;
    }

    log::debug!(
        "highlighted {} matches across {} leaves",
        outcome.markers,
        outcome.leaves
    );
    outcome
}
