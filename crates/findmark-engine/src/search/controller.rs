use std::fmt::Debug;
use std::time::Instant;

use crate::tree::{RenderTree, ScrollIntoView, ScrollOptions};

use super::{MarkerStyle, QueryMatcher, SearchSettings, apply_highlights, revert_highlights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No query, no markers.
    #[default]
    Idle,
    /// A non-blank query is recorded; markers may exist.
    Active,
}

/// A deferred scroll to the first marker of a search pass.
///
/// The target is captured when the markers are created and checked again
/// when the scroll runs; a target that has since been removed is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingScroll<Id> {
    pub target: Id,
    pub due: Instant,
    pub options: ScrollOptions,
}

impl<Id: Copy + Eq + Debug> PendingScroll<Id> {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Scroll to the target if it is still a live marker. Returns whether a
    /// scroll was issued.
    pub fn fire<T, V>(&self, tree: &T, marker: &MarkerStyle, viewport: &mut V) -> bool
    where
        T: RenderTree<Id = Id>,
        V: ScrollIntoView<Id> + ?Sized,
    {
        if !tree.contains(self.target) || !marker.is_marker(tree, self.target) {
            log::trace!("scroll target {:?} is gone, skipping", self.target);
            return false;
        }
        viewport.scroll_into_view(self.target, self.options);
        true
    }
}

/// Owns the query and sequences revert-then-apply on every change.
///
/// The tree is passed into each call rather than held, so one controller can
/// serve whatever document is currently on screen.
#[derive(Debug)]
pub struct SearchController<Id> {
    settings: SearchSettings,
    query: String,
    state: SearchState,
    match_count: usize,
    scrolls: Vec<PendingScroll<Id>>,
}

impl<Id: Copy + Eq + Debug> SearchController<Id> {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            query: String::new(),
            state: SearchState::Idle,
            match_count: 0,
            scrolls: Vec::new(),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// The recorded query; empty while idle.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Markers created by the last search pass.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn set_query<T: RenderTree<Id = Id>>(&mut self, tree: &mut T, query: &str) {
        self.set_query_at(tree, query, Instant::now());
    }

    /// [`SearchController::set_query`] with an explicit clock reading.
    pub fn set_query_at<T: RenderTree<Id = Id>>(
        &mut self,
        tree: &mut T,
        query: &str,
        now: Instant,
    ) {
        if self.state == SearchState::Active && self.query == query {
            return;
        }

        revert_highlights(tree, &self.settings.marker);

        let Some(matcher) = QueryMatcher::new(query) else {
            self.reset();
            return;
        };

        let outcome = apply_highlights(tree, &matcher, &self.settings);
        self.query = query.to_string();
        self.state = SearchState::Active;
        self.match_count = outcome.markers;

        if let Some(target) = outcome.first_marker {
            self.scrolls.push(PendingScroll {
                target,
                due: now + self.settings.scroll_delay,
                options: self.settings.scroll,
            });
        }
    }

    /// Remove all markers and forget the query.
    pub fn clear<T: RenderTree<Id = Id>>(&mut self, tree: &mut T) {
        revert_highlights(tree, &self.settings.marker);
        self.reset();
    }

    /// The document is about to be replaced; leave nothing behind in it.
    ///
    /// Pending scrolls are dropped too. Their targets belong to the outgoing
    /// document, and node ids are only meaningful within one tree.
    pub fn on_navigate<T: RenderTree<Id = Id>>(&mut self, tree: &mut T) {
        log::debug!("navigation, clearing search for {:?}", self.query);
        self.clear(tree);
        if !self.scrolls.is_empty() {
            log::trace!("dropping {} pending scrolls", self.scrolls.len());
            self.scrolls.clear();
        }
    }

    /// Earliest due time among pending scrolls.
    pub fn next_scroll_due(&self) -> Option<Instant> {
        self.scrolls.iter().map(|s| s.due).min()
    }

    pub fn pending_scrolls(&self) -> &[PendingScroll<Id>] {
        &self.scrolls
    }

    /// Fire every pending scroll that is due at `now`. Call this after the
    /// tree has been laid out. Returns how many scrolls actually happened.
    pub fn run_due_scrolls<T, V>(&mut self, tree: &T, viewport: &mut V, now: Instant) -> usize
    where
        T: RenderTree<Id = Id>,
        V: ScrollIntoView<Id> + ?Sized,
    {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.scrolls.drain(..).partition(|s| s.is_due(now));
        self.scrolls = waiting;
        let mut fired = 0;
        for scroll in &due {
            if scroll.fire(tree, &self.settings.marker, viewport) {
                fired += 1;
            }
        }
        fired
    }

    fn reset(&mut self) {
        self.query.clear();
        self.state = SearchState::Idle;
        self.match_count = 0;
    }
}
