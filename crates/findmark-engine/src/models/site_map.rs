use std::collections::BTreeMap;

use super::Page;

/// In-memory route table of discovered pages.
///
/// Uses BTreeMap for automatic sorted ordering by route, so `/` comes first.
#[derive(Debug, Default)]
pub struct SiteMap {
    pages: BTreeMap<String, Page>,
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page, replacing any page already on the same route
    ///
    /// Returns the page that was replaced
    pub fn add_page(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.route().to_string(), page)
    }

    /// All pages, sorted by route
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Page at `index` in route order
    pub fn nth(&self, index: usize) -> Option<&Page> {
        self.pages.values().nth(index)
    }

    /// Index of `route` in route order
    pub fn position(&self, route: &str) -> Option<usize> {
        self.pages.keys().position(|r| r == route)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
