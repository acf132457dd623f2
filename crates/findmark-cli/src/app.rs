use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use findmark_engine::{NodeId, PageView, SearchController, SearchSettings, SearchState, SiteMap, io};
use ratatui::widgets::ListState;

use crate::layout::{PageLayout, Viewport};

pub struct App {
    pages_path: PathBuf,
    site: SiteMap,
    pub page_list_state: ListState,
    page: Option<PageView>,
    load_error: Option<String>,
    search: SearchController<NodeId>,
    search_open: bool,
    input: String,
    viewport: Viewport,
    layout_revision: Option<u64>,
}

impl App {
    pub fn new(pages_path: PathBuf, settings: SearchSettings) -> Result<Self> {
        let site = io::build_site_map(&pages_path)?;

        let mut app = Self {
            pages_path,
            site,
            page_list_state: ListState::default(),
            page: None,
            load_error: None,
            search: SearchController::new(settings),
            search_open: false,
            input: String::new(),
            viewport: Viewport::default(),
            layout_revision: None,
        };

        // Start on the home page if there is one
        if !app.site.is_empty() {
            let start = app.site.position("/").unwrap_or(0);
            app.select(start);
        }

        Ok(app)
    }

    pub fn site(&self) -> &SiteMap {
        &self.site
    }

    pub fn page(&self) -> Option<&PageView> {
        self.page.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn current_route(&self) -> Option<&str> {
        self.page_list_state
            .selected()
            .and_then(|i| self.site.nth(i))
            .map(|p| p.route())
    }

    pub fn search(&self) -> &SearchController<NodeId> {
        &self.search
    }

    pub fn search_open(&self) -> bool {
        self.search_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn next_page(&mut self) {
        if self.site.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(i) => (i + 1) % self.site.len(),
            None => 0,
        };
        self.select(i);
    }

    pub fn previous_page(&mut self) {
        if self.site.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(0) | None => self.site.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    /// Navigate to the page at `index`. The outgoing page is cleared of
    /// highlights and the query is dropped before the new page loads.
    pub fn select(&mut self, index: usize) {
        if let Some(page) = self.page.as_mut() {
            self.search.on_navigate(page.tree_mut());
        }
        self.input.clear();
        self.search_open = false;
        self.page_list_state.select(Some(index));
        self.viewport.reset();
        self.layout_revision = None;

        let Some(page) = self.site.nth(index) else {
            self.page = None;
            return;
        };
        log::info!("navigating to {}", page.route());
        match io::load_page_view(page, &self.pages_path) {
            Ok(view) => {
                self.page = Some(view);
                self.load_error = None;
            }
            Err(e) => {
                log::warn!("failed to load {}: {e}", page.route());
                self.page = None;
                self.load_error = Some(format!("Error reading page: {e}"));
            }
        }
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    /// Keep the current highlights and return to browsing.
    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn type_char(&mut self, c: char) {
        self.input.push(c);
        self.apply_query();
    }

    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.apply_query();
        }
    }

    pub fn clear_input(&mut self) {
        if !self.input.is_empty() {
            self.input.clear();
            self.apply_query();
        }
    }

    /// Esc: clear the query, or close the bar when it is already empty.
    pub fn escape(&mut self) {
        if self.input.is_empty() {
            self.search_open = false;
        } else {
            self.clear_input();
        }
    }

    fn apply_query(&mut self) {
        let Some(page) = self.page.as_mut() else {
            return;
        };
        page.set_search_text(&self.input);
        self.search.set_query(page.tree_mut(), &self.input);
        log::debug!(
            "query {:?}: {} matches",
            self.search.query(),
            self.search.match_count()
        );
    }

    pub fn scroll_content(&mut self, delta: isize) {
        self.viewport.scroll_by(delta);
    }

    /// Lay the page out again if it changed, sized to `height` lines.
    pub fn sync_layout(&mut self, height: usize) {
        self.viewport.set_height(height);
        let Some(page) = self.page.as_ref() else {
            if self.layout_revision.take().is_some() {
                self.viewport.set_layout(PageLayout::default());
            }
            return;
        };
        let revision = page.tree().revision();
        if self.layout_revision != Some(revision) {
            let layout = PageLayout::build(
                page.tree(),
                page.content(),
                &self.search.settings().marker,
            );
            self.viewport.set_layout(layout);
            self.layout_revision = Some(revision);
        }
    }

    /// Fire scrolls that are due. Only call once the layout is current.
    pub fn run_due_scrolls(&mut self, now: Instant) -> usize {
        let Some(page) = self.page.as_ref() else {
            return 0;
        };
        self.search.run_due_scrolls(page.tree(), &mut self.viewport, now)
    }

    pub fn next_scroll_due(&self) -> Option<Instant> {
        self.search.next_scroll_due()
    }

    pub fn status(&self) -> String {
        match self.search.state() {
            SearchState::Idle => String::new(),
            SearchState::Active => match self.search.match_count() {
                0 => format!("no matches for \"{}\"", self.search.query()),
                1 => format!("1 match for \"{}\"", self.search.query()),
                n => format!("{n} matches for \"{}\"", self.search.query()),
            },
        }
    }
}
