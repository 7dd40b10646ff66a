//! Accumulated multi-search results for a single query.
//!
//! TMDB multi-search pages mix movies, TV and people. Only watchable
//! kinds are shown, so a filtered upstream page rarely lines up with a
//! UI page boundary. The buffer concatenates filtered upstream pages
//! in fetch order and serves any UI page as a window over the
//! accumulation. It belongs to exactly one query string; a different
//! query resets it completely.

use crate::paging;
use crate::types::{CatalogPage, MediaItem, LOCAL_PAGE_SIZE};

#[derive(Debug, Default)]
pub struct SearchBuffer {
    query: String,
    items: Vec<MediaItem>,
    /// Next upstream page to fetch, 1-based.
    next_page: u32,
    /// Upstream page count as of the latest response.
    total_pages: u32,
    /// Upstream result count as of the latest response, pre-filter.
    total_results: u64,
}

impl SearchBuffer {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            items: Vec::new(),
            next_page: 1,
            total_pages: 1,
            total_results: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Next upstream page the buffer needs, 1-based.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Drop all accumulated state and bind the buffer to `query`.
    pub fn reset_for(&mut self, query: &str) {
        self.query = query.to_string();
        self.items.clear();
        self.next_page = 1;
        self.total_pages = 1;
        self.total_results = 0;
    }

    /// Merge one upstream response: keep watchable kinds, advance the
    /// cursor, and take the upstream's totals as authoritative. The
    /// totals are overwritten, not maxed; TMDB may revise them between
    /// calls.
    pub fn absorb(&mut self, page: CatalogPage) {
        self.items
            .extend(page.items.into_iter().filter(|i| i.kind.is_watchable()));
        self.next_page += 1;
        self.total_pages = page.total_pages.max(1);
        self.total_results = page.total_results;
    }

    /// Whether upstream still has pages the buffer has not fetched.
    pub fn has_more(&self) -> bool {
        self.next_page <= self.total_pages
    }

    /// Whether the buffer can fully serve `local_page` without fetching.
    pub fn is_filled_to(&self, target_items: usize) -> bool {
        self.items.len() >= target_items
    }

    /// The items for `local_page`, possibly shorter than a full page.
    pub fn window(&self, local_page: u32) -> Vec<MediaItem> {
        let start = (local_page.max(1) as usize - 1) * LOCAL_PAGE_SIZE;
        paging::window(&self.items, start, LOCAL_PAGE_SIZE)
    }

    /// Result-count estimate for the UI.
    ///
    /// The true post-filter total is unknown until upstream is
    /// exhausted, so while pages remain this claims at least one result
    /// beyond the current page, which keeps the Next button alive. Once
    /// exhausted it reports the exact accumulated count, which may be
    /// lower than an earlier estimate; callers must tolerate the
    /// shrink.
    pub fn estimated_total(&self, local_page: u32) -> u64 {
        if self.has_more() {
            (self.items.len() as u64).max(local_page as u64 * LOCAL_PAGE_SIZE as u64 + 1)
        } else {
            self.items.len() as u64
        }
    }

    /// Highest local page the accumulated items can serve.
    pub fn max_local_page(&self) -> u32 {
        paging::total_local_pages(self.items.len() as u64, LOCAL_PAGE_SIZE)
    }
}
