use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::{Action, Tab};
use crate::arbiter::{RequestArbiter, Stream, Token};
use crate::buffer::SearchBuffer;
use crate::catalog::Catalog;
use crate::event::Event;
use crate::paging;
use crate::types::{MediaDetail, MediaItem, MediaKind, MovieList, SearchKind, TvList, LOCAL_PAGE_SIZE, TMDB_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse, // Tabbed listing / search results
    Detail, // Single movie or show
}

pub struct App {
    pub screen: Screen,
    pub tab: Tab,
    pub movie_list: MovieList,
    pub tv_list: TvList,
    pub search_kind: SearchKind,

    // Search field
    pub query_input: String,
    pub editing_query: bool,
    pub has_searched: bool,
    pub search_error: bool,

    // Visible page state
    pub results: Vec<MediaItem>,
    pub total_results: u64,
    pub page: u32,
    pub selected: usize,
    pub loading: bool,
    /// A page move on the search stream is outstanding; gates
    /// Previous/Next so page requests cannot overlap.
    pub page_transition: bool,
    pub api_error: Option<String>,

    // Detail screen
    pub detail: Option<MediaDetail>,
    pub scroll_offset: usize,

    pub should_quit: bool,

    buffer: SearchBuffer,
    arbiter: RequestArbiter,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(catalog: Arc<dyn Catalog>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            screen: Screen::Browse,
            tab: Tab::default(),
            movie_list: MovieList::default(),
            tv_list: TvList::default(),
            search_kind: SearchKind::default(),

            query_input: String::new(),
            editing_query: false,
            has_searched: false,
            search_error: false,

            results: Vec::new(),
            total_results: 0,
            page: 1,
            selected: 0,
            loading: false,
            page_transition: false,
            api_error: None,

            detail: None,
            scroll_offset: 0,

            should_quit: false,

            buffer: SearchBuffer::new(),
            arbiter: RequestArbiter::new(),
            catalog,
            action_tx,
        }
    }

    /// Start on the search tab with `query` pre-filled. The caller is
    /// expected to follow up with [`Action::SubmitSearch`].
    pub fn prepare_initial_query(&mut self, query: String) {
        self.tab = Tab::Search;
        self.query_input = query;
    }

    /// Local page count derived from the (possibly estimated) total.
    pub fn total_pages(&self) -> u32 {
        paging::total_local_pages(self.total_results, LOCAL_PAGE_SIZE)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Reload,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.editing_query {
            return match key.code {
                KeyCode::Enter => Action::SubmitSearch,
                KeyCode::Esc => Action::ExitQueryMode,
                KeyCode::Backspace => Action::QueryBackspace,
                KeyCode::Char(c) => Action::QueryInput(c),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.screen == Screen::Detail {
                    Action::Back
                } else {
                    Action::Quit
                }
            }
            KeyCode::Tab => Action::NextTab,
            KeyCode::BackTab => Action::PrevTab,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('c') => Action::CycleList,
            KeyCode::Char('/') => Action::EnterQueryMode,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Enter => {
                if self.screen == Screen::Browse && self.tab == Tab::Search && !self.has_searched {
                    Action::EnterQueryMode
                } else {
                    Action::Select
                }
            }
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::Detail => {
                    self.screen = Screen::Browse;
                    self.detail = None;
                    self.scroll_offset = 0;
                }
                Screen::Browse => {
                    self.should_quit = true;
                }
            },

            Action::ScrollUp => match self.screen {
                Screen::Browse => {
                    if self.selected > 0 {
                        self.selected -= 1;
                    }
                }
                Screen::Detail => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
            },
            Action::ScrollDown => match self.screen {
                Screen::Browse => {
                    if !self.results.is_empty() && self.selected < self.results.len() - 1 {
                        self.selected += 1;
                    }
                }
                Screen::Detail => {
                    self.scroll_offset += 1;
                }
            },

            Action::Select => {
                if self.screen == Screen::Browse {
                    if let Some(item) = self.results.get(self.selected) {
                        self.spawn_load_detail(item.kind, item.id);
                    }
                }
            }

            Action::NextTab => self.switch_tab(self.tab.next()),
            Action::PrevTab => self.switch_tab(self.tab.prev()),

            Action::CycleList => {
                match self.tab {
                    Tab::Movies => self.movie_list = self.movie_list.next(),
                    Tab::Tv => self.tv_list = self.tv_list.next(),
                    Tab::Search => self.search_kind = self.search_kind.next(),
                }
                self.page = 1;
                self.selected = 0;
                self.reload_active_tab();
            }

            Action::Reload => self.reload_active_tab(),

            Action::NextPage => {
                let next = self.page + 1;
                if next <= self.total_pages() {
                    self.update(Action::GoToPage(next));
                }
            }
            Action::PrevPage => {
                if self.page > 1 {
                    self.update(Action::GoToPage(self.page - 1));
                }
            }
            Action::GoToPage(n) => self.go_to_page(n.max(1)),

            Action::EnterQueryMode => {
                if self.tab != Tab::Search {
                    self.switch_tab(Tab::Search);
                }
                self.editing_query = true;
            }
            Action::ExitQueryMode => {
                self.editing_query = false;
            }
            Action::QueryInput(c) => {
                self.query_input.push(c);
                self.search_error = false;
            }
            Action::QueryBackspace => {
                self.query_input.pop();
            }
            Action::SubmitSearch => {
                self.editing_query = false;
                let query = self.query_input.trim().to_string();
                if query.is_empty() {
                    // Never reaches the network.
                    self.search_error = true;
                    self.has_searched = false;
                    self.results.clear();
                    self.total_results = 0;
                    return;
                }
                self.search_error = false;
                self.has_searched = true;
                if self.tab != Tab::Search {
                    self.tab = Tab::Search;
                }
                self.page = 1;
                self.start_search();
            }

            Action::ListLoaded { page, token } => {
                if !self.arbiter.is_current(Stream::Browse, token) {
                    tracing::trace!(token, "discarding stale list response");
                    return;
                }
                let offset =
                    paging::offset_in_upstream(self.page, LOCAL_PAGE_SIZE, TMDB_PAGE_SIZE);
                self.results = paging::window(&page.items, offset, LOCAL_PAGE_SIZE);
                self.total_results = page.total_results;
                self.selected = 0;
                self.loading = false;
            }

            Action::SearchLoaded { page, token } => {
                if !self.arbiter.is_current(Stream::Search, token) {
                    tracing::trace!(token, "discarding stale search response");
                    return;
                }
                let offset =
                    paging::offset_in_upstream(self.page, LOCAL_PAGE_SIZE, TMDB_PAGE_SIZE);
                self.results = paging::window(&page.items, offset, LOCAL_PAGE_SIZE);
                self.total_results = page.total_results;
                self.selected = 0;
                self.loading = false;
                self.page_transition = false;
            }

            Action::SearchPageFetched { page, token } => {
                if !self.arbiter.is_current(Stream::Search, token) {
                    tracing::trace!(token, "discarding stale search page");
                    return;
                }
                self.buffer.absorb(page);
                self.commit_search_window();

                // Background continuation: keep filling towards the
                // requested page under the same token. A newer request
                // invalidates the token and the chain stops by itself.
                let target = self.page as usize * LOCAL_PAGE_SIZE;
                if !self.buffer.is_filled_to(target) && self.buffer.has_more() {
                    self.spawn_multi_fetch(token);
                }
            }

            Action::DetailLoaded { detail, token } => {
                if !self.arbiter.is_current(Stream::Detail, token) {
                    tracing::trace!(token, "discarding stale detail response");
                    return;
                }
                self.detail = Some(*detail);
                self.screen = Screen::Detail;
                self.scroll_offset = 0;
                self.loading = false;
            }

            Action::FetchFailed {
                stream,
                token,
                message,
            } => {
                if !self.arbiter.is_current(stream, token) {
                    return;
                }
                // Known-empty beats partial or stale data.
                if matches!(stream, Stream::Browse | Stream::Search) {
                    self.results.clear();
                    self.total_results = 0;
                }
                self.loading = false;
                self.page_transition = false;
                self.api_error = Some(message);
            }

            Action::OpenInBrowser => {
                let target = match self.screen {
                    Screen::Detail => self.detail.as_ref().map(|d| (d.kind, d.id)),
                    Screen::Browse => self.results.get(self.selected).map(|i| (i.kind, i.id)),
                };
                if let Some((kind, id)) = target {
                    let _ = open::that(self.catalog.web_url(kind, id));
                }
            }

            Action::None => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        // Responses already in flight for the old tab must not land.
        self.arbiter.begin(Stream::Browse);
        self.arbiter.begin(Stream::Search);

        self.tab = tab;
        self.page = 1;
        self.selected = 0;
        self.api_error = None;
        self.search_error = false;
        self.page_transition = false;
        self.reload_active_tab();
    }

    fn reload_active_tab(&mut self) {
        if self.screen != Screen::Browse {
            return;
        }
        match self.tab {
            Tab::Movies | Tab::Tv => self.load_list_page(),
            Tab::Search => {
                if self.has_searched && !self.query_input.trim().is_empty() {
                    self.start_search();
                } else {
                    self.results.clear();
                    self.total_results = 0;
                    self.loading = false;
                }
            }
        }
    }

    fn go_to_page(&mut self, n: u32) {
        // One outstanding page move per stream at a time.
        if self.tab == Tab::Search && self.page_transition {
            return;
        }
        if self.tab == Tab::Search && self.search_kind == SearchKind::Multi {
            // Past the end of an exhausted buffer there is nothing to go to.
            if n > self.buffer.max_local_page() && !self.buffer.has_more() {
                return;
            }
        }
        self.page = n;
        self.selected = 0;
        match self.tab {
            Tab::Movies | Tab::Tv => self.load_list_page(),
            Tab::Search => {
                if self.has_searched && !self.query_input.trim().is_empty() {
                    self.start_search();
                }
            }
        }
    }

    /// List mode: local pages address directly into upstream pages, so
    /// each request is a single translated fetch with no accumulation.
    fn load_list_page(&mut self) {
        let token = self.arbiter.begin(Stream::Browse);
        self.loading = true;
        self.api_error = None;

        let upstream = paging::upstream_page(self.page, LOCAL_PAGE_SIZE, TMDB_PAGE_SIZE);
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);

        match self.tab {
            Tab::Tv => {
                let list = self.tv_list;
                tokio::spawn(async move {
                    tracing::debug!(?list, upstream, "loading tv page");
                    match catalog.tv_list(list, upstream).await {
                        Ok(page) => {
                            tx.send(Action::ListLoaded { page, token }).ok();
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "tv list fetch failed");
                            tx.send(Action::FetchFailed {
                                stream: Stream::Browse,
                                token,
                                message: "Failed to load TV shows. Check your TMDB credentials."
                                    .to_string(),
                            })
                            .ok();
                        }
                    }
                });
            }
            _ => {
                let list = self.movie_list;
                tokio::spawn(async move {
                    tracing::debug!(?list, upstream, "loading movie page");
                    match catalog.movie_list(list, upstream).await {
                        Ok(page) => {
                            tx.send(Action::ListLoaded { page, token }).ok();
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "movie list fetch failed");
                            tx.send(Action::FetchFailed {
                                stream: Stream::Browse,
                                token,
                                message: "Failed to load movies. Check your TMDB credentials."
                                    .to_string(),
                            })
                            .ok();
                        }
                    }
                });
            }
        }
    }

    fn start_search(&mut self) {
        match self.search_kind {
            SearchKind::Multi => self.start_multi_search(),
            kind => self.start_single_search(kind),
        }
    }

    /// Combined search: serve the page from the accumulation buffer,
    /// fetching upstream pages only when the buffer is short.
    fn start_multi_search(&mut self) {
        let query = self.query_input.trim().to_string();
        let token = self.arbiter.begin(Stream::Search);
        self.loading = true;
        self.page_transition = true;
        self.api_error = None;

        if self.buffer.query() != query {
            self.buffer.reset_for(&query);
        }

        let target = self.page as usize * LOCAL_PAGE_SIZE;
        if self.buffer.is_filled_to(target) || !self.buffer.has_more() {
            // Already have everything this page can show.
            self.commit_search_window();
        } else {
            self.spawn_multi_fetch(token);
        }
    }

    fn spawn_multi_fetch(&self, token: Token) {
        let query = self.buffer.query().to_string();
        let upstream = self.buffer.next_page();
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);

        tokio::spawn(async move {
            tracing::debug!(query, upstream, token, "fetching multi-search page");
            match catalog.search(SearchKind::Multi, &query, upstream).await {
                Ok(page) => {
                    tx.send(Action::SearchPageFetched { page, token }).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "multi-search fetch failed");
                    tx.send(Action::FetchFailed {
                        stream: Stream::Search,
                        token,
                        message: "Failed to search. Check your TMDB credentials.".to_string(),
                    })
                    .ok();
                }
            }
        });
    }

    /// Commit whatever the buffer can currently serve for the active
    /// page. Called after every buffer mutation and on buffer hits.
    fn commit_search_window(&mut self) {
        let exhausted = !self.buffer.has_more();
        if exhausted && self.page > self.buffer.max_local_page() {
            self.page = self.buffer.max_local_page();
        }

        self.results = self.buffer.window(self.page);
        self.total_results = self.buffer.estimated_total(self.page);
        self.selected = 0;
        self.loading = false;
        // Keep gating Previous/Next until the page has something to
        // show or upstream has nothing more to give.
        if !self.results.is_empty() || exhausted {
            self.page_transition = false;
        }
    }

    /// Single-kind search pages are directly addressable upstream, so
    /// this behaves exactly like list mode.
    fn start_single_search(&mut self, kind: SearchKind) {
        let query = self.query_input.trim().to_string();
        let token = self.arbiter.begin(Stream::Search);
        self.loading = true;
        self.page_transition = true;
        self.api_error = None;

        let upstream = paging::upstream_page(self.page, LOCAL_PAGE_SIZE, TMDB_PAGE_SIZE);
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);

        tokio::spawn(async move {
            tracing::debug!(query, upstream, ?kind, "fetching single-kind search page");
            match catalog.search(kind, &query, upstream).await {
                Ok(page) => {
                    tx.send(Action::SearchLoaded { page, token }).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search fetch failed");
                    tx.send(Action::FetchFailed {
                        stream: Stream::Search,
                        token,
                        message: "Failed to search. Check your TMDB credentials.".to_string(),
                    })
                    .ok();
                }
            }
        });
    }

    fn spawn_load_detail(&mut self, kind: MediaKind, id: u64) {
        if !kind.is_watchable() {
            return;
        }
        let token = self.arbiter.begin(Stream::Detail);
        self.loading = true;

        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);

        tokio::spawn(async move {
            let result = match kind {
                MediaKind::Tv => catalog.tv_detail(id).await,
                _ => catalog.movie_detail(id).await,
            };
            match result {
                Ok(detail) => {
                    tx.send(Action::DetailLoaded {
                        detail: Box::new(detail),
                        token,
                    })
                    .ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, id, "detail fetch failed");
                    tx.send(Action::FetchFailed {
                        stream: Stream::Detail,
                        token,
                        message: "Failed to load details.".to_string(),
                    })
                    .ok();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelError;
    use crate::types::CatalogPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn item(id: u64, kind: MediaKind) -> MediaItem {
        MediaItem {
            id,
            kind,
            title: format!("item {id}"),
            release_date: None,
            popularity: 1.0,
        }
    }

    fn movie_page(ids: std::ops::Range<u64>, total_pages: u32, total_results: u64) -> CatalogPage {
        CatalogPage {
            items: ids.map(|id| item(id, MediaKind::Movie)).collect(),
            page: 0,
            total_pages,
            total_results,
        }
    }

    /// Responses keyed by endpoint and page; a missing key is a
    /// transport error. Calls are recorded in order.
    #[derive(Debug, Default)]
    struct ScriptedCatalog {
        list_pages: HashMap<u32, CatalogPage>,
        search_pages: HashMap<(String, String, u32), CatalogPage>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedCatalog {
        fn recorded_calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }

        fn with_search_page(
            mut self,
            kind: SearchKind,
            query: &str,
            page: u32,
            response: CatalogPage,
        ) -> Self {
            self.search_pages
                .insert((kind.as_api_str().into(), query.into(), page), response);
            self
        }

        fn with_list_page(mut self, page: u32, response: CatalogPage) -> Self {
            self.list_pages.insert(page, response);
            self
        }
    }

    #[async_trait]
    impl Catalog for ScriptedCatalog {
        async fn movie_list(&self, list: MovieList, page: u32) -> crate::error::Result<CatalogPage> {
            self.calls
                .lock()
                .unwrap()
                .push((format!("movie/{}", list.as_api_str()), page));
            self.list_pages
                .get(&page)
                .cloned()
                .ok_or_else(|| ReelError::Api("no scripted response".into()))
        }

        async fn tv_list(&self, list: TvList, page: u32) -> crate::error::Result<CatalogPage> {
            self.calls
                .lock()
                .unwrap()
                .push((format!("tv/{}", list.as_api_str()), page));
            self.list_pages
                .get(&page)
                .cloned()
                .ok_or_else(|| ReelError::Api("no scripted response".into()))
        }

        async fn search(
            &self,
            kind: SearchKind,
            query: &str,
            page: u32,
        ) -> crate::error::Result<CatalogPage> {
            self.calls
                .lock()
                .unwrap()
                .push((format!("search/{}/{}", kind.as_api_str(), query), page));
            self.search_pages
                .get(&(kind.as_api_str().into(), query.into(), page))
                .cloned()
                .ok_or_else(|| ReelError::Api("no scripted response".into()))
        }

        async fn movie_detail(&self, id: u64) -> crate::error::Result<MediaDetail> {
            self.calls.lock().unwrap().push(("movie_detail".into(), 0));
            Ok(MediaDetail {
                id,
                kind: MediaKind::Movie,
                title: format!("movie {id}"),
                tagline: None,
                overview: Some("overview".into()),
                genres: vec!["Action".into()],
                release_date: None,
                runtime_minutes: Some(120),
                seasons: None,
                episodes: None,
                vote_average: 7.5,
                vote_count: 100,
                popularity: 10.0,
                status: Some("Released".into()),
                certification: None,
                poster_path: None,
            })
        }

        async fn tv_detail(&self, id: u64) -> crate::error::Result<MediaDetail> {
            self.calls.lock().unwrap().push(("tv_detail".into(), 0));
            Ok(MediaDetail {
                id,
                kind: MediaKind::Tv,
                title: format!("show {id}"),
                tagline: None,
                overview: None,
                genres: vec![],
                release_date: None,
                runtime_minutes: None,
                seasons: Some(3),
                episodes: Some(24),
                vote_average: 8.0,
                vote_count: 50,
                popularity: 5.0,
                status: None,
                certification: None,
                poster_path: None,
            })
        }

        fn web_url(&self, kind: MediaKind, id: u64) -> String {
            format!("https://example.test/{}/{}", kind.as_api_str(), id)
        }
    }

    fn new_app(catalog: ScriptedCatalog) -> (App, Arc<ScriptedCatalog>, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let catalog = Arc::new(catalog);
        let app = App::new(catalog.clone() as Arc<dyn Catalog>, tx);
        (app, catalog, rx)
    }

    /// Apply completions until the channel stays quiet, including any
    /// continuation fetches a commit spawns.
    async fn settle(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        while let Ok(Some(action)) =
            tokio::time::timeout(Duration::from_millis(100), rx.recv()).await
        {
            app.update(action);
        }
    }

    fn ids(items: &[MediaItem]) -> Vec<u64> {
        items.iter().map(|i| i.id).collect()
    }

    fn submit(app: &mut App, query: &str) {
        app.tab = Tab::Search;
        app.query_input = query.to_string();
        app.update(Action::SubmitSearch);
    }

    #[tokio::test]
    async fn list_mode_windows_upstream_pages() {
        let catalog = ScriptedCatalog::default()
            .with_list_page(1, movie_page(0..20, 5, 100))
            .with_list_page(2, movie_page(20..40, 5, 100));
        let (mut app, catalog, mut rx) = new_app(catalog);

        app.update(Action::GoToPage(1));
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (0..10).collect::<Vec<u64>>());
        assert_eq!(app.total_results, 100);
        assert_eq!(app.total_pages(), 10);
        assert!(!app.loading);

        // Second local page lives in the same upstream page; list mode
        // refetches it and slices the back half.
        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (10..20).collect::<Vec<u64>>());

        app.update(Action::GoToPage(3));
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (20..30).collect::<Vec<u64>>());

        let pages: Vec<u32> = catalog.recorded_calls().iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn multi_search_serves_second_page_from_buffer_without_fetching() {
        // Scenario: one upstream page covers two local pages.
        let catalog = ScriptedCatalog::default().with_search_page(
            SearchKind::Multi,
            "matrix",
            1,
            movie_page(0..20, 1, 20),
        );
        let (mut app, catalog, mut rx) = new_app(catalog);

        submit(&mut app, "matrix");
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (0..10).collect::<Vec<u64>>());
        assert_eq!(catalog.recorded_calls().len(), 1);

        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (10..20).collect::<Vec<u64>>());
        assert_eq!(catalog.recorded_calls().len(), 1, "buffer hit must not refetch");
        assert!(!app.page_transition);
    }

    #[tokio::test]
    async fn multi_search_exhausted_single_page_reports_exact_total() {
        // Scenario: 9 raw results, 7 watchable after filtering.
        let mut raw: Vec<MediaItem> = (0..5).map(|id| item(id, MediaKind::Movie)).collect();
        raw.push(item(90, MediaKind::Person));
        raw.extend((5..7).map(|id| item(id, MediaKind::Tv)));
        raw.push(item(91, MediaKind::Person));
        let catalog = ScriptedCatalog::default().with_search_page(
            SearchKind::Multi,
            "matrix",
            1,
            CatalogPage {
                items: raw,
                page: 1,
                total_pages: 1,
                total_results: 9,
            },
        );
        let (mut app, catalog, mut rx) = new_app(catalog);

        submit(&mut app, "matrix");
        settle(&mut app, &mut rx).await;

        assert_eq!(app.results.len(), 7);
        assert_eq!(app.total_results, 7);
        assert_eq!(app.total_pages(), 1);
        assert!(!app.loading);
        assert!(!app.page_transition);
        assert_eq!(catalog.recorded_calls().len(), 1, "exhausted: no background fetch");
    }

    #[tokio::test]
    async fn multi_search_deep_page_fetches_upstream_pages_in_order() {
        // Scenario: local page 3 requested against an empty buffer.
        let catalog = ScriptedCatalog::default()
            .with_search_page(SearchKind::Multi, "neo", 1, movie_page(0..20, 2, 35))
            .with_search_page(SearchKind::Multi, "neo", 2, movie_page(20..35, 2, 35));
        let (mut app, catalog, mut rx) = new_app(catalog);

        app.tab = Tab::Search;
        app.query_input = "neo".to_string();
        app.has_searched = true;
        app.update(Action::GoToPage(3));

        // The first commit has nothing for page 3 yet; the transition
        // flag must hold until the continuation delivers.
        assert!(app.page_transition);
        settle(&mut app, &mut rx).await;

        assert_eq!(
            catalog.recorded_calls(),
            vec![
                ("search/multi/neo".to_string(), 1),
                ("search/multi/neo".to_string(), 2),
            ]
        );
        assert_eq!(ids(&app.results), (20..30).collect::<Vec<u64>>());
        assert_eq!(app.total_results, 35);
        assert!(!app.page_transition);
    }

    #[tokio::test]
    async fn estimate_shrinks_once_upstream_is_exhausted() {
        let catalog = ScriptedCatalog::default()
            .with_search_page(SearchKind::Multi, "few", 1, movie_page(0..7, 2, 27))
            .with_search_page(SearchKind::Multi, "few", 2, movie_page(7..14, 2, 27));
        let (mut app, _catalog, mut rx) = new_app(catalog);

        submit(&mut app, "few");
        // First upstream page: 7 items satisfy local page 1, but more
        // pages remain, so the total must overstate.
        let first = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.update(first);
        assert_eq!(app.total_results, 11);

        // Page 2 wants 20 items; the fill exhausts upstream at 14 and
        // the announced total shrinks to the exact count.
        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;
        assert_eq!(app.total_results, 14);
        assert_eq!(ids(&app.results), (10..14).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn exhausted_overshoot_clamps_to_last_real_page() {
        let catalog = ScriptedCatalog::default().with_search_page(
            SearchKind::Multi,
            "tiny",
            1,
            movie_page(0..14, 1, 14),
        );
        let (mut app, _catalog, mut rx) = new_app(catalog);

        submit(&mut app, "tiny");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.total_pages(), 2);

        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;
        assert_eq!(app.page, 2);

        // Page 5 does not exist; the buffer is exhausted, so the next
        // press is refused outright.
        app.update(Action::GoToPage(5));
        settle(&mut app, &mut rx).await;
        assert_eq!(app.page, 2);
    }

    #[tokio::test]
    async fn overshoot_after_exhaustion_falls_back_to_last_page() {
        // The loading estimate promised a page 2; the fill then
        // exhausts upstream with only 7 items, so the active page must
        // drop back to 1.
        let catalog = ScriptedCatalog::default()
            .with_search_page(SearchKind::Multi, "sparse", 1, movie_page(0..7, 2, 27))
            .with_search_page(SearchKind::Multi, "sparse", 2, movie_page(0..0, 2, 27));
        let (mut app, _catalog, mut rx) = new_app(catalog);

        submit(&mut app, "sparse");
        let first = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .unwrap()
            .unwrap();
        app.update(first);
        assert_eq!(app.total_pages(), 2);

        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;

        assert_eq!(app.page, 1);
        assert_eq!(ids(&app.results), (0..7).collect::<Vec<u64>>());
        assert_eq!(app.total_results, 7);
        assert!(!app.page_transition);
    }

    #[tokio::test]
    async fn retyped_query_discards_previous_accumulation() {
        let catalog = ScriptedCatalog::default()
            .with_search_page(SearchKind::Multi, "batman", 1, movie_page(0..20, 3, 60))
            .with_search_page(SearchKind::Multi, "superman", 1, movie_page(100..107, 1, 7));
        let (mut app, _catalog, mut rx) = new_app(catalog);

        // Second submit lands before the first response is applied;
        // batman's reply must be dropped by the token check.
        submit(&mut app, "batman");
        submit(&mut app, "superman");
        settle(&mut app, &mut rx).await;

        assert_eq!(ids(&app.results), (100..107).collect::<Vec<u64>>());
        assert_eq!(app.total_results, 7);
    }

    #[tokio::test]
    async fn stale_completions_do_not_touch_state() {
        let catalog = ScriptedCatalog::default().with_search_page(
            SearchKind::Multi,
            "matrix",
            1,
            movie_page(0..7, 1, 7),
        );
        let (mut app, _catalog, mut rx) = new_app(catalog);

        submit(&mut app, "matrix");
        settle(&mut app, &mut rx).await;
        let committed = ids(&app.results);

        // A forged completion with a superseded token changes nothing,
        // not even the loading flags.
        app.update(Action::SearchPageFetched {
            page: movie_page(900..920, 9, 180),
            token: 999,
        });
        assert_eq!(ids(&app.results), committed);
        assert!(!app.loading);
        assert!(!app.page_transition);

        app.update(Action::ListLoaded {
            page: movie_page(900..920, 9, 180),
            token: 999,
        });
        assert_eq!(ids(&app.results), committed);
    }

    #[tokio::test]
    async fn single_kind_search_translates_like_list_mode() {
        let catalog = ScriptedCatalog::default()
            .with_search_page(SearchKind::Movie, "alien", 1, movie_page(0..20, 4, 62));
        let (mut app, catalog, mut rx) = new_app(catalog);

        app.tab = Tab::Search;
        app.search_kind = SearchKind::Movie;
        app.query_input = "alien".to_string();
        app.update(Action::SubmitSearch);
        settle(&mut app, &mut rx).await;

        assert_eq!(ids(&app.results), (0..10).collect::<Vec<u64>>());
        assert_eq!(app.total_results, 62);

        app.update(Action::GoToPage(2));
        settle(&mut app, &mut rx).await;
        assert_eq!(ids(&app.results), (10..20).collect::<Vec<u64>>());
        // Stateless per request: same upstream page, fetched again.
        assert_eq!(
            catalog.recorded_calls(),
            vec![
                ("search/movie/alien".to_string(), 1),
                ("search/movie/alien".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn blank_query_never_reaches_the_network() {
        let (mut app, catalog, mut rx) = new_app(ScriptedCatalog::default());

        submit(&mut app, "   ");
        settle(&mut app, &mut rx).await;

        assert!(app.search_error);
        assert!(!app.has_searched);
        assert!(app.results.is_empty());
        assert!(catalog.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn transport_error_clears_to_known_empty_state() {
        // No scripted pages at all: every fetch fails.
        let (mut app, _catalog, mut rx) = new_app(ScriptedCatalog::default());

        app.update(Action::GoToPage(1));
        settle(&mut app, &mut rx).await;

        assert!(app.api_error.is_some());
        assert!(app.results.is_empty());
        assert_eq!(app.total_results, 0);
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn tab_switch_resets_paging_and_loads_new_tab() {
        let catalog = ScriptedCatalog::default()
            .with_list_page(1, movie_page(0..20, 5, 100))
            .with_list_page(2, movie_page(20..40, 5, 100));
        let (mut app, catalog, mut rx) = new_app(catalog);

        app.update(Action::GoToPage(3));
        settle(&mut app, &mut rx).await;
        assert_eq!(app.page, 3);

        // Movies -> Search (nothing searched yet) -> TV.
        app.update(Action::NextTab);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.tab, Tab::Search);
        assert_eq!(app.page, 1);
        assert!(app.results.is_empty());

        app.update(Action::NextTab);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.tab, Tab::Tv);
        assert_eq!(app.page, 1);
        assert_eq!(ids(&app.results), (0..10).collect::<Vec<u64>>());
        let last = catalog.recorded_calls().pop().unwrap();
        assert_eq!(last, ("tv/popular".to_string(), 1));
    }

    #[tokio::test]
    async fn selecting_a_row_opens_the_detail_screen() {
        let catalog = ScriptedCatalog::default().with_list_page(1, movie_page(0..20, 1, 20));
        let (mut app, _catalog, mut rx) = new_app(catalog);

        app.update(Action::GoToPage(1));
        settle(&mut app, &mut rx).await;

        app.update(Action::ScrollDown);
        app.update(Action::Select);
        settle(&mut app, &mut rx).await;

        assert_eq!(app.screen, Screen::Detail);
        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.id, 1);

        app.update(Action::Back);
        assert_eq!(app.screen, Screen::Browse);
        assert!(app.detail.is_none());
    }
}
