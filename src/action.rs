use crate::arbiter::{Stream, Token};
use crate::types::{CatalogPage, MediaDetail};

/// Top-level browsing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Movies,
    Search,
    Tv,
}

impl Tab {
    pub fn next(&self) -> Self {
        match self {
            Tab::Movies => Tab::Search,
            Tab::Search => Tab::Tv,
            Tab::Tv => Tab::Movies,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Movies => Tab::Tv,
            Tab::Search => Tab::Movies,
            Tab::Tv => Tab::Search,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    Select,
    NextTab,
    PrevTab,
    CycleList,
    Reload,

    // Pagination
    NextPage,
    PrevPage,
    GoToPage(u32),

    // Query editing
    EnterQueryMode,
    ExitQueryMode,
    QueryInput(char),
    QueryBackspace,
    SubmitSearch,

    // Fetch completions; every one carries the token captured when the
    // fetch was issued so stale replies can be dropped at commit time.
    ListLoaded {
        page: CatalogPage,
        token: Token,
    },
    SearchLoaded {
        page: CatalogPage,
        token: Token,
    },
    /// One raw upstream page for the combined-search buffer.
    SearchPageFetched {
        page: CatalogPage,
        token: Token,
    },
    DetailLoaded {
        detail: Box<MediaDetail>,
        token: Token,
    },
    FetchFailed {
        stream: Stream,
        token: Token,
        message: String,
    },

    OpenInBrowser,

    None,
}
