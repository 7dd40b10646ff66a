use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows shown per UI page.
pub const LOCAL_PAGE_SIZE: usize = 10;

/// Number of results TMDB returns per page. Fixed by the API.
pub const TMDB_PAGE_SIZE: usize = 20;

/// What kind of record an item is. TMDB multi-search mixes these freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
    Other,
}

impl MediaKind {
    pub fn from_api_str(s: &str) -> Self {
        match s {
            "movie" => MediaKind::Movie,
            "tv" => MediaKind::Tv,
            "person" => MediaKind::Person,
            _ => MediaKind::Other,
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Person => "person",
            MediaKind::Other => "other",
        }
    }

    /// Whether the kind is rendered in combined search results.
    /// People and other record kinds are dropped during accumulation.
    pub fn is_watchable(&self) -> bool {
        matches!(self, MediaKind::Movie | MediaKind::Tv)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Tv => write!(f, "TV"),
            MediaKind::Person => write!(f, "Person"),
            MediaKind::Other => write!(f, "Other"),
        }
    }
}

/// One row of a catalog listing or search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub popularity: f64,
}

/// One page of results exactly as the upstream API reports it.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub items: Vec<MediaItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Full record shown on the detail screen.
#[derive(Debug, Clone)]
pub struct MediaDetail {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
    pub seasons: Option<u32>,
    pub episodes: Option<u32>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    pub status: Option<String>,
    pub certification: Option<String>,
    pub poster_path: Option<String>,
}

/// Movie listings exposed by TMDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieList {
    #[default]
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl MovieList {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "now_playing",
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::Upcoming => "upcoming",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MovieList::NowPlaying => MovieList::Popular,
            MovieList::Popular => MovieList::TopRated,
            MovieList::TopRated => MovieList::Upcoming,
            MovieList::Upcoming => MovieList::NowPlaying,
        }
    }
}

impl fmt::Display for MovieList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieList::NowPlaying => write!(f, "Now Playing"),
            MovieList::Popular => write!(f, "Popular"),
            MovieList::TopRated => write!(f, "Top Rated"),
            MovieList::Upcoming => write!(f, "Upcoming"),
        }
    }
}

/// TV listings exposed by TMDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TvList {
    #[default]
    Popular,
    AiringToday,
    OnTheAir,
    TopRated,
}

impl TvList {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            TvList::AiringToday => "airing_today",
            TvList::OnTheAir => "on_the_air",
            TvList::Popular => "popular",
            TvList::TopRated => "top_rated",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TvList::Popular => TvList::AiringToday,
            TvList::AiringToday => TvList::OnTheAir,
            TvList::OnTheAir => TvList::TopRated,
            TvList::TopRated => TvList::Popular,
        }
    }
}

impl fmt::Display for TvList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TvList::AiringToday => write!(f, "Airing Today"),
            TvList::OnTheAir => write!(f, "On The Air"),
            TvList::Popular => write!(f, "Popular"),
            TvList::TopRated => write!(f, "Top Rated"),
        }
    }
}

/// Which search endpoint to hit. Multi mixes kinds and cannot be
/// windowed directly against upstream pages; movie/tv can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Multi,
    Movie,
    Tv,
}

impl SearchKind {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            SearchKind::Multi => "multi",
            SearchKind::Movie => "movie",
            SearchKind::Tv => "tv",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SearchKind::Multi => SearchKind::Movie,
            SearchKind::Movie => SearchKind::Tv,
            SearchKind::Tv => SearchKind::Multi,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Multi => write!(f, "Multi"),
            SearchKind::Movie => write!(f, "Movie"),
            SearchKind::Tv => write!(f, "TV"),
        }
    }
}
