use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{ReelError, Result};
use crate::types::{CatalogPage, MediaDetail, MediaItem, MediaKind, MovieList, SearchKind, TvList};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w185";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// TMDB credentials. The v4 read token is preferred; the v3 key is
/// passed as a query parameter instead of a header.
#[derive(Debug, Clone)]
pub enum Auth {
    Bearer(String),
    ApiKey(String),
}

pub struct Tmdb {
    client: reqwest::Client,
    base_url: String,
    auth: Auth,
    language: String,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb").finish_non_exhaustive()
    }
}

/// Full image URL for a poster path, or None when the item has no art.
pub fn poster_url(poster_path: Option<&str>) -> Option<String> {
    poster_path.map(|p| format!("{POSTER_BASE_URL}{p}"))
}

impl Tmdb {
    pub fn new(auth: Auth, language: String) -> Result<Self> {
        Self::with_base_url(auth, language, TMDB_BASE_URL.to_string())
    }

    pub fn with_base_url(auth: Auth, language: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReelError::Api(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            auth,
            language,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(&[("language", self.language.as_str())])
            .query(params);

        request = match &self.auth {
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReelError::Api(format!(
                "TMDB request to {path} failed: {status}"
            )));
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch_page(
        &self,
        path: &str,
        params: &[(&str, &str)],
        default_kind: MediaKind,
    ) -> Result<CatalogPage> {
        let wire: WirePage = self.get(path, params).await?;
        tracing::debug!(path, page = wire.page, total = wire.total_results, "fetched page");
        Ok(CatalogPage {
            items: wire
                .results
                .into_iter()
                .map(|r| r.into_item(default_kind))
                .collect(),
            page: wire.page,
            total_pages: wire.total_pages,
            total_results: wire.total_results,
        })
    }

    /// US certification from the release-dates endpoint, if any.
    async fn movie_certification(&self, id: u64) -> Option<String> {
        let path = format!("/movie/{id}/release_dates");
        let response: serde_json::Value = self.get(&path, &[]).await.ok()?;

        response
            .get("results")?
            .as_array()?
            .iter()
            .find(|entry| entry.get("iso_3166_1").and_then(|c| c.as_str()) == Some("US"))?
            .get("release_dates")?
            .as_array()?
            .iter()
            .filter_map(|r| r.get("certification").and_then(|c| c.as_str()))
            .find(|c| !c.is_empty())
            .map(|c| c.to_string())
    }
}

#[async_trait]
impl Catalog for Tmdb {
    async fn movie_list(&self, list: MovieList, page: u32) -> Result<CatalogPage> {
        let page = page.to_string();
        let path = format!("/movie/{}", list.as_api_str());
        self.fetch_page(&path, &[("page", &page)], MediaKind::Movie)
            .await
    }

    async fn tv_list(&self, list: TvList, page: u32) -> Result<CatalogPage> {
        let page = page.to_string();
        let path = format!("/tv/{}", list.as_api_str());
        self.fetch_page(&path, &[("page", &page)], MediaKind::Tv)
            .await
    }

    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> Result<CatalogPage> {
        let page = page.to_string();
        let path = format!("/search/{}", kind.as_api_str());
        let default_kind = match kind {
            // TMDB omits media_type outside multi-search; multi rows
            // missing it are treated as movies.
            SearchKind::Multi | SearchKind::Movie => MediaKind::Movie,
            SearchKind::Tv => MediaKind::Tv,
        };
        self.fetch_page(
            &path,
            &[("query", query), ("page", &page), ("include_adult", "false")],
            default_kind,
        )
        .await
    }

    async fn movie_detail(&self, id: u64) -> Result<MediaDetail> {
        let wire: WireDetail = self.get(&format!("/movie/{id}"), &[]).await?;
        let certification = self.movie_certification(id).await;
        Ok(wire.into_detail(MediaKind::Movie, certification))
    }

    async fn tv_detail(&self, id: u64) -> Result<MediaDetail> {
        let wire: WireDetail = self.get(&format!("/tv/{id}"), &[]).await?;
        Ok(wire.into_detail(MediaKind::Tv, None))
    }

    fn web_url(&self, kind: MediaKind, id: u64) -> String {
        format!("https://www.themoviedb.org/{}/{}", kind.as_api_str(), id)
    }
}

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<WireItem>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    popularity: Option<f64>,
}

impl WireItem {
    fn into_item(self, default_kind: MediaKind) -> MediaItem {
        let kind = self
            .media_type
            .as_deref()
            .map(MediaKind::from_api_str)
            .unwrap_or(default_kind);

        let title = self
            .title
            .or(self.name)
            .or(self.original_title)
            .or(self.original_name)
            .unwrap_or_else(|| "Untitled".to_string());

        let release_date = parse_date(self.release_date.or(self.first_air_date));

        MediaItem {
            id: self.id,
            kind,
            title,
            release_date,
            popularity: self.popularity.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireDetail {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    tagline: Option<String>,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<WireGenre>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u64,
    #[serde(default)]
    popularity: f64,
    status: Option<String>,
    poster_path: Option<String>,
}

impl WireDetail {
    fn into_detail(self, kind: MediaKind, certification: Option<String>) -> MediaDetail {
        MediaDetail {
            id: self.id,
            kind,
            title: self
                .title
                .or(self.name)
                .unwrap_or_else(|| "Untitled".to_string()),
            tagline: self.tagline.filter(|t| !t.is_empty()),
            overview: self.overview.filter(|o| !o.is_empty()),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            release_date: parse_date(self.release_date.or(self.first_air_date)),
            runtime_minutes: self.runtime,
            seasons: self.number_of_seasons,
            episodes: self.number_of_episodes,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            status: self.status,
            certification,
            poster_path: self.poster_path,
        }
    }
}

fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
