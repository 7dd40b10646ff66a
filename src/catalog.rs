use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CatalogPage, MediaDetail, MovieList, SearchKind, TvList};

/// The remote catalog, treated as a black-box paginated service.
/// Page numbers are 1-based and page size is fixed by the server.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    async fn movie_list(&self, list: MovieList, page: u32) -> Result<CatalogPage>;
    async fn tv_list(&self, list: TvList, page: u32) -> Result<CatalogPage>;
    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> Result<CatalogPage>;
    async fn movie_detail(&self, id: u64) -> Result<MediaDetail>;
    async fn tv_detail(&self, id: u64) -> Result<MediaDetail>;

    /// Web page for an item, for opening in a browser.
    fn web_url(&self, kind: crate::types::MediaKind, id: u64) -> String;
}
