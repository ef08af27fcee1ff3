//! Source traits for the external catalog and quote services.
//!
//! [`CatalogSource`] is everything the list cache, search cache and detail
//! view need from the catalog API; [`QuoteSource`] feeds the quote widget.
//! Implementations live in [`sources`](crate::sources); tests provide their
//! own scripted ones.
//!
//! # Examples
//!
//! ```rust
//! use anime_album::prelude::*;
//! use anime_album::error::Result;
//! use async_trait::async_trait;
//!
//! struct EmptyCatalog;
//!
//! #[async_trait]
//! impl CatalogSource for EmptyCatalog {
//!     fn id(&self) -> &'static str { "empty" }
//!
//!     async fn top(&self, _filter: TopFilter, _page: u32, _limit: u32) -> Result<TopPage> {
//!         Ok(TopPage::default())
//!     }
//!
//!     async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<Anime>> {
//!         Ok(vec![])
//!     }
//!
//!     async fn details(&self, id: u64) -> Result<Anime> {
//!         Err(anime_album::Error::not_found(format!("anime {}", id)))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Anime, AnimeQuote, TopFilter, TopPage},
};

/// Read-only access to a paginated anime catalog.
///
/// # Implementation Guidelines
///
/// - Use the [`net::HttpClient`](crate::net::HttpClient) for HTTP requests
/// - Build every URL with [`build_url`](crate::net::query::build_url)
/// - Do not cache; caching belongs to [`ListCache`](crate::cache::ListCache)
///   and [`SearchCache`](crate::search::SearchCache)
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short identifier, used in logs.
    fn id(&self) -> &'static str;

    /// Fetches one page of the top list for `filter`.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`](crate::Error::Validation) - `page` or `limit` out of range
    /// * [`Error::Fetch`](crate::Error::Fetch) - after the retry policy gave up
    /// * [`Error::Json`](crate::Error::Json) - unexpected response shape
    async fn top(&self, filter: TopFilter, page: u32, limit: u32) -> Result<TopPage>;

    /// Searches the catalog by name.
    ///
    /// The query is sent as given; normalization is the caller's concern.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Anime>>;

    /// Fetches the full record for one item, including streaming links.
    async fn details(&self, id: u64) -> Result<Anime>;
}

/// Source of random quotes for the quote widget.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn random_quote(&self) -> Result<AnimeQuote>;
}
