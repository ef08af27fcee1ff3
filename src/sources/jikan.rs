use crate::{
    config::{AlbumConfig, DEFAULT_API_BASE},
    error::{Error, FetchError, Result, ValidationError},
    net::{HttpClient, Transport, json, query::build_url},
    source::CatalogSource,
    types::{Anime, QueryParams, TopFilter, TopPage},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The two paginated list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `top/anime`, filtered and paginated
    TopList,
    /// `anime?q=`, name search
    NameSearch,
}

impl ResourceKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::TopList => "top/anime",
            ResourceKind::NameSearch => "anime",
        }
    }
}

/// List response: `{ data: [...], pagination: { has_next_page } }`
#[derive(Debug, Deserialize)]
struct JikanListResponse {
    data: Vec<Anime>,
}

/// Single-item response: `{ data: {...} }`
#[derive(Debug, Deserialize)]
struct JikanItemResponse {
    data: Anime,
}

/// Catalog source for the Jikan REST API (an unofficial MyAnimeList API).
///
/// # Rate Limiting
///
/// Jikan allows 3 requests per second and 60 per minute. The client spaces
/// requests by [`AlbumConfig::rate_limit_ms`] and honors `Retry-After` on
/// 429 responses.
///
/// # Examples
///
/// ```rust,no_run
/// use anime_album::prelude::*;
/// use anime_album::sources::JikanSource;
///
/// # async fn example() -> anime_album::Result<()> {
/// let source = JikanSource::new();
///
/// let page = source.top(TopFilter::Airing, 1, 25).await?;
/// println!("{} items, more: {}", page.items.len(), page.has_next_page);
///
/// let results = source.search("naruto", 10).await?;
/// if let Some(first) = results.first() {
///     let full = source.details(first.id).await?;
///     println!("{} streams on {} services", full.title, full.streaming.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct JikanSource {
    client: HttpClient,
    api_base: String,
}

impl JikanSource {
    /// Create a new Jikan source with the default configuration
    pub fn new() -> Self {
        Self::from_parts(&AlbumConfig::default(), DEFAULT_API_BASE.to_string())
    }

    /// Create a source from `config`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) if the API base does not parse.
    pub fn with_config(config: &AlbumConfig) -> Result<Self> {
        Ok(Self::from_parts(config, config.api_url()?.to_string()))
    }

    fn from_parts(config: &AlbumConfig, api_base: String) -> Self {
        Self {
            client: HttpClient::new("jikan")
                .with_rate_limit(config.rate_limit_ms)
                .with_retry_policy(config.retry.clone()),
            api_base,
        }
    }

    /// Replace the transport, keeping rate limit and retry policy.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.client = self.client.with_transport(transport);
        self
    }

    /// Base URL every request is built on, ending with `/`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch one page of a list resource as raw JSON.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`](crate::Error::Validation) - parameters rejected,
    ///   or a name search without `q`
    /// * [`Error::Fetch`](crate::Error::Fetch) - the request failed
    pub async fn fetch_page(&self, kind: ResourceKind, params: &QueryParams) -> Result<Value> {
        if kind == ResourceKind::NameSearch && params.q.is_none() {
            return Err(ValidationError::EmptyQuery.into());
        }

        let url = build_url(&self.api_base, kind.path(), params)?;
        debug!(%url, "fetching page");
        self.client.get_json(&url).await
    }
}

impl Default for JikanSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for JikanSource {
    fn id(&self) -> &'static str {
        "jikan"
    }

    async fn top(&self, filter: TopFilter, page: u32, limit: u32) -> Result<TopPage> {
        let params = QueryParams::top(filter, page, limit);
        let payload = self.fetch_page(ResourceKind::TopList, &params).await?;

        // A missing pagination block is treated as the last page.
        let has_next_page = json::extract_flag(&payload, "pagination.has_next_page", false);
        let response: JikanListResponse = serde_json::from_value(payload)?;

        Ok(TopPage {
            items: response.data,
            has_next_page,
        })
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Anime>> {
        let params = QueryParams::search(query, limit);
        let payload = self.fetch_page(ResourceKind::NameSearch, &params).await?;
        let response: JikanListResponse = serde_json::from_value(payload)?;
        Ok(response.data)
    }

    async fn details(&self, id: u64) -> Result<Anime> {
        let url = build_url(
            &self.api_base,
            &format!("anime/{}/full", id),
            &QueryParams::default(),
        )?;
        let response: JikanItemResponse = match self.client.get_json(&url).await {
            Err(Error::Fetch(FetchError::ClientError { status: 404 })) => {
                return Err(Error::not_found(format!("anime {}", id)));
            }
            other => other?,
        };
        Ok(response.data)
    }
}
