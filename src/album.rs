//! Selection layer tying filters, search and the card pool together.
//!
//! [`Album`] tracks which view is active and routes responses to the pool
//! only while their view is still the one on screen. A view only becomes
//! active once its data is in hand, so a failed fetch leaves both the view
//! and the cards as they were.
//!
//! The async operations run a whole step (fetch, activate, render) for
//! callers that can await in place. Front-ends that fetch on background
//! tasks use the synchronous halves instead:
//! [`request_filter`](Album::request_filter) or
//! [`request_search`](Album::request_search) when the user acts, then
//! [`show_bucket`](Album::show_bucket) or
//! [`show_search_results`](Album::show_search_results) when the response
//! lands.
//!
//! # Examples
//!
//! ```rust,no_run
//! use anime_album::prelude::*;
//! use anime_album::sources::JikanSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> anime_album::Result<()> {
//! let config = AlbumConfig::from_env()?;
//! let modal = Arc::new(DetailModal::new());
//! let mut album = Album::new(
//!     Arc::new(JikanSource::with_config(&config)?),
//!     modal.clone(),
//!     &config,
//! );
//!
//! album.init().await?;
//! album.load_more().await?;
//! album.select_filter(TopFilter::Upcoming).await?;
//!
//! album.submit_search("cowboy bebop").await?;
//! if album.select_card(0) {
//!     println!("{:?}", modal.content().map(|c| c.title));
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    cache::{BucketSnapshot, Expansion, ListCache},
    config::AlbumConfig,
    error::Result,
    reconcile::{CardPool, DetailView},
    search::{SearchCache, normalize_query},
    source::CatalogSource,
    types::{Anime, TopFilter},
};

/// What the card pool is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveView {
    Filter(TopFilter),
    /// Results for a normalized query
    Search(String),
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveView::Filter(filter) => write!(f, "{}", filter.label()),
            ActiveView::Search(query) => write!(f, "search \"{}\"", query),
        }
    }
}

pub struct Album {
    cache: Arc<ListCache>,
    search: Arc<SearchCache>,
    pool: CardPool,
    active: ActiveView,
    /// Requested view still waiting for its first response
    pending: Option<ActiveView>,
    last_filter: TopFilter,
    default_filter: TopFilter,
}

impl Album {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        detail: Arc<dyn DetailView>,
        config: &AlbumConfig,
    ) -> Self {
        Self {
            cache: Arc::new(ListCache::new(source.clone(), config.page_size)),
            search: Arc::new(SearchCache::new(source, config.page_size)),
            pool: CardPool::new(detail).with_max_title_len(config.max_title_len),
            active: ActiveView::Filter(config.default_filter),
            pending: None,
            last_filter: config.default_filter,
            default_filter: config.default_filter,
        }
    }

    pub fn active(&self) -> &ActiveView {
        &self.active
    }

    /// The view requested by [`request_filter`](Album::request_filter) or
    /// [`request_search`](Album::request_search) whose data has not arrived.
    pub fn pending(&self) -> Option<&ActiveView> {
        self.pending.as_ref()
    }

    /// The filter to return to when a search is cleared.
    pub fn last_filter(&self) -> TopFilter {
        self.last_filter
    }

    pub fn pool(&self) -> &CardPool {
        &self.pool
    }

    /// Shared handle for background loads.
    pub fn cache(&self) -> Arc<ListCache> {
        Arc::clone(&self.cache)
    }

    /// Shared handle for background searches.
    pub fn search_cache(&self) -> Arc<SearchCache> {
        Arc::clone(&self.search)
    }

    /// Makes `filter` the active view and re-renders whatever its bucket
    /// already holds.
    pub fn activate(&mut self, filter: TopFilter) {
        debug!(%filter, "activating filter");
        self.active = ActiveView::Filter(filter);
        self.pending = None;
        self.last_filter = filter;
        let snapshot = self.cache.snapshot(filter);
        self.pool.render(&snapshot.items, 0);
    }

    /// Switches to `filter` if its bucket is loaded.
    ///
    /// Returns `true` when the caller has to load the bucket first; the
    /// filter is then pending and takes over once
    /// [`show_bucket`](Album::show_bucket) receives its snapshot.
    pub fn request_filter(&mut self, filter: TopFilter) -> bool {
        if self.cache.bucket(filter).is_loaded() {
            self.activate(filter);
            return false;
        }
        debug!(%filter, "filter pending until loaded");
        self.pending = Some(ActiveView::Filter(filter));
        true
    }

    /// Marks the normalized `query` as pending and returns it.
    ///
    /// The pool and the active view stay as they are until
    /// [`show_search_results`](Album::show_search_results) receives results.
    pub fn request_search(&mut self, query: &str) -> String {
        let query = normalize_query(query);
        debug!(%query, "search pending");
        self.pending = Some(ActiveView::Search(query.clone()));
        query
    }

    /// Renders `snapshot` if its filter is pending or still active.
    ///
    /// Returns `false` for a response that arrived after the user moved on,
    /// or one older than what the bucket already holds; the bucket keeps
    /// its items either way, so nothing is lost.
    pub fn show_bucket(&mut self, snapshot: &BucketSnapshot) -> bool {
        let view = ActiveView::Filter(snapshot.filter);
        if self.pending.as_ref() == Some(&view) {
            self.activate(snapshot.filter);
            return true;
        }
        if self.active != view {
            debug!(filter = %snapshot.filter, active = %self.active, "discarding stale bucket render");
            return false;
        }
        if snapshot.cursor < self.cache.cursor(snapshot.filter) {
            debug!(filter = %snapshot.filter, cursor = snapshot.cursor, "discarding outdated snapshot");
            return false;
        }
        self.pool.render(&snapshot.items, snapshot.appended_from);
        true
    }

    /// Renders search results if `query` is the pending or active search.
    pub fn show_search_results(&mut self, query: &str, items: &[Anime]) -> bool {
        let view = ActiveView::Search(normalize_query(query));
        if self.pending.as_ref() == Some(&view) {
            self.commit_search(view, items);
            return true;
        }
        if self.active != view {
            debug!(active = %self.active, "discarding stale search results");
            return false;
        }
        self.pool.render(items, 0);
        true
    }

    fn commit_search(&mut self, view: ActiveView, items: &[Anime]) {
        self.active = view;
        self.pending = None;
        self.pool.render(items, 0);
    }

    /// Opens the detail view for card `index`.
    pub fn select_card(&self, index: usize) -> bool {
        self.pool.select(index)
    }

    /// Shows the default filter.
    pub async fn init(&mut self) -> Result<()> {
        info!(filter = %self.default_filter, "starting album");
        self.select_filter(self.default_filter).await
    }

    /// Loads the first page of `filter` if needed, then makes it active.
    ///
    /// # Errors
    ///
    /// Propagates the load error; the active view and the cards are left
    /// as they were.
    pub async fn select_filter(&mut self, filter: TopFilter) -> Result<()> {
        self.cache.ensure_loaded(filter).await?;
        self.activate(filter);
        Ok(())
    }

    /// Appends the next page of the active filter.
    ///
    /// Returns `true` if new cards were rendered. Searches have no further
    /// pages, so this is a no-op while one is active.
    pub async fn load_more(&mut self) -> Result<bool> {
        let ActiveView::Filter(filter) = self.active else {
            return Ok(false);
        };

        match self.cache.extend(filter).await? {
            Expansion::Appended(snapshot) => Ok(self.show_bucket(&snapshot)),
            Expansion::Exhausted(_) | Expansion::InFlight => Ok(false),
        }
    }

    /// Shows results for `text`, or returns to the last filter when `text`
    /// is blank.
    ///
    /// # Errors
    ///
    /// Propagates the search error; the active view and the cards are left
    /// as they were.
    pub async fn submit_search(&mut self, text: &str) -> Result<()> {
        let query = normalize_query(text);
        if query.is_empty() {
            return self.clear_search().await;
        }

        let results = self.search.search(&query).await?;
        self.commit_search(ActiveView::Search(query), &results);
        Ok(())
    }

    /// Leaves search and shows the last active filter again.
    pub async fn clear_search(&mut self) -> Result<()> {
        self.select_filter(self.last_filter).await
    }
}
