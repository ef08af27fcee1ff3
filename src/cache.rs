//! Per-filter list cache.
//!
//! [`ListCache`] owns one [`FilterBucket`] per [`TopFilter`] for its whole
//! lifetime. A bucket accumulates items page by page; its cursor is the next
//! page to request and only advances after a successful fetch, and a failed
//! fetch leaves the bucket exactly as it was.
//!
//! Each bucket has its own fetch lock. [`ensure_loaded`](ListCache::ensure_loaded)
//! waits on it so concurrent first loads share one request;
//! [`extend`](ListCache::extend) only tries it, so a burst of load-more
//! triggers results in a single request and [`Expansion::InFlight`] for
//! the rest.
//!
//! # Examples
//!
//! ```rust,no_run
//! use anime_album::prelude::*;
//! use anime_album::sources::JikanSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> anime_album::Result<()> {
//! let cache = ListCache::new(Arc::new(JikanSource::new()), 25);
//!
//! let first = cache.ensure_loaded(TopFilter::Airing).await?;
//! println!("{} items, next page {}", first.items.len(), first.cursor);
//!
//! if let Expansion::Appended(snapshot) = cache.extend(TopFilter::Airing).await? {
//!     println!("{} new items", snapshot.new_items().len());
//! }
//! # Ok(())
//! # }
//! ```

use futures::future;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::Result,
    source::CatalogSource,
    types::{Anime, TopFilter},
};

/// Accumulated items and pagination state for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBucket {
    items: Vec<Anime>,
    cursor: u32,
    has_more: bool,
    loaded: bool,
}

impl Default for FilterBucket {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 1,
            has_more: true,
            loaded: false,
        }
    }
}

impl FilterBucket {
    pub fn items(&self) -> &[Anime] {
        &self.items
    }

    /// Next page to request.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Whether the server reported more pages. Only meaningful once loaded.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether at least one fetch has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn snapshot(&self, filter: TopFilter, appended_from: usize) -> BucketSnapshot {
        BucketSnapshot {
            filter,
            items: self.items.clone(),
            appended_from: appended_from.min(self.items.len()),
            cursor: self.cursor,
            has_more: self.has_more,
        }
    }
}

/// Copy of a bucket taken right after an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSnapshot {
    /// The filter whose bucket this is.
    pub filter: TopFilter,
    pub items: Vec<Anime>,
    /// Index of the first item added by the operation; equals
    /// `items.len()` when nothing was added.
    pub appended_from: usize,
    pub cursor: u32,
    pub has_more: bool,
}

impl BucketSnapshot {
    /// Items added by the operation that produced this snapshot.
    pub fn new_items(&self) -> &[Anime] {
        &self.items[self.appended_from..]
    }
}

/// Outcome of [`ListCache::extend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// The next page was fetched and appended.
    Appended(BucketSnapshot),
    /// The server reported no more pages; nothing was fetched.
    Exhausted(BucketSnapshot),
    /// A fetch for this filter is already running; nothing was fetched.
    InFlight,
}

struct BucketSlot {
    state: Mutex<FilterBucket>,
    fetch: tokio::sync::Mutex<()>,
}

impl BucketSlot {
    fn new() -> Self {
        Self {
            state: Mutex::new(FilterBucket::default()),
            fetch: tokio::sync::Mutex::new(()),
        }
    }
}

/// Session-long cache of every filter's list.
pub struct ListCache {
    source: Arc<dyn CatalogSource>,
    page_size: u32,
    buckets: HashMap<TopFilter, BucketSlot>,
}

impl ListCache {
    /// Creates a cache with an empty bucket for every filter.
    pub fn new(source: Arc<dyn CatalogSource>, page_size: u32) -> Self {
        let buckets = TopFilter::ALL
            .into_iter()
            .map(|filter| (filter, BucketSlot::new()))
            .collect();

        Self {
            source,
            page_size,
            buckets,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn slot(&self, filter: TopFilter) -> &BucketSlot {
        // Every filter gets a slot in `new`, and slots are never removed.
        &self.buckets[&filter]
    }

    /// Current state of a bucket, without any I/O.
    pub fn bucket(&self, filter: TopFilter) -> FilterBucket {
        self.slot(filter).state.lock().clone()
    }

    /// Next page `filter` will fetch.
    pub fn cursor(&self, filter: TopFilter) -> u32 {
        self.slot(filter).state.lock().cursor
    }

    /// Current items of a bucket as a snapshot, without any I/O.
    pub fn snapshot(&self, filter: TopFilter) -> BucketSnapshot {
        self.slot(filter).state.lock().snapshot(filter, 0)
    }

    /// Loads the first page of `filter` unless it has been loaded before.
    ///
    /// Switching away from a filter and back does not fetch again.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; the bucket is left unchanged and its
    /// cursor is not advanced.
    pub async fn ensure_loaded(&self, filter: TopFilter) -> Result<BucketSnapshot> {
        let slot = self.slot(filter);

        {
            let bucket = slot.state.lock();
            if bucket.loaded {
                return Ok(bucket.snapshot(filter, 0));
            }
        }

        let _fetching = slot.fetch.lock().await;

        // Another caller may have finished the first load while we waited.
        let cursor = {
            let bucket = slot.state.lock();
            if bucket.loaded {
                return Ok(bucket.snapshot(filter, 0));
            }
            bucket.cursor
        };

        let page = self.source.top(filter, cursor, self.page_size).await?;
        info!(source = self.source.id(), %filter, page = cursor, count = page.items.len(), more = page.has_next_page, "loaded first page");

        let mut bucket = slot.state.lock();
        bucket.items = page.items;
        bucket.cursor = cursor + 1;
        bucket.has_more = page.has_next_page;
        bucket.loaded = true;
        Ok(bucket.snapshot(filter, 0))
    }

    /// Fetches the next page of `filter` and appends it.
    ///
    /// Items are appended in API order without de-duplication. On a bucket
    /// that was never loaded this fetches the first page.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; the bucket is left unchanged and its
    /// cursor is not advanced.
    pub async fn extend(&self, filter: TopFilter) -> Result<Expansion> {
        let slot = self.slot(filter);

        let Ok(_fetching) = slot.fetch.try_lock() else {
            debug!(%filter, "fetch already in flight, skipping expansion");
            return Ok(Expansion::InFlight);
        };

        let (cursor, previous_len) = {
            let bucket = slot.state.lock();
            if !bucket.has_more {
                debug!(%filter, "no more pages");
                return Ok(Expansion::Exhausted(
                    bucket.snapshot(filter, bucket.items.len()),
                ));
            }
            (bucket.cursor, bucket.items.len())
        };

        let page = self.source.top(filter, cursor, self.page_size).await?;
        info!(source = self.source.id(), %filter, page = cursor, count = page.items.len(), more = page.has_next_page, "appended page");

        let mut bucket = slot.state.lock();
        bucket.items.extend(page.items);
        bucket.cursor = cursor + 1;
        bucket.has_more = page.has_next_page;
        bucket.loaded = true;
        Ok(Expansion::Appended(bucket.snapshot(filter, previous_len)))
    }

    /// Runs [`ensure_loaded`](ListCache::ensure_loaded) for every filter
    /// concurrently and returns the results in tab order.
    pub async fn ensure_loaded_all(&self) -> Vec<(TopFilter, Result<BucketSnapshot>)> {
        let loads = TopFilter::ALL.into_iter().map(|filter| async move {
            (filter, self.ensure_loaded(filter).await)
        });

        future::join_all(loads).await
    }
}
