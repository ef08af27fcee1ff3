//! Single-entry memo for name search.
//!
//! Search results bypass the per-filter buckets: there is no cursor and no
//! expansion, only the last query and its results. Submitting the same
//! query again (after trimming and lowercasing) is served from memory.
//!
//! # Examples
//!
//! ```rust,no_run
//! use anime_album::prelude::*;
//! use anime_album::sources::JikanSource;
//! use std::sync::Arc;
//!
//! # async fn example() -> anime_album::Result<()> {
//! let search = SearchCache::new(Arc::new(JikanSource::new()), 25);
//!
//! let results = search.search("Naruto").await?;
//! // Same normalized query: no request.
//! let again = search.search("  naruto ").await?;
//! assert_eq!(results, again);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    error::{Result, ValidationError},
    source::CatalogSource,
    types::Anime,
};

/// Normalizes user input into the form used as the memo key and sent to
/// the API: surrounding whitespace removed, lowercased.
///
/// ```rust
/// use anime_album::search::normalize_query;
///
/// assert_eq!(normalize_query("  Cowboy Bebop "), "cowboy bebop");
/// assert_eq!(normalize_query("   "), "");
/// ```
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone)]
struct SearchEntry {
    query: String,
    results: Vec<Anime>,
}

/// Memo of the last successful search.
pub struct SearchCache {
    source: Arc<dyn CatalogSource>,
    limit: u32,
    entry: Mutex<Option<SearchEntry>>,
}

impl SearchCache {
    pub fn new(source: Arc<dyn CatalogSource>, limit: u32) -> Self {
        Self {
            source,
            limit,
            entry: Mutex::new(None),
        }
    }

    /// Returns results for `raw`, fetching only when the normalized query
    /// differs from the memoized one.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::EmptyQuery`] - `raw` is blank
    /// * any error from the source; the memo is left unchanged
    pub async fn search(&self, raw: &str) -> Result<Vec<Anime>> {
        let query = normalize_query(raw);
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        let mut entry = self.entry.lock().await;
        if let Some(hit) = entry.as_ref().filter(|e| e.query == query) {
            debug!(%query, count = hit.results.len(), "search served from cache");
            return Ok(hit.results.clone());
        }

        let results = self.source.search(&query, self.limit).await?;
        debug!(source = self.source.id(), %query, count = results.len(), "search fetched");
        *entry = Some(SearchEntry {
            query,
            results: results.clone(),
        });
        Ok(results)
    }

    /// The memoized query, if any search has succeeded.
    pub async fn last_query(&self) -> Option<String> {
        self.entry.lock().await.as_ref().map(|e| e.query.clone())
    }
}
