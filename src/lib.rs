//! # anime-album - Browsable anime catalog with cached, paginated lists
//!
//! anime-album drives an anime listing page backed by the public Jikan
//! catalog API. It keeps one growing list per top-list category, renders
//! lists into a reusable pool of cards, memoizes the last name search and
//! shows details and streaming links for a selected card. A random quote
//! from the Animechan API rounds out the page.
//!
//! ## Features
//!
//! - **Per-filter caching**: Each category keeps its items and page cursor
//!   for the whole session; switching back never refetches
//! - **Infinite scroll**: Further pages are appended, with at most one fetch
//!   in flight per category
//! - **Card reconciliation**: A card pool is resized then populated, so only
//!   new cards are touched on append
//! - **Search memo**: Repeating the last query is served from memory
//! - **Retry and rate limiting**: Transient failures back off exponentially,
//!   `429` responses honor `Retry-After`
//! - **Terminal front-end**: `anime-album-tui` behind the `tui` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anime_album::prelude::*;
//! use anime_album::error::Result;
//! use anime_album::sources::JikanSource;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AlbumConfig::from_env()?;
//!     let modal = Arc::new(DetailModal::new());
//!     let mut album = Album::new(
//!         Arc::new(JikanSource::with_config(&config)?),
//!         modal.clone(),
//!         &config,
//!     );
//!
//!     album.init().await?;
//!     for card in album.pool().slots() {
//!         println!("{}", card.caption);
//!     }
//!
//!     // Infinite scroll
//!     album.load_more().await?;
//!
//!     // Another category, loaded once
//!     album.select_filter(TopFilter::ByPopularity).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`net`]: HTTP client, retry policy, rate limiting and URL building
//! - [`source`] / [`sources`]: Catalog and quote traits and their API clients
//! - [`cache`]: Per-filter buckets with cursor and exhaustion tracking
//! - [`search`]: Last-query memo
//! - [`reconcile`]: Card pool resize and populate
//! - [`album`]: Active view and response attribution
//! - [`detail`] / [`quote`]: Detail modal and quote widget view models
//! - [`config`]: Runtime configuration
//! - [`error`]: Error types

pub mod album;
pub mod cache;
pub mod config;
pub mod detail;
pub mod error;
pub mod net;
pub mod quote;
pub mod reconcile;
pub mod search;
pub mod source;
pub mod sources;
pub mod types;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude module for convenient imports.
///
/// ```rust
/// use anime_album::prelude::*;
///
/// // Now you have access to:
/// // - Album, ActiveView, ListCache, SearchCache
/// // - CardPool, DetailModal, QuoteWidget
/// // - CatalogSource, QuoteSource
/// // - Anime, TopFilter, TopPage, QueryParams, AlbumConfig
/// ```
pub mod prelude {
    pub use crate::{
        album::{ActiveView, Album},
        cache::{BucketSnapshot, Expansion, FilterBucket, ListCache},
        config::AlbumConfig,
        detail::{DetailModal, ModalContent},
        quote::QuoteWidget,
        reconcile::{CardPool, CardSlot, DetailView},
        search::SearchCache,
        source::{CatalogSource, QuoteSource},
        types::{Anime, AnimeQuote, QueryParams, TopFilter, TopPage},
    };
}

// Re-export main types at crate root for direct access
pub use album::{ActiveView, Album};
pub use config::AlbumConfig;
pub use error::{Error, Result};
pub use source::{CatalogSource, QuoteSource};
pub use types::{Anime, TopFilter};
