//! Random quote widget.

use std::sync::Arc;
use tracing::warn;

use crate::{error::Result, source::QuoteSource, types::AnimeQuote};

/// Holds the last quote fetched from a [`QuoteSource`].
pub struct QuoteWidget {
    source: Arc<dyn QuoteSource>,
    current: Option<AnimeQuote>,
}

impl QuoteWidget {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self {
            source,
            current: None,
        }
    }

    /// Fetches a new quote.
    ///
    /// # Errors
    ///
    /// Propagates the source error; the previous quote stays in place.
    pub async fn refresh(&mut self) -> Result<&AnimeQuote> {
        match self.source.random_quote().await {
            Ok(quote) => Ok(&*self.current.insert(quote)),
            Err(e) => {
                warn!("quote refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Replaces the quote with one fetched elsewhere, e.g. on a spawned task.
    pub fn set(&mut self, quote: AnimeQuote) {
        self.current = Some(quote);
    }

    pub fn quote(&self) -> Option<&AnimeQuote> {
        self.current.as_ref()
    }

    /// `"{character} from {anime}"`, or `None` before the first quote.
    pub fn headline(&self) -> Option<String> {
        self.current.as_ref().map(AnimeQuote::headline)
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|q| q.content.as_str())
    }
}
