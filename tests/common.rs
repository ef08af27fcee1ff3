//! Common test utilities
//!
//! Scripted stand-ins for the catalog, quote service, HTTP transport and
//! detail view, shared by all test modules.

use anime_album::error::{Error, FetchError, Result};
use anime_album::net::{RawResponse, Transport};
use anime_album::prelude::*;
use anime_album::types::StreamingLink;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

#[allow(dead_code)]
pub const TEST_PAGE_SIZE: u32 = 5;

/// Builds a catalog item the way the API would deliver it.
#[allow(dead_code)]
pub fn anime(id: u64, title: &str) -> Anime {
    serde_json::from_value(anime_json(id, title)).unwrap()
}

#[allow(dead_code)]
pub fn anime_json(id: u64, title: &str) -> Value {
    json!({
        "mal_id": id,
        "title": title,
        "images": {
            "jpg": {
                "image_url": format!("https://cdn.example/{}.jpg", id),
                "large_image_url": format!("https://cdn.example/{}l.jpg", id)
            }
        },
        "synopsis": format!("Synopsis of {}", title),
        "genres": [{ "name": "Action" }, { "name": "Drama" }],
        "rank": id,
        "score": 8.5,
        "rating": "PG-13 - Teens 13 or older",
        "status": "Finished Airing",
        "type": "TV"
    })
}

/// Item ids encode filter and position so tests can tell buckets apart.
#[allow(dead_code)]
pub fn item_id(filter: TopFilter, index: u64) -> u64 {
    let offset = TopFilter::ALL.iter().position(|f| *f == filter).unwrap() as u64;
    (offset + 1) * 10_000 + index
}

/// In-memory catalog with a fixed number of pages per filter.
///
/// Counts every call, can delay responses and can fail the next N calls.
#[allow(dead_code)]
pub struct FakeCatalog {
    pages_per_filter: u32,
    delay: Duration,
    failures: AtomicUsize,
    top_calls: Mutex<Vec<(TopFilter, u32)>>,
    search_calls: Mutex<Vec<String>>,
    detail_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn new(pages_per_filter: u32) -> Self {
        Self {
            pages_per_filter,
            delay: Duration::ZERO,
            failures: AtomicUsize::new(0),
            top_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
            detail_calls: AtomicUsize::new(0),
        }
    }

    /// Every call sleeps for `delay` first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The next `count` calls fail with a transient error.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn top_calls(&self) -> Vec<(TopFilter, u32)> {
        self.top_calls.lock().clone()
    }

    pub fn top_call_count(&self) -> usize {
        self.top_calls.lock().len()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().clone()
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    async fn step(&self) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Error::Fetch(FetchError::network("injected failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn top(&self, filter: TopFilter, page: u32, limit: u32) -> Result<TopPage> {
        self.top_calls.lock().push((filter, page));
        self.step().await?;

        if page > self.pages_per_filter {
            return Ok(TopPage::default());
        }

        let first = u64::from((page - 1) * limit);
        let items = (first..first + u64::from(limit))
            .map(|i| anime(item_id(filter, i), &format!("{} title number {}", filter, i)))
            .collect();

        Ok(TopPage {
            items,
            has_next_page: page < self.pages_per_filter,
        })
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Anime>> {
        self.search_calls.lock().push(query.to_string());
        self.step().await?;

        Ok((0..u64::from(limit.min(3)))
            .map(|i| anime(90_000 + i, &format!("{} result {}", query, i)))
            .collect())
    }

    async fn details(&self, id: u64) -> Result<Anime> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.step().await?;

        let mut full = anime(id, &format!("Anime {}", id));
        full.streaming = vec![StreamingLink {
            name: "Crunchyroll".to_string(),
            url: format!("https://stream.example/{}", id),
        }];
        Ok(full)
    }
}

/// Quote source that replays a script.
#[allow(dead_code)]
pub struct FakeQuotes {
    script: Mutex<VecDeque<Option<AnimeQuote>>>,
}

#[allow(dead_code)]
impl FakeQuotes {
    /// `None` entries fail.
    pub fn new(script: Vec<Option<AnimeQuote>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl QuoteSource for FakeQuotes {
    async fn random_quote(&self) -> Result<AnimeQuote> {
        match self.script.lock().pop_front().flatten() {
            Some(quote) => Ok(quote),
            None => Err(Error::Fetch(FetchError::network("quote service down"))),
        }
    }
}

#[allow(dead_code)]
pub fn quote(content: &str, anime: &str, character: &str) -> AnimeQuote {
    AnimeQuote {
        content: content.to_string(),
        anime: anime.to_string(),
        character: character.to_string(),
    }
}

/// Transport that replays scripted responses and records requested URLs.
#[allow(dead_code)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<std::result::Result<RawResponse, FetchError>>>,
    requests: Mutex<Vec<Url>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(self, body: Value) -> Self {
        self.push(Ok(RawResponse {
            status: 200,
            retry_after: None,
            body: Bytes::from(body.to_string()),
        }))
    }

    pub fn status(self, status: u16, retry_after: Option<u64>) -> Self {
        self.push(Ok(RawResponse {
            status,
            retry_after,
            body: Bytes::new(),
        }))
    }

    pub fn network_error(self) -> Self {
        self.push(Err(FetchError::network("connection reset")))
    }

    fn push(self, entry: std::result::Result<RawResponse, FetchError>) -> Self {
        self.script.lock().push_back(entry);
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> std::result::Result<RawResponse, FetchError> {
        self.requests.lock().push(url.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::network("script exhausted")))
    }
}

/// Detail view that records what it was asked to show.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDetail {
    shown: Mutex<Vec<u64>>,
}

#[allow(dead_code)]
impl RecordingDetail {
    pub fn shown(&self) -> Vec<u64> {
        self.shown.lock().clone()
    }
}

impl DetailView for RecordingDetail {
    fn show(&self, anime: &Anime) {
        self.shown.lock().push(anime.id);
    }
}

/// A top-list page body as the API returns it.
#[allow(dead_code)]
pub fn top_page_json(ids: &[u64], has_next_page: bool) -> Value {
    json!({
        "data": ids.iter().map(|id| anime_json(*id, &format!("Anime {}", id))).collect::<Vec<_>>(),
        "pagination": { "has_next_page": has_next_page }
    })
}

#[allow(dead_code)]
pub fn shared(catalog: FakeCatalog) -> (Arc<FakeCatalog>, Arc<dyn CatalogSource>) {
    let catalog = Arc::new(catalog);
    let source: Arc<dyn CatalogSource> = catalog.clone();
    (catalog, source)
}
