//! Network utilities for HTTP requests, rate limiting, retries, and URL building.
//!
//! This module provides the networking infrastructure for the album:
//!
//! - **Transport**: a pluggable [`Transport`] with a reqwest implementation
//!   backed by a global, pooled client
//! - **Rate Limiting**: minimum spacing between requests per client
//! - **Retry Logic**: a reusable [`RetryPolicy`] with exponential backoff
//!   and `Retry-After` handling
//! - **Query building**: [`query::build_url`] validates outbound parameters
//! - **JSON helpers**: [`json`] extracts nested values from loose payloads
//!
//! # Examples
//!
//! ```rust,no_run
//! use anime_album::net::{HttpClient, RetryPolicy};
//!
//! # async fn example() -> anime_album::Result<()> {
//! let client = HttpClient::new("jikan")
//!     .with_rate_limit(400)
//!     .with_retry_policy(RetryPolicy::default());
//!
//! let url = url::Url::parse("https://api.jikan.moe/v4/top/anime?page=1").unwrap();
//! let json: serde_json::Value = client.get_json(&url).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

pub mod json;
pub mod query;
pub mod retry;

pub use retry::{RetryDecision, RetryPolicy, RetryPolicyBuilder};

/// Global HTTP client instance.
///
/// Configured with a 30-second timeout, connection pooling, compression
/// and a custom User-Agent; built lazily and shared by every
/// [`ReqwestTransport`].
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("anime-album/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to build HTTP client")
});

/// Status, rate-limit hint and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Parsed `Retry-After` header, in seconds
    pub retry_after: Option<u64>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET, with no retries.
///
/// Transport-level failures map to [`FetchError::Transient`]; any HTTP
/// status, including errors, is returned as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError>;
}

/// [`Transport`] over the shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let response = CLIENT.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Minimum spacing between consecutive requests of one client.
///
/// Uses a `Mutex` internally and is safe to share across tasks.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self::new(self.delay.as_millis() as u64)
    }
}

impl RateLimiter {
    /// Creates a rate limiter with the given spacing in milliseconds.
    ///
    /// ```rust
    /// use anime_album::net::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(400);
    /// ```
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits until at least the configured delay has passed since the
    /// previous request, then records this one.
    pub async fn wait(&self) {
        let wait_duration = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let ready_at = last.map(|t| t + self.delay).unwrap_or(now);
            let start = ready_at.max(now);
            *last = Some(start);
            start.saturating_duration_since(now)
        };

        if !wait_duration.is_zero() {
            tokio::time::sleep(wait_duration).await;
        }
    }
}

/// HTTP client wrapper with rate limiting and a retry policy.
///
/// # Examples
///
/// ```rust
/// use anime_album::net::{HttpClient, RetryPolicy};
///
/// let client = HttpClient::new("jikan")
///     .with_rate_limit(1000)
///     .with_retry_policy(RetryPolicy::immediate(5));
///
/// assert_eq!(client.name(), "jikan");
/// assert_eq!(client.retry_policy().max_attempts, 5);
/// ```
#[derive(Clone)]
pub struct HttpClient {
    name: String,
    transport: Arc<dyn Transport>,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("name", &self.name)
            .field("rate_limiter", &self.rate_limiter)
            .field("policy", &self.policy)
            .finish()
    }
}

impl HttpClient {
    /// Creates a client with a 200ms rate limit and the default retry policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport: Arc::new(ReqwestTransport),
            rate_limiter: Arc::new(RateLimiter::new(200)),
            policy: RetryPolicy::default(),
        }
    }

    /// Sets the minimum delay between requests in milliseconds.
    pub fn with_rate_limit(mut self, delay_ms: u64) -> Self {
        self.rate_limiter = Arc::new(RateLimiter::new(delay_ms));
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the transport, e.g. with a scripted one in tests.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Performs a GET request with rate limiting and the retry policy.
    ///
    /// # Errors
    ///
    /// * [`FetchError::ClientError`] - immediately, for 4xx other than 429
    /// * [`FetchError::RateLimited`] - after too many consecutive 429 responses
    /// * [`FetchError::Exhausted`] - when transient failures use up all attempts
    pub async fn get(&self, url: &Url) -> Result<Bytes, FetchError> {
        let mut attempts = 0;
        let mut rate_limit_waits = 0;

        loop {
            self.rate_limiter.wait().await;

            let error = match self.transport.get(url).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => FetchError::from_status(response.status, response.retry_after),
                Err(e) => e,
            };

            if !matches!(error, FetchError::RateLimited { .. }) {
                attempts += 1;
                rate_limit_waits = 0;
            }

            match self.policy.decide(&error, attempts, rate_limit_waits) {
                RetryDecision::WaitRateLimit(delay) => {
                    rate_limit_waits += 1;
                    warn!(client = %self.name, %url, ?delay, "rate limited, waiting");
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Backoff(delay) => {
                    warn!(client = %self.name, %url, attempt = attempts, %error, ?delay, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    debug!(client = %self.name, %url, %error, "giving up");
                    return Err(match error {
                        FetchError::Transient { .. } => FetchError::Exhausted {
                            attempts,
                            last: Box::new(error),
                        },
                        other => other,
                    });
                }
            }
        }
    }

    /// Performs a GET request and deserializes the response as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Json`](crate::Error::Json) - If JSON parsing fails
    pub async fn get_json<T>(&self, url: &Url) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
