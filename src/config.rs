//! Runtime configuration.
//!
//! [`AlbumConfig`] carries the endpoints, page size, display limits, rate
//! limit and retry policy. Defaults match the public APIs; individual values
//! can be overridden with the builder or from `ANIME_ALBUM_*` environment
//! variables.
//!
//! | Variable | Field |
//! |---|---|
//! | `ANIME_ALBUM_API_BASE` | `api_base` |
//! | `ANIME_ALBUM_QUOTE_API_BASE` | `quote_api_base` |
//! | `ANIME_ALBUM_PAGE_SIZE` | `page_size` |
//! | `ANIME_ALBUM_TITLE_LENGTH` | `max_title_len` |
//! | `ANIME_ALBUM_RATE_LIMIT_MS` | `rate_limit_ms` |
//! | `ANIME_ALBUM_MAX_ATTEMPTS` | `retry.max_attempts` |
//! | `ANIME_ALBUM_DEFAULT_FILTER` | `default_filter` |

use derive_builder::Builder;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, Result};
use crate::net::RetryPolicy;
use crate::net::query::MAX_PAGE_SIZE;
use crate::types::TopFilter;

pub const DEFAULT_API_BASE: &str = "https://api.jikan.moe/v4/";
pub const DEFAULT_QUOTE_API_BASE: &str = "https://api.animechan.io/v1/";
pub const DEFAULT_MAX_TITLE_LEN: usize = 18;

/// Album configuration.
///
/// # Examples
///
/// ```rust
/// use anime_album::config::AlbumConfigBuilder;
/// use anime_album::types::TopFilter;
///
/// let config = AlbumConfigBuilder::default()
///     .page_size(10u32)
///     .default_filter(TopFilter::Favorite)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.page_size, 10);
/// assert_eq!(config.max_title_len, 18);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into), default)]
pub struct AlbumConfig {
    /// Catalog API base, with a trailing slash
    pub api_base: String,
    /// Quote API base, with a trailing slash
    pub quote_api_base: String,
    /// Items requested per page, `1..=MAX_PAGE_SIZE`
    pub page_size: u32,
    /// Card caption length before truncation
    pub max_title_len: usize,
    /// Minimum spacing between catalog requests
    pub rate_limit_ms: u64,
    pub retry: RetryPolicy,
    /// Filter shown on startup
    pub default_filter: TopFilter,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            quote_api_base: DEFAULT_QUOTE_API_BASE.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            // The catalog allows 3 requests per second.
            rate_limit_ms: 400,
            retry: RetryPolicy::default(),
            default_filter: TopFilter::Airing,
        }
    }
}

impl AlbumConfig {
    /// Defaults overridden by any `ANIME_ALBUM_*` variables that are set.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a variable is set but unparsable, or the result
    /// fails [`validate`](AlbumConfig::validate).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](AlbumConfig::from_env), reading from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("ANIME_ALBUM_API_BASE") {
            config.api_base = v;
        }
        if let Some(v) = lookup("ANIME_ALBUM_QUOTE_API_BASE") {
            config.quote_api_base = v;
        }
        if let Some(v) = lookup("ANIME_ALBUM_PAGE_SIZE") {
            config.page_size = parse_var("ANIME_ALBUM_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("ANIME_ALBUM_TITLE_LENGTH") {
            config.max_title_len = parse_var("ANIME_ALBUM_TITLE_LENGTH", &v)?;
        }
        if let Some(v) = lookup("ANIME_ALBUM_RATE_LIMIT_MS") {
            config.rate_limit_ms = parse_var("ANIME_ALBUM_RATE_LIMIT_MS", &v)?;
        }
        if let Some(v) = lookup("ANIME_ALBUM_MAX_ATTEMPTS") {
            config.retry.max_attempts = parse_var("ANIME_ALBUM_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("ANIME_ALBUM_DEFAULT_FILTER") {
            config.default_filter = parse_var("ANIME_ALBUM_DEFAULT_FILTER", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and that both base URLs parse.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::config(format!(
                "page_size must be within 1..={}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.max_title_len == 0 {
            return Err(Error::config("max_title_len must be positive"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be positive"));
        }
        self.api_url()?;
        self.quote_api_url()?;
        Ok(())
    }

    /// Parsed catalog base, normalized to end with `/`.
    pub fn api_url(&self) -> Result<Url> {
        parse_base(&self.api_base)
    }

    /// Parsed quote base, normalized to end with `/`.
    pub fn quote_api_url(&self) -> Result<Url> {
        parse_base(&self.quote_api_base)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("{}={:?}: {}", key, value, e)))
}

fn parse_base(base: &str) -> Result<Url> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&normalized).map_err(|e| Error::config(format!("invalid base url {:?}: {}", base, e)))
}
