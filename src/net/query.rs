//! Outbound URL construction and parameter validation.
//!
//! Every request URL goes through [`build_url`], which rejects parameters
//! the API does not accept before anything reaches the network.

use url::Url;

use crate::error::ValidationError;
use crate::types::{AnimeType, QueryParams, TopFilter};

/// Largest `limit` the API accepts per page.
pub const MAX_PAGE_SIZE: u32 = 25;

/// Builds `base` + `path` with the validated query string of `params`.
///
/// Parameters serialize in the order `page`, `limit`, `type`, `filter`,
/// `q`; absent ones are omitted rather than sent empty.
///
/// # Errors
///
/// * [`ValidationError::InvalidPage`] - `page < 1`
/// * [`ValidationError::InvalidLimit`] - `limit` outside `1..=MAX_PAGE_SIZE`
/// * [`ValidationError::InvalidType`] / [`ValidationError::InvalidFilter`] - not allow-listed
/// * [`ValidationError::EmptyQuery`] - `q` present but blank
/// * [`ValidationError::InvalidUrl`] - `base` does not parse or `path` does not join
///
/// # Examples
///
/// ```rust
/// use anime_album::net::query::build_url;
/// use anime_album::types::{QueryParams, TopFilter};
///
/// let base = "https://api.jikan.moe/v4/";
///
/// let url = build_url(base, "top/anime", &QueryParams::top(TopFilter::Upcoming, 2, 25)).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://api.jikan.moe/v4/top/anime?page=2&limit=25&filter=upcoming"
/// );
///
/// let bad = QueryParams { limit: Some(26), ..Default::default() };
/// assert!(build_url(base, "top/anime", &bad).is_err());
/// ```
pub fn build_url(base: &str, path: &str, params: &QueryParams) -> Result<Url, ValidationError> {
    validate(params)?;

    let mut url = Url::parse(base)
        .map_err(|e| ValidationError::InvalidUrl(format!("{}: {}", base, e)))?
        .join(path.trim_start_matches('/'))
        .map_err(|e| ValidationError::InvalidUrl(format!("{}{}: {}", base, path, e)))?;

    let pairs: Vec<(&str, String)> = [
        ("page", params.page.map(|p| p.to_string())),
        ("limit", params.limit.map(|l| l.to_string())),
        ("type", params.kind.clone()),
        ("filter", params.filter.clone()),
        ("q", params.q.as_deref().map(|q| q.trim().to_string())),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key, v)))
    .collect();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Ok(url)
}

/// Checks `params` against the numeric bounds and allow-lists.
pub fn validate(params: &QueryParams) -> Result<(), ValidationError> {
    if let Some(page) = params.page {
        if page < 1 {
            return Err(ValidationError::InvalidPage(page));
        }
    }
    if let Some(limit) = params.limit {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ValidationError::InvalidLimit(limit));
        }
    }
    if let Some(kind) = params.kind.as_deref() {
        kind.parse::<AnimeType>()?;
    }
    if let Some(filter) = params.filter.as_deref() {
        filter.parse::<TopFilter>()?;
    }
    if let Some(q) = params.q.as_deref() {
        if q.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
    }
    Ok(())
}
