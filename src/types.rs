//! Core data types for catalog items, filters, and request parameters.
//!
//! - [`Anime`] - One catalog entry as returned by the API
//! - [`TopFilter`] - The four fixed catalog categories
//! - [`AnimeType`] - Allow-listed media types
//! - [`QueryParams`] - Outbound request parameters, validated by
//!   [`build_url`](crate::net::query::build_url)
//! - [`TopPage`] - One page of a top list with its pagination flag
//! - [`AnimeQuote`] - A quote for the quote widget
//!
//! # Examples
//!
//! ```rust
//! use anime_album::types::*;
//!
//! let anime: Anime = serde_json::from_value(serde_json::json!({
//!     "mal_id": 5114,
//!     "title": "Fullmetal Alchemist: Brotherhood",
//!     "images": { "jpg": { "image_url": "https://cdn.example/5114.jpg" } },
//!     "genres": [{ "name": "Action" }, { "name": "Drama" }],
//!     "score": 9.1,
//!     "rank": 1
//! }))
//! .unwrap();
//!
//! assert_eq!(anime.id, 5114);
//! assert_eq!(anime.genre_names(), vec!["Action", "Drama"]);
//! assert_eq!(anime.synopsis, None);
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A single catalog entry.
///
/// Field names follow the API where they are unambiguous. Scalars the API
/// reports as `null` are `None`; arrays it omits are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    /// Catalog identifier (`mal_id`)
    #[serde(rename = "mal_id")]
    pub id: u64,

    /// Main title
    pub title: String,

    /// Cover images
    #[serde(default)]
    pub images: Images,

    /// Plot summary
    #[serde(default)]
    pub synopsis: Option<String>,

    /// Genre tags
    #[serde(default)]
    pub genres: Vec<Genre>,

    /// Rank by score
    #[serde(default)]
    pub rank: Option<u32>,

    /// Average user score
    #[serde(default)]
    pub score: Option<f64>,

    /// Audience rating label, e.g. "PG-13 - Teens 13 or older"
    #[serde(default)]
    pub rating: Option<String>,

    /// Lifecycle status, e.g. "Currently Airing"
    #[serde(default)]
    pub status: Option<String>,

    /// Media type as reported by the API, e.g. "TV"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Streaming links; only present on the full-detail endpoint
    #[serde(default)]
    pub streaming: Vec<StreamingLink>,
}

impl Anime {
    /// URL used for card images: the large variant when available.
    pub fn card_image_url(&self) -> Option<&str> {
        self.images
            .jpg
            .large_image_url
            .as_deref()
            .or(self.images.jpg.image_url.as_deref())
    }

    /// URL used for the detail view: the regular variant when available.
    pub fn cover_image_url(&self) -> Option<&str> {
        self.images
            .jpg
            .image_url
            .as_deref()
            .or(self.images.jpg.large_image_url.as_deref())
    }

    /// Genre names in API order.
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub jpg: ImageSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// A named link to a streaming service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingLink {
    pub name: String,
    pub url: String,
}

/// One page of a top list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopPage {
    pub items: Vec<Anime>,
    pub has_next_page: bool,
}

/// The fixed catalog categories shown as tabs.
///
/// # Examples
///
/// ```rust
/// use anime_album::types::TopFilter;
///
/// let filter: TopFilter = "bypopularity".parse().unwrap();
/// assert_eq!(filter, TopFilter::ByPopularity);
/// assert_eq!(filter.as_str(), "bypopularity");
/// assert!("trending".parse::<TopFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopFilter {
    Airing,
    Upcoming,
    Favorite,
    ByPopularity,
}

impl TopFilter {
    /// All filters in tab order.
    pub const ALL: [TopFilter; 4] = [
        TopFilter::Airing,
        TopFilter::Upcoming,
        TopFilter::Favorite,
        TopFilter::ByPopularity,
    ];

    /// Wire value of the `filter` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TopFilter::Airing => "airing",
            TopFilter::Upcoming => "upcoming",
            TopFilter::Favorite => "favorite",
            TopFilter::ByPopularity => "bypopularity",
        }
    }

    /// Human-readable tab label.
    pub fn label(&self) -> &'static str {
        match self {
            TopFilter::Airing => "Airing",
            TopFilter::Upcoming => "Upcoming",
            TopFilter::Favorite => "Favorite",
            TopFilter::ByPopularity => "By Popularity",
        }
    }
}

impl fmt::Display for TopFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFilter(s.to_string()))
    }
}

/// Allow-listed media types for the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimeType {
    Tv,
    Movie,
    Ova,
    Special,
    Ona,
    Music,
}

impl AnimeType {
    pub const ALL: [AnimeType; 6] = [
        AnimeType::Tv,
        AnimeType::Movie,
        AnimeType::Ova,
        AnimeType::Special,
        AnimeType::Ona,
        AnimeType::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeType::Tv => "tv",
            AnimeType::Movie => "movie",
            AnimeType::Ova => "ova",
            AnimeType::Special => "special",
            AnimeType::Ona => "ona",
            AnimeType::Music => "music",
        }
    }
}

impl FromStr for AnimeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidType(s.to_string()))
    }
}

/// Outbound request parameters.
///
/// `kind` and `filter` are kept as raw strings because they are checked
/// against the allow-lists at URL build time, together with the numeric
/// bounds. Absent parameters are omitted from the URL.
///
/// # Builder Usage
///
/// ```rust
/// use anime_album::types::QueryParamsBuilder;
///
/// let params = QueryParamsBuilder::default()
///     .page(2u32)
///     .limit(25u32)
///     .filter("airing")
///     .build()
///     .unwrap();
///
/// assert_eq!(params.page, Some(2));
/// assert_eq!(params.filter.as_deref(), Some("airing"));
/// assert_eq!(params.q, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct QueryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub kind: Option<String>,
    pub filter: Option<String>,
    pub q: Option<String>,
}

impl QueryParams {
    /// Parameters for one page of a top list.
    pub fn top(filter: TopFilter, page: u32, limit: u32) -> Self {
        QueryParams {
            page: Some(page),
            limit: Some(limit),
            filter: Some(filter.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Parameters for a name search.
    pub fn search(query: impl Into<String>, limit: u32) -> Self {
        QueryParams {
            limit: Some(limit),
            q: Some(query.into()),
            ..Default::default()
        }
    }
}

/// A quote shown by the quote widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeQuote {
    pub content: String,
    pub anime: String,
    pub character: String,
}

impl AnimeQuote {
    /// Attribution line, e.g. `"Itachi Uchiha from Naruto"`.
    pub fn headline(&self) -> String {
        format!("{} from {}", self.character, self.anime)
    }
}
