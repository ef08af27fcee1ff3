//! Error types and result handling for album operations.
//!
//! All fallible operations return a [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Validation**: outbound request parameters that must never reach the network
//! - **Fetch**: HTTP failures, split by how the client treated them
//!   (client error, rate limited, transient, retries exhausted)
//! - **JSON / Parse**: responses that do not have the expected shape
//! - **Not Found / Config / Other**: everything else
//!
//! # Examples
//!
//! ```rust
//! use anime_album::error::{Error, FetchError};
//!
//! fn describe(err: &Error) -> &'static str {
//!     match err {
//!         Error::Validation(_) => "bad request parameters",
//!         Error::Fetch(FetchError::ClientError { .. }) => "rejected by the API",
//!         Error::Fetch(FetchError::Exhausted { .. }) => "API unavailable",
//!         Error::Fetch(_) => "network trouble",
//!         _ => "unexpected response",
//!     }
//! }
//!
//! let err: Error = FetchError::ClientError { status: 404 }.into();
//! assert_eq!(describe(&err), "rejected by the API");
//! ```

use thiserror::Error;

/// Type alias for Results with album errors.
///
/// ```rust
/// use anime_album::{Error, Result};
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::parse("missing data field"))
/// }
///
/// assert!(example_with_error().is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all album operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Outbound parameters failed validation.
    ///
    /// This is a programmer error: a request with these parameters was
    /// never sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request was sent and did not produce a usable response.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// JSON deserialization failures for otherwise successful responses.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed as JSON but lacked an expected field.
    ///
    /// ```rust
    /// use anime_album::Error;
    ///
    /// let error = Error::parse("Path not found: data.content");
    /// assert!(error.to_string().contains("data.content"));
    /// ```
    #[error("Parse error: {0}")]
    Parse(String),

    /// A requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration values, usually from the environment.
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns the fetch error, if this is one.
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            Error::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

/// Rejected outbound request parameters.
///
/// Produced by [`build_url`](crate::net::query::build_url) and by the
/// `FromStr` impls of the allow-listed parameter types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Pages are 1-based.
    #[error("invalid page: {0}")]
    InvalidPage(u32),

    /// Limit must be within `1..=MAX_PAGE_SIZE`.
    #[error("invalid limit: {0}")]
    InvalidLimit(u32),

    /// Type not in the allow-list.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Filter not in the allow-list.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A search query was present but blank.
    #[error("search query must not be empty")]
    EmptyQuery,

    /// The base URL and path did not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Failure of a single logical fetch, after the retry policy has run.
///
/// # Variants
///
/// * [`ClientError`](FetchError::ClientError) - 4xx other than 429, never retried
/// * [`RateLimited`](FetchError::RateLimited) - 429; retried after the server's delay
/// * [`Transient`](FetchError::Transient) - 5xx or transport failure; retried with backoff
/// * [`Exhausted`](FetchError::Exhausted) - transient failures exceeded the attempt bound
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status}")]
    ClientError { status: u16 },

    #[error("rate limited, retry after {retry_after:?} seconds")]
    RateLimited { retry_after: Option<u64> },

    #[error("transient failure{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transient {
        status: Option<u16>,
        message: String,
    },

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Classifies a non-success HTTP status.
    ///
    /// ```rust
    /// use anime_album::error::FetchError;
    ///
    /// assert_eq!(
    ///     FetchError::from_status(429, Some(2)),
    ///     FetchError::RateLimited { retry_after: Some(2) }
    /// );
    /// assert_eq!(
    ///     FetchError::from_status(404, None),
    ///     FetchError::ClientError { status: 404 }
    /// );
    /// assert!(matches!(
    ///     FetchError::from_status(503, None),
    ///     FetchError::Transient { status: Some(503), .. }
    /// ));
    /// ```
    pub fn from_status(status: u16, retry_after: Option<u64>) -> Self {
        match status {
            429 => FetchError::RateLimited { retry_after },
            400..=499 => FetchError::ClientError { status },
            _ => FetchError::Transient {
                status: Some(status),
                message: format!("HTTP {}", status),
            },
        }
    }

    /// Creates a transient error for a transport-level failure.
    pub fn network(msg: impl Into<String>) -> Self {
        FetchError::Transient {
            status: None,
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::from_status(status.as_u16(), None),
            None => FetchError::network(e.to_string()),
        }
    }
}
