//! Helpers for pulling values out of loosely shaped JSON payloads.
//!
//! The catalog endpoints are deserialized into typed structs, but a few
//! collaborators (the quote service, pagination metadata) are easier to
//! read with dot-separated paths.
//!
//! # Examples
//!
//! ```rust
//! use anime_album::net::json;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "data": {
//!         "content": "People's lives don't end when they die.",
//!         "character": { "name": "Itachi Uchiha" }
//!     }
//! });
//!
//! let name: String = json::extract_as(&payload, "data.character.name").unwrap();
//! assert_eq!(name, "Itachi Uchiha");
//! assert!(json::extract_path(&payload, "data.anime.name").is_none());
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returns the value at a dot-separated path, if every segment exists.
///
/// Numeric segments index into arrays, so `"data.0.title"` reads the
/// title of the first element.
pub fn extract_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(json, |current, key| match current {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => current.get(key),
    })
}

/// Extracts and deserializes the value at a dot-separated path.
///
/// # Errors
///
/// * [`Error::Parse`](crate::Error::Parse) - If the path doesn't exist
/// * [`Error::Json`](crate::Error::Json) - If deserialization fails
pub fn extract_as<T>(json: &Value, path: &str) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    extract_path(json, path)
        .ok_or_else(|| crate::Error::parse(format!("Path not found: {}", path)))
        .and_then(|v| T::deserialize(v).map_err(Into::into))
}

/// Reads a boolean flag, treating a missing or non-boolean value as `default`.
///
/// ```rust
/// use anime_album::net::json;
/// use serde_json::json;
///
/// let page = json!({ "pagination": { "has_next_page": false } });
/// assert!(!json::extract_flag(&page, "pagination.has_next_page", true));
/// assert!(json::extract_flag(&json!({}), "pagination.has_next_page", true));
/// ```
pub fn extract_flag(json: &Value, path: &str, default: bool) -> bool {
    extract_path(json, path)
        .and_then(Value::as_bool)
        .unwrap_or(default)
}
