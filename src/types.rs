//! Core data types for search results, favorites, and auth payloads.
//!
//! This module defines the data structures exchanged with the movie service:
//!
//! - [`SearchResult`] - One row of a catalog search (catalog field names)
//! - [`FavoriteEntry`] - A movie saved to the user's favorites (service field names)
//! - [`SearchResponse`] - The search envelope, including the `Response: "False"` sentinel
//! - [`FavoritesPayload`] - The favorites list in any of the shapes the service returns
//! - [`RegisterRequest`], [`LoginRequest`], [`TokenResponse`] - Auth payloads
//!
//! The catalog and the favorites store disagree on field casing (`Title` vs
//! `title`), so both keep their wire names through serde renames and share
//! the same Rust field names.
//!
//! # Examples
//!
//! ```rust
//! use moviefinder::types::*;
//!
//! let result = SearchResult {
//!     imdb_id: "tt0133093".to_string(),
//!     title: "The Matrix".to_string(),
//!     year: "1999".to_string(),
//!     poster_url: "https://example.com/matrix.jpg".to_string(),
//! };
//!
//! let favorite = FavoriteEntry::from(result);
//! assert_eq!(favorite.imdb_id, "tt0133093");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single movie returned by the catalog search.
///
/// Results are ephemeral: they are replaced wholesale on every search and
/// have no identity beyond the current query.
///
/// # Fields
///
/// * `imdb_id` - IMDb identifier (`imdbID` on the wire)
/// * `title` - Movie title (`Title`)
/// * `year` - Release year as the catalog reports it, e.g. `"1999"` or `"2010–2014"` (`Year`)
/// * `poster_url` - Poster image URL, or `"N/A"` when the catalog has none (`Poster`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,

    #[serde(rename = "Title", default)]
    pub title: String,

    #[serde(rename = "Year", default)]
    pub year: String,

    #[serde(rename = "Poster", default)]
    pub poster_url: String,
}

/// A movie in the authenticated user's favorites.
///
/// The server owns the list. The client only keeps a copy that is refetched
/// after every add or remove, so `imdb_id` is the only identity that matters.
///
/// # Examples
///
/// ```rust
/// use moviefinder::types::FavoriteEntry;
///
/// let entry: FavoriteEntry = serde_json::from_str(
///     r#"{"imdbID":"tt0133093","title":"The Matrix","year":"1999","poster":"N/A"}"#,
/// ).unwrap();
///
/// assert_eq!(entry.title, "The Matrix");
/// assert!(!entry.has_poster());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct FavoriteEntry {
    /// Unique key of the entry
    #[serde(rename = "imdbID")]
    pub imdb_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub year: String,

    #[serde(rename = "poster", default)]
    pub poster_url: String,
}

/// Wire form of [`FavoriteEntry`].
#[derive(Deserialize)]
struct FavoriteFields {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(rename = "poster", default)]
    poster_url: String,
}

// Entries only ever arrive as JSON objects; a positional array is not an entry.
impl TryFrom<serde_json::Map<String, serde_json::Value>> for FavoriteEntry {
    type Error = serde_json::Error;

    fn try_from(fields: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let fields: FavoriteFields = serde_json::from_value(serde_json::Value::Object(fields))?;
        Ok(Self {
            imdb_id: fields.imdb_id,
            title: fields.title,
            year: fields.year,
            poster_url: fields.poster_url,
        })
    }
}

impl FavoriteEntry {
    /// Returns `false` when the catalog had no poster for this movie.
    pub fn has_poster(&self) -> bool {
        has_poster(&self.poster_url)
    }
}

impl SearchResult {
    /// Returns `false` when the catalog had no poster for this movie.
    pub fn has_poster(&self) -> bool {
        has_poster(&self.poster_url)
    }
}

fn has_poster(url: &str) -> bool {
    !url.is_empty() && url != "N/A"
}

impl From<SearchResult> for FavoriteEntry {
    /// Maps a catalog row onto the favorites body (`Title` -> `title`, ...).
    fn from(result: SearchResult) -> Self {
        FavoriteEntry {
            imdb_id: result.imdb_id,
            title: result.title,
            year: result.year,
            poster_url: result.poster_url,
        }
    }
}

impl From<&SearchResult> for FavoriteEntry {
    fn from(result: &SearchResult) -> Self {
        FavoriteEntry::from(result.clone())
    }
}

/// Envelope returned by `GET /api/movies/search`.
///
/// The catalog signals "nothing matched" with `Response: "False"` and an
/// optional `Error` text instead of an empty `Search` array.
///
/// # Examples
///
/// ```rust
/// use moviefinder::types::SearchResponse;
///
/// let none: SearchResponse =
///     serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
/// assert!(none.is_no_results());
/// assert!(none.into_results().is_empty());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,

    #[serde(rename = "Search", default)]
    pub search: Option<Vec<SearchResult>>,

    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchResponse {
    /// `true` when the catalog answered with the `Response: "False"` sentinel.
    pub fn is_no_results(&self) -> bool {
        self.response.as_deref() == Some("False")
    }

    /// Consumes the envelope, yielding the result rows (empty when absent).
    pub fn into_results(self) -> Vec<SearchResult> {
        self.search.unwrap_or_default()
    }
}

/// The favorites list in whichever shape the service chose to send it.
///
/// Observed responses are either a bare array or an object wrapping the
/// array in a `favorites` field. Anything else decodes into
/// [`Unrecognized`](FavoritesPayload::Unrecognized) and normalizes to an
/// empty list, never an error.
///
/// # Examples
///
/// ```rust
/// use moviefinder::types::FavoritesPayload;
///
/// let bare: FavoritesPayload = serde_json::from_str(
///     r#"[{"imdbID":"tt1","title":"A","year":"2000","poster":"N/A"}]"#,
/// ).unwrap();
/// assert_eq!(bare.into_entries().len(), 1);
///
/// let wrapped: FavoritesPayload = serde_json::from_str(
///     r#"{"favorites":[{"imdbID":"tt1","title":"A","year":"2000","poster":"N/A"}]}"#,
/// ).unwrap();
/// assert_eq!(wrapped.into_entries().len(), 1);
///
/// let other: FavoritesPayload = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
/// assert!(other.into_entries().is_empty());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FavoritesPayload {
    List(Vec<FavoriteEntry>),
    Wrapped { favorites: Vec<FavoriteEntry> },
    Unrecognized(serde_json::Value),
}

impl FavoritesPayload {
    /// Normalizes the payload into the canonical sequence.
    pub fn into_entries(self) -> Vec<FavoriteEntry> {
        match self {
            FavoritesPayload::List(entries) => entries,
            FavoritesPayload::Wrapped { favorites } => favorites,
            FavoritesPayload::Unrecognized(value) => {
                tracing::warn!(
                    kind = json_kind(&value),
                    "unrecognized favorites payload, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// `true` if the payload was one of the recognized shapes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, FavoritesPayload::Unrecognized(_))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful auth response. The token is optional here so that a
/// token-less success can be reported as a failure instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenResponse {
    /// Returns the token if the server sent a non-empty one.
    pub fn into_token(self) -> crate::Result<String> {
        self.token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| crate::Error::parse("Auth response did not contain a token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_uses_catalog_casing() {
        let result: SearchResult = serde_json::from_str(
            r#"{"imdbID":"tt0133093","Title":"The Matrix","Year":"1999","Poster":"https://x/y.jpg","Type":"movie"}"#,
        )
        .unwrap();
        assert_eq!(result.title, "The Matrix");
        assert_eq!(result.year, "1999");
        assert!(result.has_poster());
    }

    #[test]
    fn favorite_serializes_with_service_casing() {
        let entry = FavoriteEntry {
            imdb_id: "tt1".to_string(),
            title: "A".to_string(),
            year: "2000".to_string(),
            poster_url: "N/A".to_string(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"imdbID": "tt1", "title": "A", "year": "2000", "poster": "N/A"})
        );
    }

    #[test]
    fn search_response_without_sentinel_is_success() {
        let response: SearchResponse = serde_json::from_str(r#"{"Response":"True"}"#).unwrap();
        assert!(!response.is_no_results());
        assert!(response.into_results().is_empty());
    }

    #[test]
    fn favorites_payload_shapes() {
        let entry = r#"{"imdbID":"tt1","title":"A","year":"2000","poster":"p"}"#;

        let bare: FavoritesPayload = serde_json::from_str(&format!("[{entry}]")).unwrap();
        assert!(bare.is_recognized());
        assert_eq!(bare.into_entries()[0].imdb_id, "tt1");

        let wrapped: FavoritesPayload =
            serde_json::from_str(&format!(r#"{{"favorites":[{entry}],"count":1}}"#)).unwrap();
        assert_eq!(wrapped.into_entries().len(), 1);

        for other in [
            r#"null"#,
            r#""text""#,
            r#"{"favorites":"nope"}"#,
            r#"[1,2,3]"#,
            r#"[["tt1","A","2000","p"]]"#,
            r#"{"favorites":[["tt9","X","1990","p"]]}"#,
        ] {
            let payload: FavoritesPayload = serde_json::from_str(other).unwrap();
            assert!(!payload.is_recognized(), "{other} should be unrecognized");
            assert!(payload.into_entries().is_empty());
        }
    }

    #[test]
    fn favorite_entry_must_be_an_object() {
        let positional = serde_json::from_str::<FavoriteEntry>(r#"["tt1","A","2000","p"]"#);
        assert!(positional.is_err());

        let missing_id = serde_json::from_str::<FavoriteEntry>(r#"{"title":"A"}"#);
        assert!(missing_id.is_err());

        let entry: FavoriteEntry = serde_json::from_str(r#"{"imdbID":"tt1"}"#).unwrap();
        assert_eq!(entry.imdb_id, "tt1");
        assert!(!entry.has_poster());
    }

    #[test]
    fn empty_list_is_recognized() {
        let payload: FavoritesPayload = serde_json::from_str("[]").unwrap();
        assert!(payload.is_recognized());
        assert!(payload.into_entries().is_empty());
    }

    #[test]
    fn token_response_requires_token() {
        let ok = TokenResponse {
            token: Some("abc".to_string()),
        };
        assert_eq!(ok.into_token().unwrap(), "abc");

        assert!(TokenResponse::default().into_token().is_err());
        assert!(
            TokenResponse {
                token: Some(String::new())
            }
            .into_token()
            .is_err()
        );
    }

    #[test]
    fn credentials_debug_hides_password() {
        let login = LoginRequest {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }
}
