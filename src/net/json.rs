//! JSON decoding helpers for movie service responses.
//!
//! The service is not strict about its response bodies: error responses may
//! or may not carry an `{ "error": "..." }` object, and some success
//! responses are empty. These helpers keep that leniency in one place.
//!
//! # Examples
//!
//! ```rust
//! use moviefinder::net::json;
//!
//! let body = br#"{"error":"Invalid credentials"}"#;
//! assert_eq!(json::error_message(body).as_deref(), Some("Invalid credentials"));
//!
//! assert_eq!(json::error_message(b"<html>Bad Gateway</html>"), None);
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fields checked, in order, for a human-readable error message.
const MESSAGE_FIELDS: [&str; 2] = ["error", "message"];

/// Extracts a value from nested JSON using dot notation.
///
/// # Examples
///
/// ```rust
/// use moviefinder::net::json;
/// use serde_json::json;
///
/// let data = json!({"error": {"detail": "expired"}});
/// assert_eq!(json::extract_path(&data, "error.detail").unwrap(), "expired");
/// assert_eq!(json::extract_path(&data, "error.code"), None);
/// ```
pub fn extract_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;

    for key in path.split('.') {
        current = current.get(key)?;
    }

    Some(current)
}

/// Pulls the server's error message out of a failed response body.
///
/// Returns `None` if the body is not JSON, has no message field, or the
/// message is not a non-empty string.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| extract_path(&value, field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Deserializes a response body.
///
/// An empty body is decoded as JSON `null`, so callers expecting an
/// acknowledgement with no content can decode into `()` or an `Option`.
///
/// # Errors
///
/// * [`Error::Json`](crate::Error::Json) - If the body does not match `T`
pub fn decode<T>(body: &[u8]) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null).map_err(Into::into);
    }
    serde_json::from_slice(body).map_err(Into::into)
}
