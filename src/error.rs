//! Error types and result handling for Movie Finder operations.
//!
//! This module defines the error handling system used throughout the crate.
//! All fallible operations return a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Network Errors**: Connection issues, timeouts, TLS failures
//! - **API Errors**: Non-success HTTP statuses, with the server's message when it sent one
//! - **Parse Errors**: Response bodies that do not have the expected shape
//! - **Not Authenticated**: Favorites calls attempted without a session token
//! - **IO / JSON Errors**: Session file and body decoding failures
//! - **Config Errors**: Unreadable or invalid configuration
//!
//! The flows never let these escape to the user as-is. They are logged and
//! turned into a short user-facing message with [`Error::user_message`].
//!
//! # Examples
//!
//! ```rust
//! use moviefinder::Error;
//!
//! let error = Error::api(400, Some("Email already registered".to_string()));
//! assert_eq!(error.user_message("Registration failed"), "Email already registered");
//!
//! let error = Error::parse("missing token");
//! assert_eq!(error.user_message("Login failed"), "Login failed");
//! ```

use thiserror::Error;

/// Type alias for Results with Movie Finder errors.
///
/// # Examples
///
/// ```rust
/// use moviefinder::{Result, Error};
///
/// fn example_operation() -> Result<String> {
///     Ok("Success".to_string())
/// }
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::parse("Something went wrong"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all Movie Finder operations.
///
/// # Variants
///
/// * [`Network`](Error::Network) - HTTP client and connection errors
/// * [`Api`](Error::Api) - Non-success responses from the movie service
/// * [`Parse`](Error::Parse) - Unexpected response shapes
/// * [`NotAuthenticated`](Error::NotAuthenticated) - No session token
/// * [`Io`](Error::Io) - File system errors
/// * [`Json`](Error::Json) - JSON serialization errors
/// * [`Config`](Error::Config) - Configuration errors
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from HTTP operations.
    ///
    /// Wraps errors from reqwest: connection refused, DNS failures, TLS
    /// errors and request timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    ///
    /// `message` holds the `error` field of the response body when the
    /// server provided one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use moviefinder::Error;
    ///
    /// let error = Error::api(401, Some("Invalid credentials".to_string()));
    /// assert_eq!(error.server_message(), Some("Invalid credentials"));
    /// ```
    #[error("API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Response body did not have the expected shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use moviefinder::Error;
    ///
    /// let error = Error::parse("Login response did not contain a token");
    /// ```
    #[error("Parse error: {0}")]
    Parse(String),

    /// An authenticated call was attempted without a session token.
    #[error("Not logged in")]
    NotAuthenticated,

    /// File system and IO operation errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization and deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be read or is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates an API error from a status code and optional server message.
    ///
    /// Blank server messages are treated as absent.
    pub fn api(status: u16, message: Option<String>) -> Self {
        Error::Api {
            status,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns the message the server attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a failed response, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` when the service rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// User-facing text: the server's message when present, else `fallback`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use moviefinder::Error;
    ///
    /// let error = Error::api(500, None);
    /// assert_eq!(error.user_message("Error adding favorite."), "Error adding favorite.");
    /// ```
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_server_message_is_dropped() {
        let error = Error::api(400, Some("   ".to_string()));
        assert_eq!(error.server_message(), None);
        assert_eq!(error.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn unauthorized_is_detected_from_status() {
        assert!(Error::api(401, None).is_unauthorized());
        assert!(!Error::api(403, None).is_unauthorized());
        assert!(!Error::NotAuthenticated.is_unauthorized());
    }

    #[test]
    fn display_includes_status_and_message() {
        let error = Error::api(409, Some("Already a favorite".to_string()));
        let text = error.to_string();
        assert!(text.contains("409"));
        assert!(text.contains("Already a favorite"));
    }
}
