//! HTTP plumbing for talking to the movie service.
//!
//! This module provides the networking infrastructure for Movie Finder:
//!
//! - **HTTP Client**: A shared, configured reqwest client with connection pooling
//! - **Bearer Auth**: Attaches `Authorization: Bearer <token>` when a token is given
//! - **Error Mapping**: Non-success statuses become [`Error::Api`](crate::Error::Api)
//!   carrying the server's `error` message when it sent one
//! - **JSON Helpers**: Lenient body decoding in [`json`]
//!
//! Requests are never retried. A failed call is reported once and the caller
//! decides what the user sees.
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::net::HttpClient;
//! use moviefinder::types::SearchResponse;
//!
//! # async fn example() -> moviefinder::Result<()> {
//! let client = HttpClient::new("http://localhost:5000")?;
//!
//! let response: SearchResponse = client
//!     .get_json("/api/movies/search?title=matrix", None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use derive_builder::Builder;
use once_cell::sync::Lazy;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

pub mod json;

#[cfg(test)]
pub(crate) mod testing;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("MovieFinder/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared HTTP client used when no custom options are given.
///
/// This client is configured with:
/// - 30-second timeout
/// - Connection pooling (10 idle connections per host)
/// - Compression support (gzip, brotli)
/// - The default User-Agent header
static CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
        .unwrap_or_else(|_| Client::new())
});

fn build_client(timeout: Duration, user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Connection settings for [`HttpClient`].
///
/// # Examples
///
/// ```rust
/// use moviefinder::net::ClientOptionsBuilder;
/// use std::time::Duration;
///
/// let options = ClientOptionsBuilder::default()
///     .base_url("https://movies.example.com")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(options.base_url, "https://movies.example.com");
/// assert_eq!(options.user_agent, moviefinder::net::DEFAULT_USER_AGENT);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ClientOptions {
    /// Root URL of the service, without the `/api` prefix
    pub base_url: String,
    #[builder(default = "Duration::from_secs(DEFAULT_TIMEOUT_SECS)")]
    pub timeout: Duration,
    #[builder(default = "DEFAULT_USER_AGENT.to_string()")]
    pub user_agent: String,
}

/// HTTP client bound to one movie service base URL.
///
/// `HttpClient` is cheap to clone; clones share the underlying connection
/// pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Creates a client for `base_url` using the shared default client.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`](crate::Error::Config) - If `base_url` is not an absolute http(s) URL
    pub fn new(base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            client: CLIENT.clone(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Creates a client with its own timeout and User-Agent.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`](crate::Error::Config) - If the base URL is invalid
    /// * [`Error::Network`](crate::Error::Network) - If the TLS backend cannot be initialized
    pub fn with_options(options: &ClientOptions) -> crate::Result<Self> {
        Ok(Self {
            client: build_client(options.timeout, &options.user_agent)?,
            base_url: normalize_base_url(&options.base_url)?,
        })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` (which must start with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and returns the raw body of a successful response.
    ///
    /// Non-success statuses are mapped to [`Error::Api`](crate::Error::Api)
    /// with the `error` message from the body when there is one. A `401` on
    /// an authenticated call is logged as a warning; the session is left
    /// untouched.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
        authenticated: bool,
    ) -> crate::Result<Vec<u8>> {
        tracing::debug!(%method, path, authenticated, "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%method, path, error = %e, "request failed");
            crate::Error::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(%method, path, status = status.as_u16(), bytes = body.len(), "response received");
            return Ok(body);
        }

        let error = crate::Error::api(status.as_u16(), json::error_message(&body));
        if authenticated && error.is_unauthorized() {
            tracing::warn!(path, "session token was rejected by the server");
        }

        tracing::error!(
            %method,
            path,
            status = status.as_u16(),
            server_message = error.server_message().unwrap_or(""),
            "request returned an error status"
        );
        Err(error)
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) - For transport failures
    /// * [`Error::Api`](crate::Error::Api) - For non-success statuses
    /// * [`Error::Json`](crate::Error::Json) - If the body does not match `T`
    pub async fn get_json<T>(&self, path: &str, token: Option<&str>) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path, token);
        let body = self
            .execute(Method::GET, path, builder, token.is_some())
            .await?;
        json::decode(&body)
    }

    /// Performs a POST request with a JSON body and returns the raw response body.
    pub async fn post<B>(&self, path: &str, token: Option<&str>, body: &B) -> crate::Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, token).json(body);
        self.execute(Method::POST, path, builder, token.is_some())
            .await
    }

    /// Performs a POST request with a JSON body and deserializes the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> crate::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.post(path, token, body).await?;
        json::decode(&body)
    }

    /// Performs a DELETE request, ignoring any response body.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> crate::Result<()> {
        let builder = self.request(Method::DELETE, path, token);
        self.execute(Method::DELETE, path, builder, token.is_some())
            .await?;
        Ok(())
    }
}

/// Validates a base URL and strips trailing slashes.
///
/// # Examples
///
/// ```rust
/// use moviefinder::net::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000/").unwrap(), "http://localhost:5000");
/// assert!(normalize_base_url("localhost:5000").is_err());
/// ```
pub fn normalize_base_url(base_url: &str) -> crate::Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| crate::Error::config(format!("Invalid base URL '{}': {}", base_url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(crate::Error::config(format!(
            "Base URL must be an http(s) URL with a host: {}",
            base_url
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = HttpClient::new("https://example.com/movies/").unwrap();
        assert_eq!(
            client.url("/api/movies/favorites"),
            "https://example.com/movies/api/movies/favorites"
        );
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn options_builder_requires_base_url() {
        assert!(ClientOptionsBuilder::default().build().is_err());
    }

    fn client_for(base_url: &str) -> HttpClient {
        let options = ClientOptionsBuilder::default()
            .base_url(base_url)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpClient::with_options(&options).unwrap()
    }

    #[test]
    fn bearer_header_only_with_token() {
        let client = client_for("http://127.0.0.1:8080");

        let request = client
            .request(Method::GET, "/api/movies/favorites", Some("t"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer t"
        );

        let request = client
            .request(Method::GET, "/api/movies/search?title=x", None)
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn error_status_carries_server_message() {
        let (base_url, server) =
            testing::serve_once("401 Unauthorized", r#"{"error":"Token expired"}"#).await;
        let client = client_for(&base_url);

        let err = client
            .get_json::<serde_json::Value>("/api/movies/favorites", Some("stale"))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            crate::Error::Api { status: 401, message: Some(m) } if m == "Token expired"
        ));
        assert!(err.is_unauthorized());

        let request = server.await.unwrap();
        assert_eq!(testing::header(&request, "authorization"), Some("Bearer stale"));
    }

    #[tokio::test]
    async fn error_status_without_body_has_no_message() {
        let (base_url, _server) = testing::serve_once("500 Internal Server Error", "").await;
        let client = client_for(&base_url);

        let err = client.delete("/api/movies/favorite/tt1", Some("t")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn post_json_decodes_success_body() {
        let (base_url, server) = testing::serve_once("200 OK", r#"{"token":"abc"}"#).await;
        let client = client_for(&base_url);

        let body: serde_json::Value = client
            .post_json("/api/auth/login", None, &serde_json::json!({"email": "a@b.c"}))
            .await
            .unwrap();
        assert_eq!(body["token"], "abc");

        let request = server.await.unwrap();
        assert!(testing::request_line(&request).starts_with("POST /api/auth/login "));
        assert_eq!(testing::header(&request, "authorization"), None);
        assert!(request.ends_with(r#"{"email":"a@b.c"}"#));
    }

    #[test]
    fn with_options_applies_base_url() {
        let options = ClientOptionsBuilder::default()
            .base_url("http://127.0.0.1:8080")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let client = HttpClient::with_options(&options).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }
}
