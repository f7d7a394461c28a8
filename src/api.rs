//! The movie service endpoint surface.
//!
//! [`MovieApi`] is the one seam between the flows and the network. The flows
//! only ever talk to a `dyn MovieApi`, which keeps them testable without a
//! live server and lets a front-end swap in another backend.
//!
//! [`HttpMovieApi`] is the real implementation over [`HttpClient`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::api::{HttpMovieApi, MovieApi};
//!
//! # async fn example() -> moviefinder::Result<()> {
//! let api = HttpMovieApi::new("http://localhost:5000")?;
//!
//! let response = api.search("matrix").await?;
//! for movie in response.into_results() {
//!     println!("{} ({})", movie.title, movie.year);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    net::{ClientOptions, HttpClient},
    types::{
        FavoriteEntry, FavoritesPayload, LoginRequest, RegisterRequest, SearchResponse,
        TokenResponse,
    },
};

/// Endpoint paths, relative to the service base URL.
pub mod paths {
    pub const SEARCH: &str = "/api/movies/search";
    pub const FAVORITES: &str = "/api/movies/favorites";
    pub const FAVORITE: &str = "/api/movies/favorite";
    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGIN: &str = "/api/auth/login";
}

/// Typed access to the movie service.
///
/// Implementations perform exactly one request per call and never retry.
/// Token checks are the caller's job: methods taking a `token` assume it is
/// present and send it as a bearer credential.
///
/// # Errors
///
/// Every method may return:
///
/// * [`Error::Network`](crate::Error::Network) - For transport failures
/// * [`Error::Api`](crate::Error::Api) - For non-success statuses
/// * [`Error::Json`](crate::Error::Json) - For bodies that cannot be decoded
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Searches the catalog by title (unauthenticated).
    async fn search(&self, title: &str) -> Result<SearchResponse>;

    /// Fetches the user's favorites in whatever shape the server sends.
    async fn favorites(&self, token: &str) -> Result<FavoritesPayload>;

    /// Saves a movie to the user's favorites. The response body is ignored.
    async fn add_favorite(&self, token: &str, entry: &FavoriteEntry) -> Result<()>;

    /// Removes a movie from the user's favorites by IMDb id.
    async fn remove_favorite(&self, token: &str, imdb_id: &str) -> Result<()>;

    /// Creates an account and returns the issued session token payload.
    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse>;

    /// Logs in and returns the issued session token payload.
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse>;
}

/// [`MovieApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMovieApi {
    client: HttpClient,
}

impl HttpMovieApi {
    /// Creates an API client for the service at `base_url` with default options.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
        })
    }

    /// Creates an API client with explicit connection options.
    pub fn with_options(options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: HttpClient::with_options(options)?,
        })
    }

    /// Wraps an existing [`HttpClient`].
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

/// Path and query for a title search, with the title percent-encoded.
///
/// # Examples
///
/// ```rust
/// use moviefinder::api::search_path;
///
/// assert_eq!(search_path("star wars"), "/api/movies/search?title=star%20wars");
/// ```
pub fn search_path(title: &str) -> String {
    format!("{}?title={}", paths::SEARCH, urlencoding::encode(title))
}

/// Path for a single favorite, with the id percent-encoded.
///
/// # Examples
///
/// ```rust
/// use moviefinder::api::favorite_path;
///
/// assert_eq!(favorite_path("tt0133093"), "/api/movies/favorite/tt0133093");
/// ```
pub fn favorite_path(imdb_id: &str) -> String {
    format!("{}/{}", paths::FAVORITE, urlencoding::encode(imdb_id))
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn search(&self, title: &str) -> Result<SearchResponse> {
        self.client.get_json(&search_path(title), None).await
    }

    async fn favorites(&self, token: &str) -> Result<FavoritesPayload> {
        self.client.get_json(paths::FAVORITES, Some(token)).await
    }

    async fn add_favorite(&self, token: &str, entry: &FavoriteEntry) -> Result<()> {
        self.client
            .post(paths::FAVORITE, Some(token), entry)
            .await
            .map(|_| ())
    }

    async fn remove_favorite(&self, token: &str, imdb_id: &str) -> Result<()> {
        self.client
            .delete(&favorite_path(imdb_id), Some(token))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
        self.client.post_json(paths::REGISTER, None, request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        self.client.post_json(paths::LOGIN, None, request).await
    }
}
