//! The authenticated user's favorites list.
//!
//! [`FavoritesFlow`] lists, adds and removes favorites. Every operation needs
//! a session token; without one it answers [`FavoritesOutcome::LoginRequired`]
//! and sends nothing.
//!
//! The client never edits its copy of the list. After a successful add or
//! remove the list is fetched again, exactly once, and that server view
//! replaces the old one. A failed mutation does not trigger a refetch.
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::api::HttpMovieApi;
//! use moviefinder::favorites::{FavoritesFlow, FavoritesOutcome};
//! use moviefinder::session::{MemoryTokenStore, Session};
//! use std::sync::Arc;
//!
//! # async fn example() -> moviefinder::Result<()> {
//! let api = Arc::new(HttpMovieApi::new("http://localhost:5000")?);
//! let session = Arc::new(Session::open(MemoryTokenStore::with_token("abc"))?);
//! let flow = FavoritesFlow::new(api, session);
//!
//! if let FavoritesOutcome::Updated(favorites) = flow.remove("tt0133093").await {
//!     println!("{} favorites left", favorites.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{api::MovieApi, session::Session, types::FavoriteEntry};

/// Prompt shown when a favorites action is attempted while logged out.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login first!";

/// Fallback shown when adding fails without a server message.
pub const ADD_ERROR_MESSAGE: &str = "Error adding favorite.";

/// Shown when removing fails.
pub const REMOVE_ERROR_MESSAGE: &str = "Error removing favorite.";

/// How a favorites operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesOutcome {
    /// No session token; nothing was sent.
    LoginRequired,
    /// The list as the server now reports it.
    Updated(Vec<FavoriteEntry>),
    /// The add or remove was rejected or failed; the list was not refetched.
    Failed(String),
}

impl FavoritesOutcome {
    /// The user-facing message for this outcome, if it has one.
    pub fn message(&self) -> Option<&str> {
        match self {
            FavoritesOutcome::LoginRequired => Some(LOGIN_REQUIRED_MESSAGE),
            FavoritesOutcome::Failed(message) => Some(message),
            FavoritesOutcome::Updated(_) => None,
        }
    }
}

/// Favorites operations for the current session.
#[derive(Clone)]
pub struct FavoritesFlow {
    api: Arc<dyn MovieApi>,
    session: Arc<Session>,
}

impl FavoritesFlow {
    pub fn new(api: Arc<dyn MovieApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    /// Fetches the list.
    ///
    /// Failures are logged and degrade to an empty list. Unrecognized
    /// response shapes also yield an empty list.
    pub async fn list(&self) -> FavoritesOutcome {
        match self.session.token() {
            Some(token) => FavoritesOutcome::Updated(self.fetch(&token).await),
            None => FavoritesOutcome::LoginRequired,
        }
    }

    /// Saves `entry`, then refetches the list.
    ///
    /// On failure the server's message is surfaced when it sent one.
    pub async fn add(&self, entry: &FavoriteEntry) -> FavoritesOutcome {
        let Ok(token) = self.session.require_token() else {
            return FavoritesOutcome::LoginRequired;
        };

        match self.api.add_favorite(&token, entry).await {
            Ok(()) => {
                tracing::info!(imdb_id = %entry.imdb_id, "favorite added");
                FavoritesOutcome::Updated(self.fetch(&token).await)
            }
            Err(e) => {
                tracing::error!(imdb_id = %entry.imdb_id, error = %e, "adding favorite failed");
                FavoritesOutcome::Failed(e.user_message(ADD_ERROR_MESSAGE))
            }
        }
    }

    /// Removes the favorite with `imdb_id`, then refetches the list.
    pub async fn remove(&self, imdb_id: &str) -> FavoritesOutcome {
        let Ok(token) = self.session.require_token() else {
            return FavoritesOutcome::LoginRequired;
        };

        match self.api.remove_favorite(&token, imdb_id).await {
            Ok(()) => {
                tracing::info!(imdb_id, "favorite removed");
                FavoritesOutcome::Updated(self.fetch(&token).await)
            }
            Err(e) => {
                tracing::error!(imdb_id, error = %e, "removing favorite failed");
                FavoritesOutcome::Failed(REMOVE_ERROR_MESSAGE.to_string())
            }
        }
    }

    async fn fetch(&self, token: &str) -> Vec<FavoriteEntry> {
        match self.api.favorites(token).await {
            Ok(payload) => {
                let favorites = payload.into_entries();
                tracing::debug!(count = favorites.len(), "favorites fetched");
                favorites
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching favorites");
                Vec::new()
            }
        }
    }
}
