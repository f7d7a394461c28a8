//! # Movie Finder - movie search and favorites client
//!
//! Movie Finder is an async client for a movie search service. It searches a
//! movie catalog by title and keeps a personal favorites list behind an
//! email/password login, with the same flow layer driving a command-line
//! client and a terminal UI.
//!
//! ## Features
//!
//! - **Catalog Search**: Title search with a distinct "no results" state and last-requested-wins ordering
//! - **Favorites**: List, add and remove, always re-synced from the server after a change
//! - **Persistent Session**: The login token survives restarts in a small session file
//! - **Lenient Decoding**: Favorites arrive as a bare array or wrapped in an object; both work
//! - **Pluggable Backend**: Flows talk to a [`MovieApi`] trait object, so tests need no server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moviefinder::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> moviefinder::Result<()> {
//!     let config = Config::load(None)?;
//!     let mut app = MovieFinder::from_config(&config)?;
//!     app.startup().await;
//!
//!     app.search("blade runner").await;
//!     for movie in &app.state().results {
//!         println!("{} ({}) [{}]", movie.title, movie.year, movie.imdb_id);
//!     }
//!
//!     if let Some(status) = &app.state().status {
//!         println!("{}", status.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`net`]: HTTP client with bearer auth and error mapping
//! - [`api`]: The [`MovieApi`] trait and its HTTP implementation
//! - [`session`]: Token storage and the shared [`Session`]
//! - [`search`], [`favorites`], [`auth`]: One flow per concern
//! - [`app`]: The [`MovieFinder`] facade the front-ends drive
//! - [`config`], [`logging`], [`error`]: Configuration, tracing setup, errors

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod net;
pub mod search;
pub mod session;
pub mod types;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude module for convenient imports.
///
/// ```rust
/// use moviefinder::prelude::*;
///
/// // Now you have access to:
/// // - MovieFinder, AppState, Status
/// // - MovieApi, HttpMovieApi, Session
/// // - SearchResult, FavoriteEntry, outcomes
/// ```
pub mod prelude {
    pub use crate::{
        api::{HttpMovieApi, MovieApi},
        app::{AppState, MovieFinder, Status, StatusKind},
        auth::AuthOutcome,
        config::Config,
        favorites::FavoritesOutcome,
        search::{SearchOutcome, SearchResultExt},
        session::{FileTokenStore, MemoryTokenStore, Session, TokenStore},
        types::{FavoriteEntry, SearchResult},
    };
}

// Re-export main types at crate root for direct access
pub use api::{HttpMovieApi, MovieApi};
pub use app::{AppState, MovieFinder, Status, StatusKind};
pub use error::{Error, Result};
pub use session::Session;
pub use types::{FavoriteEntry, SearchResult};
