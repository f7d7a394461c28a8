//! The application facade shared by every front-end.
//!
//! [`MovieFinder`] owns what a screen shows ([`AppState`]: the last query,
//! its results, the favorites list, a loading flag and a [`Status`] line) and
//! wires the search, favorites and auth flows into it. Front-ends only render
//! the state and call these methods; none of them talk to the API directly.
//!
//! Nothing here returns an error for the user to handle. Every failure is
//! logged by the flow that hit it and lands in [`AppState::status`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::app::MovieFinder;
//! use moviefinder::config::Config;
//!
//! # async fn example() -> moviefinder::Result<()> {
//! let mut app = MovieFinder::from_config(&Config::default())?;
//! app.startup().await;
//!
//! app.login("me@example.com", "secret").await;
//! app.search("alien").await;
//! app.add_result(0).await;
//!
//! for favorite in &app.state().favorites {
//!     println!("{} ({})", favorite.title, favorite.year);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{
    api::{HttpMovieApi, MovieApi},
    auth::{AuthFlow, AuthOutcome, LOGOUT_MESSAGE},
    config::Config,
    error::Result,
    favorites::{FavoritesFlow, FavoritesOutcome},
    search::{SearchFlow, SearchOutcome, SearchTicket},
    session::{FileTokenStore, Session},
    types::{FavoriteEntry, SearchResult},
};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user, replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }
}

/// Everything a front-end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// The last submitted (non-empty) search title
    pub query: String,
    pub results: Vec<SearchResult>,
    pub favorites: Vec<FavoriteEntry>,
    /// A search is in flight
    pub loading: bool,
    pub status: Option<Status>,
}

impl AppState {
    /// Header text: `Movie Finder`, or `Searching: <q>` once a search ran.
    pub fn title(&self) -> String {
        if self.query.is_empty() {
            "Movie Finder".to_string()
        } else {
            format!("Searching: {}", self.query)
        }
    }

    /// `true` if `imdb_id` is in the cached favorites.
    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.iter().any(|f| f.imdb_id == imdb_id)
    }
}

/// The flows plus the state they update.
pub struct MovieFinder {
    session: Arc<Session>,
    search: SearchFlow,
    favorites: FavoritesFlow,
    auth: AuthFlow,
    state: AppState,
}

impl MovieFinder {
    /// Builds the facade around an API implementation and a session.
    pub fn new(api: Arc<dyn MovieApi>, session: Arc<Session>) -> Self {
        Self {
            search: SearchFlow::new(api.clone()),
            favorites: FavoritesFlow::new(api.clone(), session.clone()),
            auth: AuthFlow::new(api, session.clone()),
            session,
            state: AppState::default(),
        }
    }

    /// Builds the facade from configuration: HTTP API and file-backed session.
    ///
    /// An unreadable session file starts a logged-out session.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpMovieApi::with_options(&config.client_options()?)?;
        let session = Session::open_or_default(FileTokenStore::new(config.session_path()));
        Ok(Self::new(Arc::new(api), Arc::new(session)))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// A handle on the search flow for running searches off the event loop.
    pub fn search_flow(&self) -> SearchFlow {
        self.search.clone()
    }

    pub fn set_status(&mut self, status: Status) {
        self.state.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.state.status = None;
    }

    /// Loads favorites when a session from an earlier run is present.
    pub async fn startup(&mut self) {
        if self.is_logged_in() {
            self.refresh_favorites().await;
        }
    }

    /// Searches and applies the outcome. An empty title changes nothing.
    pub async fn search(&mut self, title: &str) -> SearchOutcome {
        let Some(ticket) = self.begin_search(title) else {
            return SearchOutcome::Skipped;
        };
        let outcome = self.search.run(ticket, title).await;
        self.apply_search(outcome.clone());
        outcome
    }

    /// Marks a search as started and returns its ticket.
    ///
    /// Returns `None` for an empty title, leaving the state untouched. The
    /// caller runs [`SearchFlow::run`] with the ticket and hands the outcome
    /// back to [`apply_search`](Self::apply_search).
    pub fn begin_search(&mut self, title: &str) -> Option<SearchTicket> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        self.state.query = title.to_string();
        self.state.loading = true;
        self.state.status = None;
        Some(self.search.issue_ticket())
    }

    /// Applies a search outcome. Skipped and superseded outcomes are ignored.
    pub fn apply_search(&mut self, outcome: SearchOutcome) {
        if !outcome.replaces_results() {
            return;
        }

        self.state.loading = false;
        self.state.status = match &outcome {
            SearchOutcome::NoResults => outcome.message().map(Status::info),
            SearchOutcome::Failed(message) => Some(Status::error(message.clone())),
            _ => None,
        };
        self.state.results = outcome.into_results();
    }

    /// Refetches favorites from the server.
    pub async fn refresh_favorites(&mut self) -> FavoritesOutcome {
        let outcome = self.favorites.list().await;
        self.apply_favorites(outcome.clone(), None);
        outcome
    }

    /// Adds `entry` to favorites, then refetches the list.
    pub async fn add_favorite(&mut self, entry: &FavoriteEntry) -> FavoritesOutcome {
        let outcome = self.favorites.add(entry).await;
        let success = format!("Added \"{}\" to favorites.", entry.title);
        self.apply_favorites(outcome.clone(), Some(success));
        outcome
    }

    /// Adds the search result at `index` to favorites.
    pub async fn add_result(&mut self, index: usize) -> FavoritesOutcome {
        let Some(result) = self.state.results.get(index) else {
            let message = format!("No search result at position {}.", index + 1);
            self.set_status(Status::warning(message.clone()));
            return FavoritesOutcome::Failed(message);
        };

        let entry = FavoriteEntry::from(result);
        self.add_favorite(&entry).await
    }

    /// Removes the favorite with `imdb_id`, then refetches the list.
    pub async fn remove_favorite(&mut self, imdb_id: &str) -> FavoritesOutcome {
        let outcome = self.favorites.remove(imdb_id).await;
        self.apply_favorites(outcome.clone(), Some("Removed from favorites.".to_string()));
        outcome
    }

    fn apply_favorites(&mut self, outcome: FavoritesOutcome, success: Option<String>) {
        match outcome {
            FavoritesOutcome::Updated(favorites) => {
                self.state.favorites = favorites;
                if let Some(message) = success {
                    self.set_status(Status::success(message));
                }
            }
            FavoritesOutcome::LoginRequired => {
                self.state.favorites.clear();
                self.set_status(Status::warning(
                    FavoritesOutcome::LoginRequired.message().unwrap_or_default(),
                ));
            }
            FavoritesOutcome::Failed(message) => self.set_status(Status::error(message)),
        }
    }

    /// Creates an account; on success the favorites are fetched.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> AuthOutcome {
        let outcome = self.auth.register(username, email, password).await;
        self.apply_auth(&outcome).await;
        outcome
    }

    /// Logs in; on success the favorites are fetched.
    pub async fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let outcome = self.auth.login(email, password).await;
        self.apply_auth(&outcome).await;
        outcome
    }

    async fn apply_auth(&mut self, outcome: &AuthOutcome) {
        match outcome {
            AuthOutcome::LoggedIn(message) => {
                self.refresh_favorites().await;
                self.set_status(Status::success(message.clone()));
            }
            AuthOutcome::Failed(message) => self.set_status(Status::error(message.clone())),
        }
    }

    /// Forgets the session and the cached favorites.
    ///
    /// The in-memory logout always happens; a session file that cannot be
    /// removed is only logged.
    pub fn logout(&mut self) {
        if let Err(e) = self.auth.logout() {
            tracing::error!(error = %e, "logout could not remove the stored session");
        }
        self.state.favorites.clear();
        self.set_status(Status::info(LOGOUT_MESSAGE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_follows_query() {
        let mut state = AppState::default();
        assert_eq!(state.title(), "Movie Finder");
        state.query = "alien".to_string();
        assert_eq!(state.title(), "Searching: alien");
    }

    #[test]
    fn is_favorite_checks_ids() {
        let state = AppState {
            favorites: vec![FavoriteEntry {
                imdb_id: "tt1".to_string(),
                title: "A".to_string(),
                year: "2000".to_string(),
                poster_url: String::new(),
            }],
            ..AppState::default()
        };
        assert!(state.is_favorite("tt1"));
        assert!(!state.is_favorite("tt2"));
    }
}
