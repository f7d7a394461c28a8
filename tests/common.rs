//! Common test utilities
//!
//! An in-memory movie service that records every call it receives, plus
//! builders for the rows it serves.

use async_trait::async_trait;
use moviefinder::{
    Error, Result,
    api::MovieApi,
    types::{
        FavoriteEntry, FavoritesPayload, LoginRequest, RegisterRequest, SearchResponse,
        SearchResult, TokenResponse,
    },
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// One request as the fake service saw it.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    Favorites(String),
    AddFavorite(String),
    RemoveFavorite(String),
    Register(String),
    Login(String),
}

impl Call {
    /// `true` for calls that carry a bearer token.
    #[allow(dead_code)]
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self,
            Call::Favorites(_) | Call::AddFavorite(_) | Call::RemoveFavorite(_)
        )
    }
}

/// How the fake answers a search.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum SearchReply {
    Results(Vec<SearchResult>),
    NoResults,
    Fail(u16),
}

/// Shape the fake uses when serving the favorites list.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesShape {
    List,
    Wrapped,
    Other,
}

/// A scripted rejection: status plus optional server message.
pub type Rejection = (u16, Option<String>);

/// Recording stand-in for the movie service.
///
/// Favorites are kept server-side, so an add is visible in the next list.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    searches: Mutex<HashMap<String, SearchReply>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
    favorites: Mutex<Vec<FavoriteEntry>>,
    shape: Mutex<Option<FavoritesShape>>,
    fail_favorites: Mutex<Option<u16>>,
    reject_add: Mutex<Option<Rejection>>,
    reject_remove: Mutex<Option<Rejection>>,
    reject_auth: Mutex<Option<Rejection>>,
    omit_token: Mutex<bool>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_search(self: Arc<Self>, title: &str, reply: SearchReply) -> Arc<Self> {
        self.searches.lock().insert(title.to_string(), reply);
        self
    }

    pub fn with_favorites(self: Arc<Self>, favorites: Vec<FavoriteEntry>) -> Arc<Self> {
        *self.favorites.lock() = favorites;
        self
    }

    pub fn with_shape(self: Arc<Self>, shape: FavoritesShape) -> Arc<Self> {
        *self.shape.lock() = Some(shape);
        self
    }

    pub fn failing_favorites(self: Arc<Self>, status: u16) -> Arc<Self> {
        *self.fail_favorites.lock() = Some(status);
        self
    }

    pub fn rejecting_add(self: Arc<Self>, status: u16, message: Option<&str>) -> Arc<Self> {
        *self.reject_add.lock() = Some((status, message.map(str::to_string)));
        self
    }

    pub fn rejecting_remove(self: Arc<Self>, status: u16) -> Arc<Self> {
        *self.reject_remove.lock() = Some((status, None));
        self
    }

    pub fn rejecting_auth(self: Arc<Self>, status: u16, message: Option<&str>) -> Arc<Self> {
        *self.reject_auth.lock() = Some((status, message.map(str::to_string)));
        self
    }

    /// Auth succeeds with a 2xx but the body carries no token.
    pub fn without_token(self: Arc<Self>) -> Arc<Self> {
        *self.omit_token.lock() = true;
        self
    }

    /// Searches for `title` block until the returned handle is notified.
    pub fn hold_search(&self, title: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held.lock().insert(title.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn favorites_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Favorites(_)))
    }

    pub fn search_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Search(_)))
    }

    pub fn authenticated_calls(&self) -> usize {
        self.count(Call::is_authenticated)
    }

    pub fn stored_favorites(&self) -> Vec<FavoriteEntry> {
        self.favorites.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn reject(rejection: &Option<Rejection>) -> Result<()> {
        match rejection {
            Some((status, message)) => Err(Error::api(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn token_response(&self) -> Result<TokenResponse> {
        Self::reject(&self.reject_auth.lock())?;
        let token = if *self.omit_token.lock() {
            None
        } else {
            Some(TEST_TOKEN.to_string())
        };
        Ok(TokenResponse { token })
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn search(&self, title: &str) -> Result<SearchResponse> {
        self.record(Call::Search(title.to_string()));

        let held = self.held.lock().get(title).cloned();
        if let Some(notify) = held {
            notify.notified().await;
        }

        let reply = self.searches.lock().get(title).cloned();
        match reply.unwrap_or(SearchReply::NoResults) {
            SearchReply::Results(results) => Ok(SearchResponse {
                response: Some("True".to_string()),
                search: Some(results),
                error: None,
            }),
            SearchReply::NoResults => Ok(SearchResponse {
                response: Some("False".to_string()),
                search: None,
                error: Some("Movie not found!".to_string()),
            }),
            SearchReply::Fail(status) => Err(Error::api(status, None)),
        }
    }

    async fn favorites(&self, token: &str) -> Result<FavoritesPayload> {
        self.record(Call::Favorites(token.to_string()));

        if let Some(status) = *self.fail_favorites.lock() {
            return Err(Error::api(status, None));
        }

        let favorites = self.favorites.lock().clone();
        Ok(match self.shape.lock().unwrap_or(FavoritesShape::List) {
            FavoritesShape::List => FavoritesPayload::List(favorites),
            FavoritesShape::Wrapped => FavoritesPayload::Wrapped { favorites },
            FavoritesShape::Other => {
                FavoritesPayload::Unrecognized(serde_json::json!({ "count": favorites.len() }))
            }
        })
    }

    async fn add_favorite(&self, _token: &str, entry: &FavoriteEntry) -> Result<()> {
        self.record(Call::AddFavorite(entry.imdb_id.clone()));
        Self::reject(&self.reject_add.lock())?;
        self.favorites.lock().push(entry.clone());
        Ok(())
    }

    async fn remove_favorite(&self, _token: &str, imdb_id: &str) -> Result<()> {
        self.record(Call::RemoveFavorite(imdb_id.to_string()));
        Self::reject(&self.reject_remove.lock())?;
        self.favorites.lock().retain(|f| f.imdb_id != imdb_id);
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
        self.record(Call::Register(request.email.clone()));
        self.token_response()
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        self.record(Call::Login(request.email.clone()));
        self.token_response()
    }
}

/// A catalog row.
#[allow(dead_code)]
pub fn movie(imdb_id: &str, title: &str, year: &str) -> SearchResult {
    SearchResult {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        poster_url: "N/A".to_string(),
    }
}

/// A saved favorite.
#[allow(dead_code)]
pub fn favorite(imdb_id: &str, title: &str, year: &str) -> FavoriteEntry {
    FavoriteEntry::from(movie(imdb_id, title, year))
}
