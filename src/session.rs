//! Session store: the single opaque auth token and where it is kept.
//!
//! A [`Session`] is created once at startup with [`Session::open`], shared as
//! an `Arc<Session>` with every component that makes authenticated calls,
//! and cleared on logout. Persistence goes through a [`TokenStore`]:
//!
//! - [`FileTokenStore`] - A small JSON file that survives restarts
//! - [`MemoryTokenStore`] - In-process only, for tests and throwaway sessions
//!
//! The token is never inspected. An expired token stays in place until the
//! user logs out; the server's `401` is the only signal that it went stale.
//!
//! # Examples
//!
//! ```rust
//! use moviefinder::session::{MemoryTokenStore, Session};
//!
//! # fn example() -> moviefinder::Result<()> {
//! let session = Session::open(MemoryTokenStore::new())?;
//! assert!(!session.is_logged_in());
//!
//! session.set_token("abc123")?;
//! assert_eq!(session.token().as_deref(), Some("abc123"));
//!
//! session.clear()?;
//! assert!(session.token().is_none());
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Durable storage for the session token.
pub trait TokenStore: Send + Sync {
    /// Loads the persisted token, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Persists `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Removes the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// On-disk format of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: Option<String>,
}

/// Keeps the token in a JSON file such as `~/.local/share/moviefinder/session.json`.
///
/// Writes go to a temporary sibling file first and are then renamed over the
/// real one, so a crash never leaves a half-written session behind.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "no session file");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_json::from_str(&contents)?;
        Ok(file.token)
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&SessionFile {
            token: Some(token.to_string()),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // The token is a credential: owner read/write only, from creation on.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp)?;
        // A leftover temp file keeps its old mode; tighten it before writing.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = ?self.path, "session file written");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`, as if saved by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// The current login state, shared by every component that authenticates.
pub struct Session {
    token: Mutex<Option<String>>,
    store: Box<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl Session {
    /// Opens a session, loading whatever token `store` holds.
    ///
    /// A stored empty string counts as no token.
    ///
    /// # Errors
    ///
    /// * [`Error::Io`](crate::Error::Io) / [`Error::Json`](crate::Error::Json) - If the store cannot be read
    pub fn open(store: impl TokenStore + 'static) -> Result<Self> {
        let token = store.load()?.filter(|t| !t.trim().is_empty());
        tracing::info!(logged_in = token.is_some(), "session opened");

        Ok(Self {
            token: Mutex::new(token),
            store: Box::new(store),
        })
    }

    /// Like [`open`](Session::open), but an unreadable store starts a
    /// logged-out session instead of failing.
    pub fn open_or_default(store: impl TokenStore + 'static) -> Self {
        let token = match store.load() {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session, starting logged out");
                None
            }
        };

        Self {
            token: Mutex::new(token),
            store: Box::new(store),
        }
    }

    /// A logged-out, memory-only session.
    pub fn in_memory() -> Self {
        Self {
            token: Mutex::new(None),
            store: Box::new(MemoryTokenStore::new()),
        }
    }

    /// The current token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    /// The current token.
    ///
    /// # Errors
    ///
    /// * [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) - If no one is logged in
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(crate::Error::NotAuthenticated)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.lock().is_some()
    }

    /// Replaces the token in memory and in the store.
    ///
    /// The in-memory token is updated even if persisting fails, so the
    /// current run stays logged in.
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        let saved = self.store.save(&token);
        *self.token.lock() = Some(token);

        match &saved {
            Ok(()) => tracing::info!("session token stored"),
            Err(e) => tracing::error!(error = %e, "session token could not be persisted"),
        }
        saved
    }

    /// Forgets the token in memory and in the store.
    pub fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        let cleared = self.store.clear();

        match &cleared {
            Ok(()) => tracing::info!("session cleared"),
            Err(e) => tracing::error!(error = %e, "stored session could not be removed"),
        }
        cleared
    }
}
