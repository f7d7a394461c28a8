//! Title search against the movie catalog.
//!
//! [`SearchFlow`] turns a free-text title into a [`SearchOutcome`]:
//!
//! - an empty (or whitespace-only) title is skipped without any request
//! - `Response: "False"` from the catalog is [`NoResults`](SearchOutcome::NoResults),
//!   an informational state rather than an error
//! - transport and decode failures become [`Failed`](SearchOutcome::Failed)
//!   with a generic message; the error itself is logged and not retried
//!
//! Overlapping searches resolve as last-requested-wins. Every search takes a
//! ticket, and a response that settles after a newer search was issued comes
//! back as [`Superseded`](SearchOutcome::Superseded) so the caller can drop it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use moviefinder::api::HttpMovieApi;
//! use moviefinder::search::{SearchFlow, SearchOutcome};
//! use std::sync::Arc;
//!
//! # async fn example() -> moviefinder::Result<()> {
//! let flow = SearchFlow::new(Arc::new(HttpMovieApi::new("http://localhost:5000")?));
//!
//! match flow.search("the matrix").await {
//!     SearchOutcome::Results(movies) => println!("{} movies", movies.len()),
//!     SearchOutcome::NoResults => println!("No results found."),
//!     SearchOutcome::Failed(message) => println!("{message}"),
//!     SearchOutcome::Skipped | SearchOutcome::Superseded => {}
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{api::MovieApi, types::SearchResult};

/// Message shown when the catalog has nothing for the title.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Message shown when the search request failed.
pub const SEARCH_ERROR_MESSAGE: &str = "Error fetching movies.";

/// Identifies one issued search. Later searches have larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The title was empty; nothing was requested and nothing should change.
    Skipped,
    /// The catalog returned these movies (possibly none).
    Results(Vec<SearchResult>),
    /// The catalog answered with its "no results" sentinel.
    NoResults,
    /// The request failed; the message is meant for the user.
    Failed(String),
    /// A newer search was issued before this one settled.
    Superseded,
}

impl SearchOutcome {
    /// The user-facing message for this outcome, if it has one.
    pub fn message(&self) -> Option<&str> {
        match self {
            SearchOutcome::NoResults => Some(NO_RESULTS_MESSAGE),
            SearchOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// `true` if applying this outcome should replace the result list.
    pub fn replaces_results(&self) -> bool {
        matches!(
            self,
            SearchOutcome::Results(_) | SearchOutcome::NoResults | SearchOutcome::Failed(_)
        )
    }

    /// Consumes the outcome, returning the result list it implies.
    ///
    /// `NoResults` and `Failed` imply an empty list.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Results(results) => results,
            _ => Vec::new(),
        }
    }
}

/// Runs catalog searches and keeps track of which one is current.
///
/// Cloning is cheap and clones share the ticket counter, so a clone moved
/// into a spawned task still takes part in last-requested-wins ordering.
#[derive(Clone)]
pub struct SearchFlow {
    api: Arc<dyn MovieApi>,
    latest: Arc<AtomicU64>,
}

impl SearchFlow {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issues a ticket for a new search, making all earlier tickets stale.
    pub fn issue_ticket(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// `true` if no search has been issued after `ticket`.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Searches the catalog for `title`.
    ///
    /// See the [module docs](self) for how each response maps to an outcome.
    pub async fn search(&self, title: &str) -> SearchOutcome {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("empty search query, skipping");
            return SearchOutcome::Skipped;
        }

        let ticket = self.issue_ticket();
        self.run(ticket, title).await
    }

    /// Runs a search under an already issued ticket.
    ///
    /// Front-ends that need the ticket before the request starts (to tag a
    /// spawned task, for instance) call [`issue_ticket`](Self::issue_ticket)
    /// and then this.
    pub async fn run(&self, ticket: SearchTicket, title: &str) -> SearchOutcome {
        let title = title.trim();
        if title.is_empty() {
            return SearchOutcome::Skipped;
        }

        tracing::debug!(title, ticket = ticket.0, "searching catalog");

        let outcome = match self.api.search(title).await {
            Ok(response) if response.is_no_results() => {
                tracing::info!(
                    title,
                    reason = response.error.as_deref().unwrap_or(""),
                    "no results"
                );
                SearchOutcome::NoResults
            }
            Ok(response) => {
                let results = response.into_results().dedupe_by_id();
                tracing::info!(title, count = results.len(), "search finished");
                SearchOutcome::Results(results)
            }
            Err(e) => {
                tracing::error!(title, error = %e, "search failed");
                SearchOutcome::Failed(SEARCH_ERROR_MESSAGE.to_string())
            }
        };

        if self.is_current(ticket) {
            outcome
        } else {
            tracing::debug!(title, ticket = ticket.0, "discarding superseded search");
            SearchOutcome::Superseded
        }
    }
}

/// Post-processing for result lists.
pub trait SearchResultExt {
    /// Removes rows whose IMDb id already appeared, keeping the first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use moviefinder::search::SearchResultExt;
    /// use moviefinder::types::SearchResult;
    ///
    /// let row = |id: &str| SearchResult {
    ///     imdb_id: id.to_string(),
    ///     title: "T".to_string(),
    ///     year: "2000".to_string(),
    ///     poster_url: "N/A".to_string(),
    /// };
    ///
    /// let results = vec![row("tt1"), row("tt2"), row("tt1")].dedupe_by_id();
    /// assert_eq!(results.len(), 2);
    /// ```
    fn dedupe_by_id(self) -> Self;
}

impl SearchResultExt for Vec<SearchResult> {
    fn dedupe_by_id(self) -> Self {
        let mut seen = HashSet::new();
        self.into_iter()
            .filter(|result| seen.insert(result.imdb_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_messages() {
        assert_eq!(SearchOutcome::NoResults.message(), Some(NO_RESULTS_MESSAGE));
        assert_eq!(
            SearchOutcome::Failed(SEARCH_ERROR_MESSAGE.to_string()).message(),
            Some(SEARCH_ERROR_MESSAGE)
        );
        assert_eq!(SearchOutcome::Results(vec![]).message(), None);
        assert_eq!(SearchOutcome::Skipped.message(), None);
    }

    #[test]
    fn skipped_and_superseded_leave_results_alone() {
        assert!(!SearchOutcome::Skipped.replaces_results());
        assert!(!SearchOutcome::Superseded.replaces_results());
        assert!(SearchOutcome::NoResults.replaces_results());
        assert!(SearchOutcome::Failed(String::new()).replaces_results());
    }
}
