//! Catalog search.
//!
//! [`SearchEngine`] maps the text in a search box to a product list through
//! the backend's search endpoint. Lookups are never cancelled; instead each
//! response is tagged with the query change that issued it and dropped if a
//! newer change has happened since (see [`state`]).
//!
//! The engine is independent of the session: search needs no credential.

mod state;

pub use state::{Resolution, SearchPhase, SearchSnapshot, SearchTicket};

use std::sync::{Mutex, MutexGuard, PoisonError};

use bloom_core::Product;
use tracing::instrument;

use crate::api::{ApiError, CatalogBackend};
use state::SearchState;

/// Catalog search engine.
///
/// Safe to drive from several concurrent tasks; the internal lock is never
/// held across an await.
pub struct SearchEngine<B> {
    backend: B,
    state: Mutex<SearchState>,
}

impl<B: CatalogBackend> SearchEngine<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Handle a change of the search text: look up the trimmed query and
    /// apply the outcome if it is still current.
    #[instrument(skip(self))]
    pub async fn query_changed(&self, text: &str) -> Resolution {
        let Some(ticket) = self.begin(text) else {
            return Resolution::Cleared;
        };
        tracing::debug!(seq = ticket.seq(), query = ticket.query(), "search issued");
        let outcome = self.backend.search_products(ticket.query()).await;
        self.resolve(&ticket, outcome)
    }

    /// Apply a query change without performing the lookup.
    ///
    /// Returns the ticket to look up, or `None` if the query is empty (the
    /// engine is then idle with no results).
    pub fn begin(&self, text: &str) -> Option<SearchTicket> {
        self.lock().begin(text)
    }

    /// Apply the outcome of a lookup issued under `ticket`.
    pub fn resolve(
        &self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Product>, ApiError>,
    ) -> Resolution {
        self.lock().resolve(ticket, outcome)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.lock().phase()
    }

    /// Current phase, query and visible results.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B> std::fmt::Debug for SearchEngine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine").finish_non_exhaustive()
    }
}
