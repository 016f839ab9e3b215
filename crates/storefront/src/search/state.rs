//! Search state machine.
//!
//! Pure transitions with no I/O. Every query change bumps a sequence number;
//! a lookup's outcome is committed only if its ticket still carries the
//! current sequence number, so the visible results always belong to the
//! last query issued regardless of the order responses arrive in.

use bloom_core::Product;

use crate::api::ApiError;

/// Visible phase of the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Query is empty; nothing shown.
    #[default]
    Idle,
    /// A lookup for the current query is in flight.
    Loading,
    /// Results for the current query are shown.
    Success,
    /// The lookup for the current query failed.
    Error,
}

/// Tag for one issued lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    /// Sequence number of the query change that issued this lookup.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Trimmed query to look up.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What happened when a lookup outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The query was empty; no lookup was issued.
    Cleared,
    /// Results were committed for the current query.
    Committed,
    /// The query changed while the lookup was in flight; outcome discarded.
    Stale,
    /// The lookup for the current query failed.
    Failed,
}

/// Point-in-time view of the search state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSnapshot {
    pub phase: SearchPhase,
    pub query: String,
    pub results: Vec<Product>,
}

#[derive(Debug, Default)]
pub(crate) struct SearchState {
    seq: u64,
    phase: SearchPhase,
    query: String,
    results: Vec<Product>,
}

impl SearchState {
    /// Apply a query change. Returns the ticket for the lookup to issue, or
    /// `None` if the trimmed query is empty.
    pub(crate) fn begin(&mut self, raw: &str) -> Option<SearchTicket> {
        self.seq += 1;
        let query = raw.trim();

        if query.is_empty() {
            self.phase = SearchPhase::Idle;
            self.query.clear();
            self.results.clear();
            return None;
        }

        self.phase = SearchPhase::Loading;
        query.clone_into(&mut self.query);
        Some(SearchTicket {
            seq: self.seq,
            query: self.query.clone(),
        })
    }

    /// Apply the outcome of the lookup issued under `ticket`.
    pub(crate) fn resolve(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Product>, ApiError>,
    ) -> Resolution {
        if ticket.seq != self.seq {
            tracing::debug!(
                query = %ticket.query,
                seq = ticket.seq,
                current = self.seq,
                "discarding stale search response"
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(products) => {
                self.phase = SearchPhase::Success;
                self.results = products;
                Resolution::Committed
            }
            Err(e) => {
                tracing::error!(query = %ticket.query, error = %e, "search failed");
                self.phase = SearchPhase::Error;
                self.results.clear();
                Resolution::Failed
            }
        }
    }

    pub(crate) const fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub(crate) fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            phase: self.phase,
            query: self.query.clone(),
            results: self.results.clone(),
        }
    }
}
