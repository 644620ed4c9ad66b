//! Search tab state
//!
//! Holds the active catalog kind, the last committed result set and the
//! sequence bookkeeping that keeps stale responses from committing.

use crate::controller::BrowseError;
use crate::metadata_retrieval::{MediaKind, MetadataRetrievalError, Title};
use tracing::debug;

/// Results of one successful search, replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultSet {
    /// Catalog the results came from
    pub kind: MediaKind,
    /// Trimmed query that produced the results
    pub query: String,
    /// Titles in gateway order
    pub items: Vec<Title>,
}

/// Token handed out when a search is issued.
///
/// The caller passes it back together with the gateway response; only the
/// ticket of the most recently issued search may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    kind: MediaKind,
    query: String,
}

impl SearchTicket {
    /// Catalog to search.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Trimmed query to send to the gateway.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sequence number of this request.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a search response.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results replaced the current result set
    Committed { count: usize },
    /// The gateway failed; the result set was cleared
    Failed { error: BrowseError },
    /// A newer search (or a tab switch) superseded this response
    Stale,
}

/// State of the search tab
#[derive(Debug, Clone)]
pub struct SearchState {
    active_kind: MediaKind,
    results: Option<SearchResultSet>,
    is_loading: bool,
    /// Last sequence number handed out
    issued: u64,
    /// Sequence number allowed to commit, if a search is in flight
    in_flight: Option<u64>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(MediaKind::Movie)
    }
}

impl SearchState {
    pub fn new(active_kind: MediaKind) -> Self {
        Self {
            active_kind,
            results: None,
            is_loading: false,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn active_kind(&self) -> MediaKind {
        self.active_kind
    }

    pub fn results(&self) -> Option<&SearchResultSet> {
        self.results.as_ref()
    }

    /// Whether a search request is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Switches the catalog kind.
    ///
    /// Clears the result set and drops any in-flight search so its response
    /// cannot land in the new tab. Returns `false` (and changes nothing) when
    /// the kind is already active.
    pub fn set_active_kind(&mut self, kind: MediaKind) -> bool {
        if self.active_kind == kind {
            return false;
        }

        self.active_kind = kind;
        self.results = None;
        self.in_flight = None;
        self.is_loading = false;
        true
    }

    /// Issues a new search for the active kind.
    ///
    /// Returns `None` for queries that are empty after trimming; no request
    /// should be made in that case. Issuing a search supersedes any search
    /// still in flight.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.issued += 1;
        if let Some(previous) = self.in_flight.replace(self.issued) {
            debug!(previous, current = self.issued, "superseding in-flight search");
        }
        self.is_loading = true;

        Some(SearchTicket {
            seq: self.issued,
            kind: self.active_kind,
            query: query.to_string(),
        })
    }

    /// Applies a gateway response to the state.
    ///
    /// Responses whose ticket is not the one currently in flight are
    /// discarded without touching the state.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        response: Result<Vec<Title>, MetadataRetrievalError>,
    ) -> SearchOutcome {
        if self.in_flight != Some(ticket.seq) {
            debug!(seq = ticket.seq, query = %ticket.query, "discarding stale search response");
            return SearchOutcome::Stale;
        }

        self.in_flight = None;
        self.is_loading = false;

        match response {
            Ok(items) => {
                let count = items.len();
                self.results = Some(SearchResultSet {
                    kind: ticket.kind,
                    query: ticket.query,
                    items,
                });
                SearchOutcome::Committed { count }
            }
            Err(e) => {
                self.results = None;
                SearchOutcome::Failed {
                    error: BrowseError::NetworkFailure {
                        what: ticket.kind.plural().to_string(),
                        source: e,
                    },
                }
            }
        }
    }
}
