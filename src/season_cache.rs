//! Per-series season cache
//!
//! Maps season numbers to their episode lists for exactly one series.
//!
//! Contract:
//! - An entry is only ever added by a successful fetch for that season, and
//!   once present it is served without asking the gateway again.
//! - A failed fetch leaves the key absent, so the next request retries. The
//!   failure message is kept per season until that retry is issued.
//! - At most one fetch per season number is in flight; requesting a pending
//!   season joins the existing fetch instead of issuing another one.
//! - Completions write only their own key, so fetches for different seasons
//!   may finish in any order.
//! - Changing the series clears everything, pending fetches included; their
//!   late responses are discarded.

use crate::controller::BrowseError;
use crate::metadata_retrieval::{Episode, MetadataRetrievalError, SeasonEntry};
use std::collections::BTreeMap;
use tracing::debug;

/// Token for one issued season fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonTicket {
    series_id: u64,
    season_number: u32,
    seq: u64,
}

impl SeasonTicket {
    pub fn series_id(&self) -> u64 {
        self.series_id
    }

    pub fn season_number(&self) -> u32 {
        self.season_number
    }
}

/// Result of asking the cache for a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonRequest {
    /// The season is cached; no fetch is needed
    Cached,
    /// A fetch for this season is already in flight
    Joined,
    /// The caller must fetch the season and complete the ticket
    Fetch(SeasonTicket),
}

/// What happened to a season response.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonCompletion {
    /// The episodes were stored under the ticket's season number
    Stored { episodes: usize },
    /// The fetch failed; nothing was cached
    Failed { error: BrowseError },
    /// The response belongs to a series or fetch that is no longer current
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct SeasonCache {
    series_id: Option<u64>,
    entries: BTreeMap<u32, SeasonEntry>,
    /// Season number -> sequence number of the fetch in flight
    pending: BTreeMap<u32, u64>,
    /// Season number -> message of its last failed fetch
    failures: BTreeMap<u32, String>,
    issued: u64,
}

impl SeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series the cache is currently scoped to.
    pub fn series_id(&self) -> Option<u64> {
        self.series_id
    }

    /// Scopes the cache to `series_id`, clearing it if the series changed.
    ///
    /// Returns `true` when the cache was reset.
    pub fn scope_to(&mut self, series_id: u64) -> bool {
        if self.series_id == Some(series_id) {
            return false;
        }

        debug!(
            previous = ?self.series_id,
            series_id,
            dropped = self.entries.len(),
            "resetting season cache for new series"
        );
        self.series_id = Some(series_id);
        self.entries.clear();
        self.pending.clear();
        self.failures.clear();
        true
    }

    pub fn get(&self, season_number: u32) -> Option<&SeasonEntry> {
        self.entries.get(&season_number)
    }

    pub fn contains(&self, season_number: u32) -> bool {
        self.entries.contains_key(&season_number)
    }

    /// Whether a fetch for the season is in flight.
    pub fn is_pending(&self, season_number: u32) -> bool {
        self.pending.contains_key(&season_number)
    }

    /// Message of the last failed fetch for the season, if no retry was issued since.
    pub fn failure(&self, season_number: u32) -> Option<&str> {
        self.failures.get(&season_number).map(String::as_str)
    }

    /// Number of cached seasons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a season, deciding whether a fetch must be issued.
    pub fn request(&mut self, series_id: u64, season_number: u32) -> SeasonRequest {
        self.scope_to(series_id);

        if self.entries.contains_key(&season_number) {
            debug!(series_id, season_number, "season cache hit");
            return SeasonRequest::Cached;
        }

        if self.pending.contains_key(&season_number) {
            debug!(series_id, season_number, "joining in-flight season fetch");
            return SeasonRequest::Joined;
        }

        self.issued += 1;
        self.pending.insert(season_number, self.issued);
        self.failures.remove(&season_number);

        SeasonRequest::Fetch(SeasonTicket {
            series_id,
            season_number,
            seq: self.issued,
        })
    }

    /// Applies a gateway response for an issued ticket.
    pub fn complete(
        &mut self,
        ticket: SeasonTicket,
        response: Result<Vec<Episode>, MetadataRetrievalError>,
    ) -> SeasonCompletion {
        if self.series_id != Some(ticket.series_id)
            || self.pending.get(&ticket.season_number) != Some(&ticket.seq)
        {
            debug!(
                series_id = ticket.series_id,
                season_number = ticket.season_number,
                "discarding season response for abandoned fetch"
            );
            return SeasonCompletion::Discarded;
        }

        self.pending.remove(&ticket.season_number);

        match response {
            Ok(episodes) => {
                let count = episodes.len();
                self.entries.insert(
                    ticket.season_number,
                    SeasonEntry {
                        season_number: ticket.season_number,
                        episodes,
                    },
                );
                SeasonCompletion::Stored { episodes: count }
            }
            Err(e) => {
                let error = BrowseError::NetworkFailure {
                    what: format!("season {}", ticket.season_number),
                    source: e,
                };
                self.failures.insert(ticket.season_number, error.to_string());
                SeasonCompletion::Failed { error }
            }
        }
    }
}
