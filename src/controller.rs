//! Browse state controller
//!
//! [`BrowseController`] owns the whole browse session: the search tab, the
//! series being looked at, its season cache and the last episode selection.
//! One controller is created per view and dropped with it.
//!
//! Every fetch is split into a `begin_*` call that hands out a ticket and a
//! `complete_*` call that applies the gateway response for that ticket. An
//! event loop can run the gateway call wherever it likes and feed the result
//! back later; responses whose ticket has been superseded are dropped on
//! arrival. The non-prefixed methods (`search`, `open_series`,
//! `switch_season`, ...) run begin, fetch and complete back to back against
//! the controller's own gateway.

use crate::metadata_retrieval::{
    Episode, MediaKind, MetadataGateway, MetadataRetrievalError, SeasonEntry, SeriesDetail, Title,
};
use crate::navigation::{PlaybackTarget, resolve_playback_target};
use crate::search_state::{SearchOutcome, SearchResultSet, SearchState, SearchTicket};
use crate::season_cache::{SeasonCache, SeasonCompletion, SeasonRequest, SeasonTicket};
use crate::view_projection::{self, ResultsView, SeasonView, SeriesView};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the browse controller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrowseError {
    /// The gateway was unreachable or answered with a non-success status
    #[error("Failed to fetch {what}: {source}")]
    NetworkFailure {
        what: String,
        source: MetadataRetrievalError,
    },

    /// Malformed or missing identifiers
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The episode is not part of the cached active season
    #[error("Episode {episode} not found in season {season}")]
    EpisodeNotFound { season: u32, episode: u32 },
}

/// The episode picked last, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSelection {
    pub season_number: u32,
    pub episode_number: u32,
}

/// Token for an issued series detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesTicket {
    series_id: u64,
    seq: u64,
}

impl SeriesTicket {
    pub fn series_id(&self) -> u64 {
        self.series_id
    }
}

#[derive(Debug, Clone)]
struct SeriesContext {
    id: u64,
    detail: Option<SeriesDetail>,
    /// Sequence number of the detail fetch in flight
    pending_detail: Option<u64>,
}

/// Session-scoped browse state
///
/// Only the controller mutates it; everything else reads it through the
/// accessors or the view projections.
#[derive(Debug, Clone)]
pub struct BrowseState {
    search: SearchState,
    series: Option<SeriesContext>,
    active_season: u32,
    seasons: SeasonCache,
    selection: Option<EpisodeSelection>,
    /// Failure of the committed search, shown by the results view
    search_error: Option<String>,
    /// Failure of the series detail fetch, shown by the series view
    series_error: Option<String>,
    /// Most recent failure of any fetch
    last_error: Option<String>,
    detail_issued: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            search: SearchState::default(),
            series: None,
            active_season: 1,
            seasons: SeasonCache::new(),
            selection: None,
            search_error: None,
            series_error: None,
            last_error: None,
            detail_issued: 0,
        }
    }
}

impl BrowseState {
    pub fn active_kind(&self) -> MediaKind {
        self.search.active_kind()
    }

    /// Committed results of the active tab.
    pub fn search_results(&self) -> Option<&SearchResultSet> {
        self.search.results()
    }

    /// Whether a search is in flight.
    pub fn is_loading(&self) -> bool {
        self.search.is_loading()
    }

    /// Human readable message of the last failure, whichever fetch it came from.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Message of the failed search on the active tab.
    ///
    /// Never set together with [`BrowseState::search_results`].
    pub fn search_error(&self) -> Option<&str> {
        self.search_error.as_deref()
    }

    /// Message of the failed detail fetch of the active series.
    pub fn series_error(&self) -> Option<&str> {
        self.series_error.as_deref()
    }

    pub fn active_series_id(&self) -> Option<u64> {
        self.series.as_ref().map(|s| s.id)
    }

    pub fn series_detail(&self) -> Option<&SeriesDetail> {
        self.series.as_ref().and_then(|s| s.detail.as_ref())
    }

    /// Whether the detail of the active series is being fetched.
    pub fn is_series_loading(&self) -> bool {
        self.series
            .as_ref()
            .is_some_and(|s| s.pending_detail.is_some())
    }

    pub fn active_season(&self) -> u32 {
        self.active_season
    }

    pub fn season_cache(&self) -> &SeasonCache {
        &self.seasons
    }

    /// Cached entry of the active season.
    pub fn active_season_entry(&self) -> Option<&SeasonEntry> {
        self.seasons.get(self.active_season)
    }

    pub fn selection(&self) -> Option<EpisodeSelection> {
        self.selection
    }
}

/// Controller owning one browse session and the gateway it talks to
pub struct BrowseController<G> {
    gateway: G,
    state: BrowseState,
}

impl<G: MetadataGateway> BrowseController<G> {
    /// Creates a controller with empty state.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: BrowseState::default(),
        }
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        view_projection::project_results(&self.state)
    }

    pub fn series_view(&self) -> SeriesView<'_> {
        view_projection::project_series(&self.state)
    }

    pub fn season_view(&self) -> SeasonView<'_> {
        view_projection::project_season(&self.state)
    }

    // ---- search ----

    /// Switches the catalog tab, clearing results and the last error.
    ///
    /// The season cache is left alone. Selecting the active kind again does
    /// nothing.
    pub fn set_active_kind(&mut self, kind: MediaKind) {
        if self.state.search.set_active_kind(kind) {
            info!(%kind, "switched catalog");
            self.state.search_error = None;
            self.state.last_error = None;
        }
    }

    /// Issues a search for the active kind, or returns `None` for a blank query.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let ticket = self.state.search.begin(query)?;
        self.state.search_error = None;
        self.state.last_error = None;
        info!(
            seq = ticket.seq(),
            kind = %ticket.kind(),
            query = ticket.query(),
            "issuing search"
        );
        Some(ticket)
    }

    /// Applies the gateway response for a search ticket.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        response: Result<Vec<Title>, MetadataRetrievalError>,
    ) -> SearchOutcome {
        let outcome = self.state.search.complete(ticket, response);
        match &outcome {
            SearchOutcome::Committed { count } => {
                info!(count, "search results committed");
            }
            SearchOutcome::Failed { error } => {
                warn!(%error, "search failed");
                self.state.search_error = Some(error.to_string());
                self.state.last_error = self.state.search_error.clone();
            }
            SearchOutcome::Stale => {}
        }
        outcome
    }

    /// Runs a search against the gateway and commits the response.
    ///
    /// Returns `None` when the query is blank and no request was made.
    pub fn search(&mut self, query: &str) -> Option<SearchOutcome> {
        let ticket = self.begin_search(query)?;
        let response = self.gateway.search_titles(ticket.kind(), ticket.query());
        Some(self.complete_search(ticket, response))
    }

    // ---- series ----

    /// Makes `series_id` the active series.
    ///
    /// Changing series clears the season cache, resets the active season to 1
    /// and forgets the episode selection.
    fn enter_series(&mut self, series_id: u64) {
        if self.state.active_series_id() == Some(series_id) {
            return;
        }

        self.state.series = Some(SeriesContext {
            id: series_id,
            detail: None,
            pending_detail: None,
        });
        self.state.seasons.scope_to(series_id);
        self.state.active_season = 1;
        self.state.selection = None;
        self.state.series_error = None;
    }

    /// Navigates to a series and issues its detail fetch.
    pub fn begin_open_series(&mut self, series_id: u64) -> SeriesTicket {
        self.enter_series(series_id);
        self.state.series_error = None;
        self.state.last_error = None;

        self.state.detail_issued += 1;
        let seq = self.state.detail_issued;
        if let Some(series) = self.state.series.as_mut() {
            series.pending_detail = Some(seq);
        }

        info!(series_id, "fetching series details");
        SeriesTicket { series_id, seq }
    }

    /// Applies the gateway response for a series detail ticket.
    ///
    /// Returns `true` when the detail was stored.
    pub fn complete_series_detail(
        &mut self,
        ticket: SeriesTicket,
        response: Result<SeriesDetail, MetadataRetrievalError>,
    ) -> bool {
        let Some(series) = self.state.series.as_mut() else {
            return false;
        };
        if series.id != ticket.series_id || series.pending_detail != Some(ticket.seq) {
            debug!(
                series_id = ticket.series_id,
                "discarding detail response for abandoned series"
            );
            return false;
        }

        series.pending_detail = None;
        match response {
            Ok(detail) => {
                series.detail = Some(detail);
                true
            }
            Err(source) => {
                let error = BrowseError::NetworkFailure {
                    what: "series details".to_string(),
                    source,
                };
                warn!(series_id = ticket.series_id, %error, "series detail fetch failed");
                self.state.series_error = Some(error.to_string());
                self.state.last_error = self.state.series_error.clone();
                false
            }
        }
    }

    /// Opens a series: fetches its detail and the active season.
    pub fn open_series(&mut self, series_id: u64) -> Option<&SeasonEntry> {
        let ticket = self.begin_open_series(series_id);
        let response = self.gateway.get_series_detail(series_id);
        self.complete_series_detail(ticket, response);

        let request = self
            .state
            .seasons
            .request(series_id, self.state.active_season);
        self.drive_season(request);
        self.state.active_season_entry()
    }

    // ---- seasons ----

    /// Looks up a season of `series_id`, issuing a fetch on a miss.
    ///
    /// Asking for a series other than the active one navigates to it.
    pub fn begin_season(
        &mut self,
        series_id: u64,
        season_number: u32,
    ) -> Result<SeasonRequest, BrowseError> {
        if season_number == 0 {
            return Err(BrowseError::InvalidSelection(
                "season numbers start at 1".to_string(),
            ));
        }

        self.enter_series(series_id);
        let request = self.state.seasons.request(series_id, season_number);
        if let SeasonRequest::Fetch(_) = request {
            info!(series_id, season_number, "fetching season");
        }
        Ok(request)
    }

    /// Applies the gateway response for a season ticket.
    pub fn complete_season(
        &mut self,
        ticket: SeasonTicket,
        response: Result<Vec<Episode>, MetadataRetrievalError>,
    ) -> SeasonCompletion {
        let completion = self.state.seasons.complete(ticket, response);
        match &completion {
            SeasonCompletion::Stored { episodes } => {
                info!(
                    series_id = ticket.series_id(),
                    season_number = ticket.season_number(),
                    episodes,
                    "season cached"
                );
            }
            SeasonCompletion::Failed { error } => {
                warn!(
                    series_id = ticket.series_id(),
                    season_number = ticket.season_number(),
                    %error,
                    "season fetch failed"
                );
                self.state.last_error = Some(error.to_string());
            }
            SeasonCompletion::Discarded => {}
        }
        completion
    }

    /// Returns a season, fetching it from the gateway unless cached.
    ///
    /// On a failed fetch the error is recorded in the state and `Ok(None)`
    /// is returned; the next call retries.
    pub fn get_or_fetch_season(
        &mut self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Option<&SeasonEntry>, BrowseError> {
        let request = self.begin_season(series_id, season_number)?;
        self.drive_season(request);
        Ok(self.state.seasons.get(season_number))
    }

    /// Makes `season_number` the visible season and requests it.
    ///
    /// The visible season is decided here alone; fetch completions never
    /// change it.
    pub fn begin_switch_season(
        &mut self,
        season_number: u32,
    ) -> Result<SeasonRequest, BrowseError> {
        let series_id = self
            .state
            .active_series_id()
            .ok_or_else(|| BrowseError::InvalidSelection("no series is open".to_string()))?;

        if season_number == 0 {
            return Err(BrowseError::InvalidSelection(
                "season numbers start at 1".to_string(),
            ));
        }
        if let Some(detail) = self.state.series_detail() {
            if season_number > detail.number_of_seasons {
                return Err(BrowseError::InvalidSelection(format!(
                    "season {} out of range, '{}' has {} season(s)",
                    season_number, detail.name, detail.number_of_seasons
                )));
            }
        }

        self.state.active_season = season_number;
        self.begin_season(series_id, season_number)
    }

    /// Switches the visible season and fetches it if needed.
    pub fn switch_season(
        &mut self,
        season_number: u32,
    ) -> Result<Option<&SeasonEntry>, BrowseError> {
        let request = self.begin_switch_season(season_number)?;
        self.drive_season(request);
        Ok(self.state.seasons.get(season_number))
    }

    /// Performs the fetch for a season request, if one was issued.
    fn drive_season(&mut self, request: SeasonRequest) {
        if let SeasonRequest::Fetch(ticket) = request {
            let response = self
                .gateway
                .get_season_episodes(ticket.series_id(), ticket.season_number());
            self.complete_season(ticket, response);
        }
    }

    // ---- selection ----

    /// Selects an episode of the active season and resolves its playback target.
    pub fn select_episode(
        &mut self,
        season_number: u32,
        episode_number: u32,
    ) -> Result<PlaybackTarget, BrowseError> {
        let series_id = self
            .state
            .active_series_id()
            .ok_or_else(|| BrowseError::InvalidSelection("no series is open".to_string()))?;

        let not_found = BrowseError::EpisodeNotFound {
            season: season_number,
            episode: episode_number,
        };
        if season_number != self.state.active_season {
            return Err(not_found);
        }
        let cached = self
            .state
            .seasons
            .get(season_number)
            .and_then(|entry| entry.episode(episode_number));
        if cached.is_none() {
            return Err(not_found);
        }

        let series_id = i64::try_from(series_id).map_err(|_| {
            BrowseError::InvalidSelection(format!("series id {} out of range", series_id))
        })?;
        let target = resolve_playback_target(
            MediaKind::Series,
            &[
                series_id,
                i64::from(season_number),
                i64::from(episode_number),
            ],
        )?;

        self.state.selection = Some(EpisodeSelection {
            season_number,
            episode_number,
        });
        debug!(path = %target, "episode selected");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, episodes, series_detail, title};
    use proptest::prelude::*;

    fn got_gateway() -> FakeGateway {
        let mut gateway = FakeGateway::new().with_series(1399, 8);
        for season in 1..=8 {
            gateway = gateway.with_season(1399, season, 10);
        }
        gateway.with_series(1396, 5).with_season(1396, 1, 7)
    }

    fn fetch_ticket(request: SeasonRequest) -> SeasonTicket {
        match request {
            SeasonRequest::Fetch(ticket) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = BrowseController::new(FakeGateway::new());
        let state = controller.state();
        assert_eq!(state.active_kind(), MediaKind::Movie);
        assert!(state.search_results().is_none());
        assert_eq!(state.active_series_id(), None);
        assert_eq!(state.active_season(), 1);
        assert!(!state.is_loading());
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_blank_search_makes_no_request() {
        let mut controller = BrowseController::new(FakeGateway::new());
        assert_eq!(controller.search("   "), None);
        assert!(controller.gateway().search_calls.borrow().is_empty());
    }

    #[test]
    fn test_search_then_switch_kind_clears_results() {
        let gateway = FakeGateway::new()
            .with_titles(MediaKind::Movie, vec![title(MediaKind::Movie, 27205, "Inception")]);
        let mut controller = BrowseController::new(gateway);

        controller.search("Inception");
        let results = controller.state().search_results().unwrap();
        assert_eq!(results.kind, MediaKind::Movie);
        assert_eq!(results.items[0].id, 27205);

        controller.set_active_kind(MediaKind::Series);
        assert_eq!(controller.state().active_kind(), MediaKind::Series);
        assert!(controller.state().search_results().is_none());
    }

    #[test]
    fn test_set_active_kind_twice_matches_once() {
        let gateway = FakeGateway::new()
            .with_titles(MediaKind::Series, vec![title(MediaKind::Series, 1399, "Game of Thrones")]);
        let mut once = BrowseController::new(&gateway);
        let mut twice = BrowseController::new(&gateway);
        for controller in [&mut once, &mut twice] {
            controller.set_active_kind(MediaKind::Series);
            controller.search("Thrones");
        }

        once.set_active_kind(MediaKind::Movie);
        twice.set_active_kind(MediaKind::Movie);
        twice.set_active_kind(MediaKind::Movie);

        assert_eq!(once.state().active_kind(), twice.state().active_kind());
        assert_eq!(once.state().search_results(), twice.state().search_results());
        assert_eq!(once.state().last_error(), twice.state().last_error());
        assert_eq!(once.state().is_loading(), twice.state().is_loading());
    }

    #[test]
    fn test_search_failure_is_recorded() {
        let mut controller = BrowseController::new(FakeGateway::new().failing_search());
        let outcome = controller.search("Inception").unwrap();

        assert!(matches!(
            outcome,
            SearchOutcome::Failed {
                error: BrowseError::NetworkFailure { .. }
            }
        ));
        assert_eq!(
            controller.state().last_error(),
            Some("Failed to fetch movies: HTTP 500: Internal Server Error")
        );
        assert!(controller.state().search_results().is_none());
        assert!(!controller.state().is_loading());
    }

    #[test]
    fn test_new_search_clears_previous_error() {
        let mut controller = BrowseController::new(FakeGateway::new().failing_search());
        controller.search("Inception");
        let _ticket = controller.begin_search("Inception").unwrap();
        assert_eq!(controller.state().last_error(), None);
        assert!(controller.state().is_loading());
    }

    #[test]
    fn test_same_query_fetches_again() {
        let mut controller = BrowseController::new(FakeGateway::new());
        controller.search("Inception");
        controller.search("Inception");
        assert_eq!(controller.gateway().search_calls.borrow().len(), 2);
    }

    #[test]
    fn test_late_stale_error_does_not_surface() {
        let mut controller = BrowseController::new(FakeGateway::new());
        let slow = controller.begin_search("A").unwrap();
        let fresh = controller.begin_search("B").unwrap();

        let outcome = controller.complete_search(
            slow,
            Err(MetadataRetrievalError::RequestError("timeout".to_string())),
        );
        assert_eq!(outcome, SearchOutcome::Stale);
        assert_eq!(controller.state().last_error(), None);
        assert!(controller.state().is_loading());

        controller.complete_search(fresh, Ok(vec![title(MediaKind::Movie, 2, "B")]));
        assert_eq!(controller.state().search_results().unwrap().query, "B");
    }

    #[test]
    fn test_open_series_loads_detail_and_first_season() {
        let mut controller = BrowseController::new(got_gateway());
        let entry = controller.open_series(1399).unwrap();
        assert_eq!(entry.season_number, 1);
        assert_eq!(entry.episodes.len(), 10);
        assert_eq!(*controller.gateway().detail_calls.borrow(), vec![1399]);

        let state = controller.state();
        assert_eq!(state.active_series_id(), Some(1399));
        assert_eq!(state.series_detail().unwrap().number_of_seasons, 8);
        assert!(!state.is_series_loading());
    }

    #[test]
    fn test_cached_season_skips_gateway() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);
        controller.switch_season(3).unwrap();
        controller.switch_season(1).unwrap();
        controller.switch_season(3).unwrap();
        controller.get_or_fetch_season(1399, 3).unwrap();

        assert_eq!(controller.gateway().season_call_count(1399, 1), 1);
        assert_eq!(controller.gateway().season_call_count(1399, 3), 1);
    }

    #[test]
    fn test_failed_season_is_retried() {
        let gateway = got_gateway();
        gateway.fail_season(1399, 2);
        let mut controller = BrowseController::new(gateway);
        controller.open_series(1399);

        assert_eq!(controller.switch_season(2).unwrap(), None);
        assert_eq!(
            controller.state().last_error(),
            Some("Failed to fetch season 2: Request failed: connection reset by peer")
        );
        assert!(!controller.state().season_cache().contains(2));

        controller.gateway().recover_season(1399, 2);
        assert_eq!(controller.switch_season(2).unwrap().unwrap().episodes.len(), 10);
        assert_eq!(controller.gateway().season_call_count(1399, 2), 2);
    }

    #[test]
    fn test_pending_season_joins_in_flight_fetch() {
        let mut controller = BrowseController::new(got_gateway());
        let detail = controller.begin_open_series(1399);
        controller.complete_series_detail(detail, Ok(series_detail(1399, 8)));

        let ticket = fetch_ticket(controller.begin_switch_season(2).unwrap());
        assert_eq!(controller.begin_season(1399, 2).unwrap(), SeasonRequest::Joined);
        assert_eq!(controller.begin_switch_season(2).unwrap(), SeasonRequest::Joined);

        controller.complete_season(ticket, Ok(episodes(10)));
        assert!(controller.state().season_cache().contains(2));
    }

    #[test]
    fn test_late_season_completion_keeps_active_season() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);

        let season_two = fetch_ticket(controller.begin_switch_season(2).unwrap());
        assert_eq!(controller.begin_switch_season(1).unwrap(), SeasonRequest::Cached);

        let completion = controller.complete_season(season_two, Ok(episodes(9)));
        assert_eq!(completion, SeasonCompletion::Stored { episodes: 9 });

        let state = controller.state();
        assert_eq!(state.active_season(), 1);
        assert_eq!(state.season_cache().get(2).unwrap().episodes.len(), 9);
        assert_eq!(state.active_season_entry().unwrap().episodes.len(), 10);
        assert!(matches!(
            controller.season_view(),
            SeasonView::Populated(episodes) if episodes.len() == 10
        ));
    }

    #[test]
    fn test_switch_season_bounds() {
        let mut controller = BrowseController::new(got_gateway());
        assert!(matches!(
            controller.switch_season(1),
            Err(BrowseError::InvalidSelection(_))
        ));

        controller.open_series(1399);
        assert!(matches!(
            controller.switch_season(0),
            Err(BrowseError::InvalidSelection(_))
        ));
        assert!(matches!(
            controller.switch_season(9),
            Err(BrowseError::InvalidSelection(_))
        ));
        assert_eq!(controller.state().active_season(), 1);
        assert!(controller.switch_season(8).unwrap().is_some());
    }

    #[test]
    fn test_changing_series_clears_cache() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);
        controller.switch_season(4).unwrap();
        let late = fetch_ticket(controller.begin_switch_season(5).unwrap());

        controller.open_series(1396);
        let state = controller.state();
        assert_eq!(state.active_series_id(), Some(1396));
        assert_eq!(state.active_season(), 1);
        assert_eq!(state.season_cache().len(), 1);
        assert_eq!(state.active_season_entry().unwrap().episodes.len(), 7);

        assert_eq!(
            controller.complete_season(late, Ok(episodes(10))),
            SeasonCompletion::Discarded
        );
    }

    #[test]
    fn test_kind_switch_keeps_season_cache() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);
        controller.set_active_kind(MediaKind::Series);
        assert!(controller.state().season_cache().contains(1));
    }

    #[test]
    fn test_stale_series_detail_is_discarded() {
        let mut controller = BrowseController::new(got_gateway());
        let old = controller.begin_open_series(1399);
        let _current = controller.begin_open_series(1396);

        let stored = controller.complete_series_detail(old, Ok(series_detail(1399, 8)));
        assert!(!stored);
        assert!(controller.state().series_detail().is_none());
        assert!(controller.state().is_series_loading());
    }

    #[test]
    fn test_series_detail_failure() {
        let mut controller = BrowseController::new(FakeGateway::new().with_season(42, 1, 3));
        controller.open_series(42);
        assert_eq!(
            controller.state().last_error(),
            Some("Failed to fetch series details: Not found: series 42")
        );
        assert!(matches!(controller.series_view(), SeriesView::ErrorDisplay(_)));
    }

    #[test]
    fn test_select_episode_resolves_target() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);
        controller.switch_season(2).unwrap();

        let target = controller.select_episode(2, 5).unwrap();
        assert_eq!(target.path(), "series/1399/2/5");
        assert_eq!(
            controller.state().selection(),
            Some(EpisodeSelection {
                season_number: 2,
                episode_number: 5,
            })
        );
    }

    #[test]
    fn test_select_missing_episode() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);

        assert_eq!(
            controller.select_episode(1, 99),
            Err(BrowseError::EpisodeNotFound {
                season: 1,
                episode: 99,
            })
        );
        assert_eq!(controller.state().selection(), None);
    }

    #[test]
    fn test_select_episode_outside_active_season() {
        let mut controller = BrowseController::new(got_gateway());
        controller.open_series(1399);
        controller.switch_season(2).unwrap();
        controller.switch_season(1).unwrap();

        assert!(matches!(
            controller.select_episode(2, 1),
            Err(BrowseError::EpisodeNotFound { .. })
        ));
    }

    #[test]
    fn test_select_episode_without_series() {
        let mut controller = BrowseController::new(got_gateway());
        assert!(matches!(
            controller.select_episode(1, 1),
            Err(BrowseError::InvalidSelection(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_search_terminal_state(query in "[a-zA-Z0-9 ]*[a-zA-Z0-9][a-zA-Z0-9 ]*", fail in any::<bool>()) {
            let gateway = if fail {
                FakeGateway::new().failing_search()
            } else {
                FakeGateway::new().with_titles(MediaKind::Movie, vec![title(MediaKind::Movie, 1, "X")])
            };
            let mut controller = BrowseController::new(gateway);
            prop_assert!(controller.search(&query).is_some());

            let state = controller.state();
            prop_assert!(!state.is_loading());
            prop_assert!(state.search_results().is_some() != state.search_error().is_some());
        }

        #[test]
        fn prop_seasons_fetched_at_most_once(switches in proptest::collection::vec(1u32..=8, 1..40)) {
            let mut controller = BrowseController::new(got_gateway());
            controller.open_series(1399);
            for season in &switches {
                controller.switch_season(*season).unwrap();
            }

            for season in 1..=8 {
                prop_assert!(controller.gateway().season_call_count(1399, season) <= 1);
            }
        }

        #[test]
        fn prop_selected_episode_path_order(season in 1u32..=8, episode in 1u32..=10) {
            let mut controller = BrowseController::new(got_gateway());
            controller.open_series(1399);
            controller.switch_season(season).unwrap();

            let target = controller.select_episode(season, episode).unwrap();
            prop_assert_eq!(target.path(), format!("series/1399/{}/{}", season, episode));
        }
    }
}
