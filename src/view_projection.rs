//! View projections
//!
//! Pure functions from [`BrowseState`] to the one thing a view should render.
//! When several conditions hold at once the precedence is always
//! `Loading` > `ErrorDisplay` > `Empty` > `Populated`.

use crate::controller::BrowseState;
use crate::metadata_retrieval::{Episode, MediaKind, SeriesDetail, Title};

/// What the search results area shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    ErrorDisplay(&'a str),
    /// Nothing to show for the active tab
    Empty(MediaKind),
    Populated(&'a [Title]),
}

/// What the series detail page shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesView<'a> {
    Loading,
    ErrorDisplay(&'a str),
    /// No series detail is available
    NotFound,
    Ready(&'a SeriesDetail),
}

/// What the episode list of the active season shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeasonView<'a> {
    Loading,
    ErrorDisplay(&'a str),
    /// The active season has no episodes (yet)
    Empty(u32),
    Populated(&'a [Episode]),
}

/// Message shown on an empty results tab.
pub fn empty_message(kind: MediaKind) -> String {
    format!("Search for {} to explore!", kind.plural())
}

pub fn project_results(state: &BrowseState) -> ResultsView<'_> {
    let kind = state.active_kind();

    if state.is_loading() {
        return ResultsView::Loading;
    }
    if let Some(message) = state.search_error() {
        return ResultsView::ErrorDisplay(message);
    }

    match state.search_results() {
        Some(results) if results.kind == kind && !results.items.is_empty() => {
            ResultsView::Populated(&results.items)
        }
        _ => ResultsView::Empty(kind),
    }
}

pub fn project_series(state: &BrowseState) -> SeriesView<'_> {
    if state.is_series_loading() {
        return SeriesView::Loading;
    }

    match (state.series_detail(), state.series_error()) {
        (Some(detail), _) => SeriesView::Ready(detail),
        (None, Some(message)) => SeriesView::ErrorDisplay(message),
        (None, None) => SeriesView::NotFound,
    }
}

/// Projects the episode list of the active season.
///
/// Only the active season is considered; entries of other seasons never
/// show up here regardless of when their fetches finished.
pub fn project_season(state: &BrowseState) -> SeasonView<'_> {
    let season = state.active_season();
    let cache = state.season_cache();

    if state.active_series_id().is_none() {
        return SeasonView::Empty(season);
    }
    if cache.is_pending(season) && !cache.contains(season) {
        return SeasonView::Loading;
    }
    if let Some(message) = cache.failure(season) {
        return SeasonView::ErrorDisplay(message);
    }

    match cache.get(season) {
        Some(entry) if !entry.episodes.is_empty() => SeasonView::Populated(&entry.episodes),
        _ => SeasonView::Empty(season),
    }
}
