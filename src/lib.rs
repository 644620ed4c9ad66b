//! Moviegram - search movies and TV series and browse their episodes
//!
//! This library provides the browse state controller behind the Moviegram
//! catalog: the search tab, lazily fetched and memoized season episode lists,
//! the projections views render from, and the playback targets episode and
//! movie selections resolve to.

mod config;
mod controller;
mod metadata_retrieval;
mod navigation;
mod search_state;
mod season_cache;
mod view_projection;

#[cfg(test)]
mod test_support;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_EMBED_BASE_URL, DEFAULT_IMAGE_BASE_URL,
    DEFAULT_LANGUAGE,
};
pub use controller::{BrowseController, BrowseState, EpisodeSelection, SeriesTicket};
pub use metadata_retrieval::{
    Episode, MediaKind, MetadataGateway, SeasonEntry, SeriesDetail, Title, TmdbGateway,
};
pub use navigation::{Destination, PlaybackTarget, resolve_playback_target};
pub use search_state::{SearchOutcome, SearchResultSet, SearchTicket};
pub use season_cache::{SeasonCache, SeasonCompletion, SeasonRequest, SeasonTicket};
pub use view_projection::{
    ResultsView, SeasonView, SeriesView, empty_message, project_results, project_season,
    project_series,
};

// Re-export error types
pub use config::ConfigError;
pub use controller::BrowseError;
pub use metadata_retrieval::MetadataRetrievalError;

use thiserror::Error;

/// Top-level error type for Moviegram operations
#[derive(Debug, Error)]
pub enum MoviegramError {
    /// Error in the supplied configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error raised by the browse controller
    #[error("{0}")]
    Browse(#[from] BrowseError),

    /// Error from an interactive prompt
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Creates a browse controller talking to TMDB
///
/// The configuration is validated first, so a missing API key is reported
/// before any request is made.
///
/// # Examples
///
/// ```no_run
/// use moviegram::{Config, MediaKind, ResultsView, open_session};
///
/// let mut session = open_session(&Config::new("my-tmdb-key")).unwrap();
/// session.set_active_kind(MediaKind::Series);
/// session.search("Game of Thrones");
///
/// if let ResultsView::Populated(titles) = session.results_view() {
///     for title in titles {
///         println!("{} ({})", title.name, title.year_label());
///     }
/// }
/// ```
pub fn open_session(config: &Config) -> Result<BrowseController<TmdbGateway>, MoviegramError> {
    config.validate()?;
    Ok(BrowseController::new(TmdbGateway::new(config)))
}
