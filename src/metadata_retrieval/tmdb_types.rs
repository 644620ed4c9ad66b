//! TMDB API response types for deserialization.
//!
//! These structures mirror the JSON response format of the TMDB v3 API.
//! Only the fields used by the browser are declared.

use serde::Deserialize;

/// A page of search results.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSearchPage<T> {
    /// Hits in relevance order as decided by TMDB
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A hit from `/search/movie`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbMovie {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
}

/// A hit from `/search/tv`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbTvShow {
    pub id: u64,
    pub name: String,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
}

/// The response of `/tv/{id}`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbTvDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// The response of `/tv/{id}/season/{n}`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSeasonDetails {
    #[serde(default = "Vec::new")]
    pub episodes: Vec<TmdbEpisode>,
}

/// A single episode inside a season response.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbEpisode {
    pub episode_number: u32,
    /// Episode title (may be null for unannounced episodes)
    pub name: Option<String>,
    pub overview: Option<String>,
    pub still_path: Option<String>,
    pub vote_average: Option<f64>,
    pub air_date: Option<String>,
    pub runtime: Option<u32>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbStatusBody {
    pub status_message: String,
}
