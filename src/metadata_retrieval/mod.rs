//! Data structures and traits for movie and TV series metadata retrieval.
//!
//! This module provides structures to represent catalog titles, series details
//! and season episode lists, as well as the trait implemented by metadata
//! gateways.

mod tmdb;
mod tmdb_types;

pub use tmdb::TmdbGateway;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataRetrievalError {
    /// Request to the metadata gateway failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The gateway answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse the gateway's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested resource was not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// The catalog a title belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Route segment used for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Plural label used by tabs and empty-state messages.
    pub fn plural(self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single movie or series returned by a search.
///
/// Identity is the pair `(kind, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    /// Catalog identifier
    pub id: u64,
    /// Which catalog the identifier belongs to
    pub kind: MediaKind,
    /// Display name (movie title or series name)
    pub name: String,
    /// Year of release or first air date
    pub release_year: Option<String>,
    /// Average user rating
    pub rating: Option<f64>,
    /// Poster image path relative to the image host
    pub poster_path: Option<String>,
}

impl Title {
    /// Release year for display, `N/A` when unknown.
    pub fn year_label(&self) -> &str {
        self.release_year.as_deref().unwrap_or("N/A")
    }

    /// Rating with one decimal, `N/A` when unknown.
    pub fn rating_label(&self) -> String {
        rating_label(self.rating)
    }

    /// Full poster URL at card size.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, "w300", self.poster_path.as_deref())
    }
}

/// Represents a single episode of a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// The episode number within the season
    pub number: u32,
    /// The episode title
    pub name: String,
    /// A brief summary or description of the episode
    pub overview: String,
    /// Still image path relative to the image host
    pub still_path: Option<String>,
    /// Average user rating
    pub rating: Option<f64>,
    /// Air date as reported by the gateway (`YYYY-MM-DD`)
    pub air_date: Option<String>,
    /// Runtime in minutes
    pub runtime_minutes: Option<u32>,
}

impl Episode {
    /// Air date for display, `TBA` when unknown.
    pub fn air_date_label(&self) -> &str {
        self.air_date.as_deref().unwrap_or("TBA")
    }

    pub fn rating_label(&self) -> String {
        rating_label(self.rating)
    }

    /// Runtime for display, `N/A` when unknown.
    pub fn runtime_label(&self) -> String {
        match self.runtime_minutes {
            Some(minutes) => format!("{} min", minutes),
            None => "N/A min".to_string(),
        }
    }

    /// Full still image URL.
    pub fn still_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, "w500", self.still_path.as_deref())
    }
}

/// Represents one season and its ordered episode list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEntry {
    /// The season number (1-based)
    pub season_number: u32,
    /// Episodes in gateway order
    pub episodes: Vec<Episode>,
}

impl SeasonEntry {
    /// Looks up an episode by its number.
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.number == number)
    }
}

/// Detail record of a TV series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub id: u64,
    pub name: String,
    pub overview: String,
    /// Number of regular seasons
    pub number_of_seasons: u32,
    pub first_air_year: Option<String>,
    pub rating: Option<f64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl SeriesDetail {
    /// Season numbers offered to a season picker.
    pub fn season_options(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.number_of_seasons
    }

    pub fn rating_label(&self) -> String {
        rating_label(self.rating)
    }
}

/// Trait for metadata gateways that can search the catalog and fetch
/// series and season information.
///
/// Implementors of this trait retrieve metadata from sources such as TMDB.
/// Latency and transport failures are the implementor's concern; callers
/// treat any error as a failed fetch.
pub trait MetadataGateway {
    /// Searches one catalog for titles matching `query`.
    ///
    /// The returned titles keep the order of the gateway's payload.
    fn search_titles(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<Title>, MetadataRetrievalError>;

    /// Fetches the detail record of a series.
    fn get_series_detail(&self, series_id: u64) -> Result<SeriesDetail, MetadataRetrievalError>;

    /// Fetches the ordered episode list of one season.
    fn get_season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataRetrievalError>;
}

impl<G: MetadataGateway + ?Sized> MetadataGateway for &G {
    fn search_titles(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<Title>, MetadataRetrievalError> {
        (**self).search_titles(kind, query)
    }

    fn get_series_detail(&self, series_id: u64) -> Result<SeriesDetail, MetadataRetrievalError> {
        (**self).get_series_detail(series_id)
    }

    fn get_season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataRetrievalError> {
        (**self).get_season_episodes(series_id, season_number)
    }
}

/// Year part of a `YYYY-MM-DD` date.
pub(crate) fn year_of(date: Option<&str>) -> Option<String> {
    date.and_then(|d| d.split('-').next())
        .filter(|year| !year.is_empty())
        .map(str::to_string)
}

fn rating_label(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{:.1}", value),
        None => "N/A".to_string(),
    }
}

fn image_url(image_base_url: &str, size: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", image_base_url.trim_end_matches('/'), size, p))
}
