//! Playback navigation targets
//!
//! Turns a media kind plus identifiers into the canonical destination path
//! the routing layer loads the embed page for. Everything here is a pure
//! string transformation; no network access happens.

use crate::controller::BrowseError;
use crate::metadata_retrieval::{MediaKind, Title};
use std::fmt;
use std::str::FromStr;

/// A validated playback destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackTarget {
    /// A movie, played as a whole
    Movie { title_id: u64 },
    /// A single episode of a series
    Episode {
        series_id: u64,
        season_number: u32,
        episode_number: u32,
    },
}

impl PlaybackTarget {
    /// Canonical path: `movie/{id}` or `series/{id}/{season}/{episode}`.
    pub fn path(&self) -> String {
        self.to_string()
    }

    /// URL of the embed page for this target.
    ///
    /// Episodes use the embed host's `tv` route.
    pub fn embed_url(&self, embed_base_url: &str) -> String {
        let base = embed_base_url.trim_end_matches('/');
        match *self {
            PlaybackTarget::Movie { title_id } => format!("{}/movie/{}", base, title_id),
            PlaybackTarget::Episode {
                series_id,
                season_number,
                episode_number,
            } => format!(
                "{}/tv/{}/{}/{}",
                base, series_id, season_number, episode_number
            ),
        }
    }
}

impl fmt::Display for PlaybackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PlaybackTarget::Movie { title_id } => {
                write!(f, "{}/{}", MediaKind::Movie, title_id)
            }
            PlaybackTarget::Episode {
                series_id,
                season_number,
                episode_number,
            } => write!(
                f,
                "{}/{}/{}/{}",
                MediaKind::Series,
                series_id,
                season_number,
                episode_number
            ),
        }
    }
}

impl FromStr for PlaybackTarget {
    type Err = BrowseError;

    /// Parses a canonical path back into a target.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut segments = path.trim_matches('/').split('/');
        let kind = match segments.next() {
            Some("movie") => MediaKind::Movie,
            Some("series") => MediaKind::Series,
            other => {
                return Err(BrowseError::InvalidSelection(format!(
                    "unknown playback kind '{}'",
                    other.unwrap_or_default()
                )));
            }
        };

        let ids = segments
            .map(|segment| {
                segment.parse::<i64>().map_err(|_| {
                    BrowseError::InvalidSelection(format!("'{}' is not an identifier", segment))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        resolve_playback_target(kind, &ids)
    }
}

/// Where activating a search result leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Movies go straight to playback
    Playback(PlaybackTarget),
    /// Series open their detail view first
    SeriesDetail { series_id: u64 },
}

impl Destination {
    /// Route path of this destination.
    pub fn path(&self) -> String {
        match self {
            Destination::Playback(target) => target.path(),
            Destination::SeriesDetail { series_id } => {
                format!("{}/{}", MediaKind::Series, series_id)
            }
        }
    }
}

impl Title {
    /// Destination reached by activating this title's card.
    pub fn destination(&self) -> Destination {
        match self.kind {
            MediaKind::Movie => Destination::Playback(PlaybackTarget::Movie { title_id: self.id }),
            MediaKind::Series => Destination::SeriesDetail { series_id: self.id },
        }
    }
}

/// Builds a playback target from a kind and its identifiers.
///
/// Movies take exactly `[title_id]`; series episodes take exactly
/// `[series_id, season_number, episode_number]`. Every identifier must be a
/// positive integer, otherwise the selection is rejected with
/// [`BrowseError::InvalidSelection`].
pub fn resolve_playback_target(
    kind: MediaKind,
    identifiers: &[i64],
) -> Result<PlaybackTarget, BrowseError> {
    match (kind, identifiers) {
        (MediaKind::Movie, &[title_id]) => Ok(PlaybackTarget::Movie {
            title_id: positive(title_id, "title id")?,
        }),
        (MediaKind::Series, &[series_id, season_number, episode_number]) => {
            Ok(PlaybackTarget::Episode {
                series_id: positive(series_id, "series id")?,
                season_number: positive_u32(season_number, "season number")?,
                episode_number: positive_u32(episode_number, "episode number")?,
            })
        }
        (MediaKind::Movie, ids) => Err(BrowseError::InvalidSelection(format!(
            "movie playback needs exactly 1 identifier, got {}",
            ids.len()
        ))),
        (MediaKind::Series, ids) => Err(BrowseError::InvalidSelection(format!(
            "episode playback needs series id, season and episode, got {} identifier(s)",
            ids.len()
        ))),
    }
}

fn positive(value: i64, name: &str) -> Result<u64, BrowseError> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            BrowseError::InvalidSelection(format!("{} must be positive, got {}", name, value))
        })
}

fn positive_u32(value: i64, name: &str) -> Result<u32, BrowseError> {
    let value = positive(value, name)?;
    u32::try_from(value)
        .map_err(|_| BrowseError::InvalidSelection(format!("{} out of range: {}", name, value)))
}
