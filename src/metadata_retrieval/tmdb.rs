//! TMDB metadata gateway implementation.

use super::tmdb_types::{
    TmdbEpisode, TmdbMovie, TmdbSearchPage, TmdbSeasonDetails, TmdbStatusBody, TmdbTvDetails,
    TmdbTvShow,
};
use super::{
    Episode, MediaKind, MetadataGateway, MetadataRetrievalError, SeriesDetail, Title, year_of,
};
use crate::config::Config;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Metadata gateway for the TMDB v3 API.
///
/// This gateway uses the `search/movie`, `search/tv`, `tv/{id}` and
/// `tv/{id}/season/{n}` endpoints. Requests are blocking; callers that need
/// to stay responsive run them off their event loop and feed the result back
/// into the controller.
pub struct TmdbGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbGateway {
    /// Creates a new TMDB gateway from the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    /// Issues a GET request and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        what: &str,
    ) -> Result<T, MetadataRetrievalError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting TMDB resource");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        let status = response.status();

        // Read the body first so error payloads can be reported
        let body = response
            .text()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataRetrievalError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), %url, "TMDB returned an error status");
            return Err(MetadataRetrievalError::Status {
                status: status.as_u16(),
                message: status_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string()),
            });
        }

        serde_json::from_str(&body).map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }

    /// Converts a TMDB movie hit to our internal Title structure.
    fn convert_movie(movie: TmdbMovie) -> Title {
        Title {
            id: movie.id,
            kind: MediaKind::Movie,
            name: movie.title,
            release_year: year_of(movie.release_date.as_deref()),
            rating: movie.vote_average,
            poster_path: movie.poster_path,
        }
    }

    /// Converts a TMDB tv hit to our internal Title structure.
    fn convert_show(show: TmdbTvShow) -> Title {
        Title {
            id: show.id,
            kind: MediaKind::Series,
            name: show.name,
            release_year: year_of(show.first_air_date.as_deref()),
            rating: show.vote_average,
            poster_path: show.poster_path,
        }
    }

    fn convert_details(details: TmdbTvDetails) -> SeriesDetail {
        SeriesDetail {
            id: details.id,
            name: details.name,
            overview: details.overview.unwrap_or_default(),
            number_of_seasons: details.number_of_seasons.unwrap_or(0),
            first_air_year: year_of(details.first_air_date.as_deref()),
            rating: details.vote_average,
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
        }
    }

    /// Converts a TMDB episode to our internal Episode structure.
    fn convert_episode(episode: TmdbEpisode) -> Episode {
        Episode {
            number: episode.episode_number,
            name: episode.name.unwrap_or_else(|| "Unknown".to_string()),
            overview: episode.overview.unwrap_or_default(),
            still_path: episode.still_path,
            rating: episode.vote_average,
            air_date: episode.air_date.filter(|d| !d.is_empty()),
            runtime_minutes: episode.runtime,
        }
    }
}

impl MetadataGateway for TmdbGateway {
    fn search_titles(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<Title>, MetadataRetrievalError> {
        let params = [("query", query)];

        // Payload order is kept as-is
        match kind {
            MediaKind::Movie => {
                let page: TmdbSearchPage<TmdbMovie> =
                    self.get_json("/search/movie", &params, "movie search")?;
                Ok(page.results.into_iter().map(Self::convert_movie).collect())
            }
            MediaKind::Series => {
                let page: TmdbSearchPage<TmdbTvShow> =
                    self.get_json("/search/tv", &params, "series search")?;
                Ok(page.results.into_iter().map(Self::convert_show).collect())
            }
        }
    }

    fn get_series_detail(&self, series_id: u64) -> Result<SeriesDetail, MetadataRetrievalError> {
        let details: TmdbTvDetails = self.get_json(
            &format!("/tv/{}", series_id),
            &[],
            &format!("series {}", series_id),
        )?;
        Ok(Self::convert_details(details))
    }

    fn get_season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataRetrievalError> {
        let season: TmdbSeasonDetails = self.get_json(
            &format!("/tv/{}/season/{}", series_id, season_number),
            &[],
            &format!("season {} of series {}", season_number, series_id),
        )?;
        Ok(season.episodes.into_iter().map(Self::convert_episode).collect())
    }
}

/// Extracts `status_message` from a TMDB error body.
fn status_message(body: &str) -> Option<String> {
    serde_json::from_str::<TmdbStatusBody>(body)
        .ok()
        .map(|b| b.status_message)
}
