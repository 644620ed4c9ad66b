//! Fixtures and a scripted gateway shared by the unit tests.

use crate::metadata_retrieval::{
    Episode, MediaKind, MetadataGateway, MetadataRetrievalError, SeriesDetail, Title,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

pub(crate) fn title(kind: MediaKind, id: u64, name: &str) -> Title {
    Title {
        id,
        kind,
        name: name.to_string(),
        release_year: Some("2010".to_string()),
        rating: Some(8.4),
        poster_path: None,
    }
}

/// Episodes numbered `1..=count`.
pub(crate) fn episodes(count: u32) -> Vec<Episode> {
    (1..=count)
        .map(|number| Episode {
            number,
            name: format!("Episode {}", number),
            overview: String::new(),
            still_path: None,
            rating: None,
            air_date: None,
            runtime_minutes: Some(55),
        })
        .collect()
}

pub(crate) fn series_detail(id: u64, number_of_seasons: u32) -> SeriesDetail {
    SeriesDetail {
        id,
        name: format!("Series {}", id),
        overview: String::new(),
        number_of_seasons,
        first_air_year: None,
        rating: None,
        poster_path: None,
        backdrop_path: None,
    }
}

/// Gateway answering from in-memory fixtures and recording every call.
#[derive(Default)]
pub(crate) struct FakeGateway {
    titles: BTreeMap<MediaKind, Vec<Title>>,
    series: BTreeMap<u64, SeriesDetail>,
    seasons: BTreeMap<(u64, u32), u32>,
    failing: RefCell<BTreeSet<(u64, u32)>>,
    fail_search: bool,
    pub search_calls: RefCell<Vec<(MediaKind, String)>>,
    pub detail_calls: RefCell<Vec<u64>>,
    pub season_calls: RefCell<Vec<(u64, u32)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_titles(mut self, kind: MediaKind, titles: Vec<Title>) -> Self {
        self.titles.insert(kind, titles);
        self
    }

    pub fn with_series(mut self, id: u64, number_of_seasons: u32) -> Self {
        self.series.insert(id, series_detail(id, number_of_seasons));
        self
    }

    pub fn with_season(mut self, series_id: u64, season_number: u32, episode_count: u32) -> Self {
        self.seasons.insert((series_id, season_number), episode_count);
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Makes fetches of one season fail until [`FakeGateway::recover_season`].
    pub fn fail_season(&self, series_id: u64, season_number: u32) {
        self.failing.borrow_mut().insert((series_id, season_number));
    }

    pub fn recover_season(&self, series_id: u64, season_number: u32) {
        self.failing.borrow_mut().remove(&(series_id, season_number));
    }

    pub fn season_call_count(&self, series_id: u64, season_number: u32) -> usize {
        self.season_calls
            .borrow()
            .iter()
            .filter(|call| **call == (series_id, season_number))
            .count()
    }
}

impl MetadataGateway for FakeGateway {
    fn search_titles(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<Title>, MetadataRetrievalError> {
        self.search_calls.borrow_mut().push((kind, query.to_string()));
        if self.fail_search {
            return Err(MetadataRetrievalError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(self.titles.get(&kind).cloned().unwrap_or_default())
    }

    fn get_series_detail(&self, series_id: u64) -> Result<SeriesDetail, MetadataRetrievalError> {
        self.detail_calls.borrow_mut().push(series_id);
        self.series
            .get(&series_id)
            .cloned()
            .ok_or_else(|| MetadataRetrievalError::NotFound(format!("series {}", series_id)))
    }

    fn get_season_episodes(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Vec<Episode>, MetadataRetrievalError> {
        self.season_calls.borrow_mut().push((series_id, season_number));
        if self.failing.borrow().contains(&(series_id, season_number)) {
            return Err(MetadataRetrievalError::RequestError(
                "connection reset by peer".to_string(),
            ));
        }
        self.seasons
            .get(&(series_id, season_number))
            .map(|count| episodes(*count))
            .ok_or_else(|| {
                MetadataRetrievalError::NotFound(format!(
                    "season {} of series {}",
                    season_number, series_id
                ))
            })
    }
}
