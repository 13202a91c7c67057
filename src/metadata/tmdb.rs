//! TMDB (The Movie Database) client.

use super::{CatalogEntry, Episode, MetadataProvider, Season};
use crate::config::TmdbConfig;
use crate::error::{AppError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct TmdbProvider {
    http: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: impl Into<String>, config: &TmdbConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("medicure/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, extra_params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut params: Vec<(&str, &str)> =
            vec![("api_key", self.api_key.as_str()), ("language", self.language.as_str())];
        params.extend_from_slice(extra_params);

        debug!("GET {}", url);
        let resp = self.http.get(&url).query(&params).send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(AppError::Metadata(format!("TMDB {}: {}", status, body.trim())));
        }

        resp.json::<T>()
            .map_err(|e| AppError::Metadata(format!("TMDB parse error: {}", e)))
    }
}

impl MetadataProvider for TmdbProvider {
    fn find_by_external_id(&self, id: &str) -> Result<CatalogEntry> {
        let found: FindResponse =
            self.get(&format!("/find/{}", id), &[("external_source", "imdb_id")])?;
        found.into_entry(id)
    }

    fn get_season(&self, show_id: u64, season_number: u32) -> Result<Season> {
        let season: SeasonResponse =
            self.get(&format!("/tv/{}/season/{}", show_id, season_number), &[])?;
        Ok(season.into())
    }
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<MovieResult>,
    #[serde(default)]
    tv_results: Vec<TvResult>,
}

impl FindResponse {
    /// Movies take precedence over shows
    fn into_entry(self, id: &str) -> Result<CatalogEntry> {
        if let Some(movie) = self.movie_results.into_iter().next() {
            return Ok(CatalogEntry::Movie {
                title: movie.title,
                release_date: movie.release_date.unwrap_or_default(),
            });
        }
        if let Some(show) = self.tv_results.into_iter().next() {
            return Ok(CatalogEntry::Show {
                name: show.name,
                id: show.id,
            });
        }
        Err(AppError::NotFound { id: id.to_string() })
    }
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    title: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvResult {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    name: String,
    #[serde(default)]
    episodes: Vec<EpisodeResult>,
}

#[derive(Debug, Deserialize)]
struct EpisodeResult {
    episode_number: u32,
    #[serde(default)]
    name: String,
}

impl From<SeasonResponse> for Season {
    fn from(season: SeasonResponse) -> Self {
        Self {
            name: season.name,
            episodes: season
                .episodes
                .into_iter()
                .map(|e| Episode {
                    number: e.episode_number,
                    name: e.name,
                })
                .collect(),
        }
    }
}
