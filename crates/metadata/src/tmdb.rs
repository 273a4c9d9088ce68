//! The Movie Database (TMDB) metadata provider.
//!
//! Details come from `GET /movie/{id}?append_to_response=credits`, posters
//! from `GET /movie/{id}?language=en-US`. Both calls share one HTTP client
//! with a per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use data_loader::ItemId;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{MetadataError, Result};
use crate::{ItemMetadata, MetadataProvider};

const DIRECTOR_JOB: &str = "Director";

/// Settings for the TMDB provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_url: String,
    /// Prefix for poster paths, including the image size segment
    pub image_base_url: String,
    /// Per-request timeout; an expired request counts as a failed lookup
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500/".to_string(),
            timeout: Duration::from_secs(8),
        }
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbMovie {
    title: Option<String>,
    overview: Option<String>,
    genres: Vec<TmdbGenre>,
    poster_path: Option<String>,
    credits: TmdbCredits,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbCredits {
    cast: Vec<TmdbPerson>,
    crew: Vec<TmdbPerson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TmdbPerson {
    name: Option<String>,
    job: Option<String>,
}

impl TmdbMovie {
    fn into_metadata(self, id: ItemId) -> ItemMetadata {
        let director = self
            .credits
            .crew
            .iter()
            .find(|person| person.job.as_deref() == Some(DIRECTOR_JOB))
            .and_then(|person| person.name.clone());

        let mut metadata = ItemMetadata::new(id, self.title.unwrap_or_default())
            .with_categories(self.genres.into_iter().map(|g| g.name))
            .with_description(self.overview.unwrap_or_default())
            .with_cast(self.credits.cast.into_iter().filter_map(|p| p.name));
        metadata.lead_contributor = director;
        metadata
    }
}

// =============================================================================
// Provider
// =============================================================================

/// HTTP client for the TMDB v3 API
#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    config: ProviderConfig,
}

impl TmdbProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::ProviderUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn movie_url(&self, id: ItemId) -> String {
        format!("{}/movie/{}", self.config.api_url.trim_end_matches('/'), id)
    }

    async fn get_movie(&self, id: ItemId, extra: (&str, &str)) -> Result<TmdbMovie> {
        let response = self
            .http_client
            .get(self.movie_url(id))
            .query(&[("api_key", self.config.api_key.as_str()), extra])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound { id });
        }
        if !status.is_success() {
            return Err(MetadataError::ProviderUnavailable(format!(
                "API returned status {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch details and credits, surfacing the failure reason
    pub async fn fetch_details(&self, id: ItemId) -> Result<ItemMetadata> {
        let movie = self.get_movie(id, ("append_to_response", "credits")).await?;
        Ok(movie.into_metadata(id))
    }

    /// Fetch the raw poster path; `None` when the item has no poster
    pub async fn fetch_poster_path(&self, id: ItemId) -> Result<Option<String>> {
        let movie = self.get_movie(id, ("language", "en-US")).await?;
        Ok(movie.poster_path.filter(|path| !path.is_empty()))
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.config.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn get_details(&self, id: ItemId) -> Option<ItemMetadata> {
        match self.fetch_details(id).await {
            Ok(metadata) => {
                debug!(item_id = id, "Fetched metadata");
                Some(metadata)
            }
            Err(e) => {
                warn!(item_id = id, error = %e, provider = self.name(), "Metadata lookup failed");
                None
            }
        }
    }

    async fn get_poster_url(&self, id: ItemId) -> Option<String> {
        match self.fetch_poster_path(id).await {
            Ok(path) => path.map(|p| self.poster_url(&p)),
            Err(e) => {
                warn!(item_id = id, error = %e, provider = self.name(), "Poster lookup failed");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
