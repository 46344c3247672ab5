//! Client for the Jikan REST API (<https://jikan.moe>), the unofficial
//! MyAnimeList metadata mirror.
//!
//! Response models are deliberately lenient: a missing or absent `data`
//! field is an empty result, never an error, and unknown fields are
//! ignored. The client is read-only and holds no state besides the
//! underlying HTTP connection pool, so it is safe to share across
//! concurrently handled events.

use crate::config::Settings;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors returned by the metadata API client
#[derive(Debug, Error)]
pub enum JikanError {
    /// Connectivity problems, including timeouts
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status
    #[error("API error: {0}")]
    Api(String),
    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(String),
}

/// One hit from the anime search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimeHit {
    /// Remote anime identifier, used as the callback reference
    pub mal_id: u64,
    /// Display title; the API may omit it
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<AnimeHit>,
}

/// One entry of an episode list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EpisodeEntry {
    /// Remote-assigned episode number; null or absent for some entries
    #[serde(default)]
    pub episode: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    #[serde(default)]
    data: Vec<EpisodeEntry>,
}

#[derive(Debug, Deserialize)]
struct AnimeDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnimeResponse {
    data: Option<AnimeDetails>,
}

/// Fallback display label for an anime whose title could not be resolved
#[must_use]
pub fn placeholder_title(anime_id: u64) -> String {
    format!("anime-{anime_id}")
}

/// HTTP client for the Jikan API
pub struct JikanClient {
    http: reqwest::Client,
    base_url: String,
}

impl JikanClient {
    /// Create a client with the base URL and timeout from `settings`.
    ///
    /// The timeout prevents a slow or unresponsive API from hanging a
    /// flow indefinitely.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let timeout = Duration::from_secs(settings.http_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: settings.jikan_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search anime by free-text query, returning at most `limit` hits
    /// in the order the API ranks them.
    ///
    /// # Errors
    ///
    /// Returns `JikanError::Network` on connectivity issues,
    /// `JikanError::Api` on non-success status codes, or
    /// `JikanError::Json` if the body cannot be parsed.
    pub async fn search_anime(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AnimeHit>, JikanError> {
        let url = format!("{}/anime", self.base_url);
        let limit = limit.to_string();
        let response: SearchResponse = self
            .get_json(&url, &[("q", query), ("limit", limit.as_str())])
            .await?;
        Ok(response.data)
    }

    /// Fetch the episode list for an anime, in the order the API returns it.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search_anime`].
    pub async fn episodes(&self, anime_id: u64) -> Result<Vec<EpisodeEntry>, JikanError> {
        let url = format!("{}/anime/{anime_id}/episodes", self.base_url);
        let response: EpisodesResponse = self.get_json(&url, &[]).await?;
        Ok(response.data)
    }

    /// Look up the display title of an anime.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search_anime`]; an absent title is
    /// `Ok(None)`, not an error.
    pub async fn anime_title(&self, anime_id: u64) -> Result<Option<String>, JikanError> {
        let url = format!("{}/anime/{anime_id}", self.base_url);
        let response: AnimeResponse = self.get_json(&url, &[]).await?;
        Ok(response.data.and_then(|details| details.title))
    }

    /// Resolve the display title, falling back to `anime-<id>`.
    ///
    /// Title lookup failure is never fatal: flows keep working with the
    /// placeholder label.
    pub async fn title_or_placeholder(&self, anime_id: u64) -> String {
        match self.anime_title(anime_id).await {
            Ok(Some(title)) => title,
            Ok(None) => placeholder_title(anime_id),
            Err(e) => {
                debug!("title lookup failed for anime {}: {}", anime_id, e);
                placeholder_title(anime_id)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, JikanError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| JikanError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            // Truncate long error pages, char-boundary safe
            let truncated: String = error_text.chars().take(200).collect();
            return Err(JikanError::Api(format!("{status} - {truncated}")));
        }

        response
            .json()
            .await
            .map_err(|e| JikanError::Json(e.to_string()))
    }
}
