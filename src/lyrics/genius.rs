//! Genius lyrics provider.
//!
//! Searches the Genius API for a song, then downloads the song page and
//! scrapes the lyrics out of it (the API itself does not serve lyrics).

use super::provider::{LyricsError, LyricsProvider};
use super::text::{extract_lyrics_from_page, remove_section_headers};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GENIUS_BASE_URL: &str = "https://api.genius.com";

/// Genius-backed [`LyricsProvider`].
pub struct GeniusClient {
    client: Client,
    base_url: String,
    access_token: String,
    retries: u32,
}

impl GeniusClient {
    /// Create a new Genius client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.genius.com").
    /// * `access_token` - Client access token, sent as a bearer token.
    /// * `timeout` - Per-request timeout, applied to search and page downloads.
    /// * `retries` - Extra attempts made after a transient failure.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
        retries: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vibelines-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build Genius HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            retries,
        })
    }

    /// Send a request, retrying transient failures up to `self.retries` times.
    async fn send_with_retries<F>(&self, what: &str, build: F) -> Result<Response, LyricsError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let error = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    LyricsError::Api { status, message }
                }
                Err(e) => LyricsError::from(e),
            };

            if !error.is_transient() || attempt >= self.retries {
                return Err(error);
            }
            attempt += 1;
            warn!(
                "Genius {} failed ({}), retrying ({}/{})",
                what, error, attempt, self.retries
            );
        }
    }

    async fn search(&self, title: &str, artist: &str) -> Result<Vec<SearchHit>, LyricsError> {
        let url = format!("{}/search", self.base_url);
        let query = format!("{} {}", title, artist);

        let response = self
            .send_with_retries("search", || {
                self.client
                    .get(&url)
                    .query(&[("q", query.as_str())])
                    .bearer_auth(&self.access_token)
            })
            .await?;

        let body: SearchResponse = response.json().await.map_err(|e| {
            LyricsError::InvalidResponse(format!("Failed to parse Genius search response: {}", e))
        })?;
        Ok(body.response.hits)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, LyricsError> {
        let response = self
            .send_with_retries("page download", || self.client.get(url))
            .await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    fn name(&self) -> &str {
        "genius"
    }

    async fn search_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<String>, LyricsError> {
        let hits = self.search(title, artist).await?;
        let Some(song) = pick_song(&hits, title, artist) else {
            debug!("No Genius song found for '{}' by '{}'", title, artist);
            return Ok(None);
        };
        let Some(url) = song.url.as_deref() else {
            return Ok(None);
        };

        debug!("Fetching lyrics page {} for '{}'", url, title);
        let page = self.fetch_page(url).await?;
        Ok(extract_lyrics_from_page(&page)
            .map(|lyrics| remove_section_headers(&lyrics))
            .filter(|lyrics| !lyrics.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "type")]
    hit_type: String,
    result: SongResult,
}

#[derive(Debug, Deserialize)]
struct SongResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    primary_artist: Option<PrimaryArtist>,
}

#[derive(Debug, Deserialize)]
struct PrimaryArtist {
    name: String,
}

/// Lowercased alphanumeric words, single-space separated.
fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Picks the best song hit: exact title and artist match first, then exact
/// title match, then the first song the search returned.
fn pick_song<'a>(hits: &'a [SearchHit], title: &str, artist: &str) -> Option<&'a SongResult> {
    let songs: Vec<&SongResult> = hits
        .iter()
        .filter(|hit| hit.hit_type == "song" && hit.result.url.is_some())
        .map(|hit| &hit.result)
        .collect();

    let wanted_title = normalize(title);
    let wanted_artist = normalize(artist);
    let title_matches = |song: &SongResult| {
        song.title.as_deref().map(normalize).as_deref() == Some(wanted_title.as_str())
    };
    let artist_matches = |song: &SongResult| {
        song.primary_artist
            .as_ref()
            .map(|a| normalize(&a.name).contains(&wanted_artist))
            .unwrap_or(false)
    };

    songs
        .iter()
        .copied()
        .find(|song| title_matches(*song) && artist_matches(*song))
        .or_else(|| songs.iter().copied().find(|song| title_matches(*song)))
        .or_else(|| songs.first().copied())
}
