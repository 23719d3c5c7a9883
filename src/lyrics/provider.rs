//! Lyrics provider trait definition.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when asking a provider for lyrics.
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl LyricsError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LyricsError::Timeout | LyricsError::Connection(_) => true,
            LyricsError::Api { status, .. } => *status == 429 || *status >= 500,
            LyricsError::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for LyricsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LyricsError::Timeout
        } else if e.is_decode() {
            LyricsError::InvalidResponse(e.to_string())
        } else {
            LyricsError::Connection(e.to_string())
        }
    }
}

/// Source of song lyrics.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Get the provider's name (e.g., "genius").
    fn name(&self) -> &str;

    /// Look up the lyrics of a song.
    ///
    /// Returns `Ok(None)` when the provider has no matching song or the song has
    /// no lyrics. Errors are reserved for failures talking to the provider.
    async fn search_lyrics(&self, title: &str, artist: &str)
        -> Result<Option<String>, LyricsError>;
}
