//! Data models for the lyrics cache.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on the number of characters of raw lyrics kept per entry.
pub const MAX_CACHED_LYRICS_CHARS: usize = 10_000;

/// Scored lyrics for a single track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub track_id: String,
    pub lyrics: String,
    pub lang: String,
    pub valence: f64,
    pub energy: f64,
    /// Unix seconds of the last upsert.
    pub updated_at: i64,
}

impl CacheEntry {
    /// Builds an entry, truncating `raw_lyrics` to [`MAX_CACHED_LYRICS_CHARS`] characters.
    pub fn new(
        track_id: impl Into<String>,
        raw_lyrics: &str,
        lang: impl Into<String>,
        valence: f64,
        energy: f64,
        updated_at: i64,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            lyrics: raw_lyrics.chars().take(MAX_CACHED_LYRICS_CHARS).collect(),
            lang: lang.into(),
            valence,
            energy,
            updated_at,
        }
    }
}

/// Summary statistics for the lyrics cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    /// Entry count per detected language code.
    pub languages: BTreeMap<String, usize>,
}
