//! LyricsCache trait definition.

use super::models::{CacheEntry, CacheStats};
use anyhow::Result;

/// Row-keyed store of scored lyrics, keyed by track ID.
pub trait LyricsCache: Send + Sync {
    /// Get the cached entry for a track, if any.
    fn get_entry(&self, track_id: &str) -> Result<Option<CacheEntry>>;

    /// Insert or fully replace the entry for `entry.track_id`.
    fn upsert_entry(&self, entry: &CacheEntry) -> Result<()>;

    /// Get summary statistics for the cache.
    fn get_stats(&self) -> Result<CacheStats>;
}
