mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{CacheEntry, CacheStats, MAX_CACHED_LYRICS_CHARS};
pub use store::SqliteLyricsCache;
pub use trait_def::LyricsCache;
