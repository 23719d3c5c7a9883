//! Vibelines Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod enrichment;
pub mod lyrics;
pub mod lyrics_cache;
pub mod sentiment;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use enrichment::{EnrichmentPipeline, Services};
pub use lyrics_cache::{LyricsCache, SqliteLyricsCache};
pub use server::{run_server, RequestsLoggingLevel};
