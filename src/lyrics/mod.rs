//! Lyrics lookup.
//!
//! [`LyricsProvider`] abstracts the remote lyrics source so the enrichment
//! pipeline can run against Genius in production and fakes in tests.

mod genius;
mod provider;
mod text;

pub use genius::{GeniusClient, DEFAULT_GENIUS_BASE_URL};
pub use provider::{LyricsError, LyricsProvider};
pub use text::{clean_lyrics, extract_lyrics_from_page, prefix_chars, remove_section_headers};
