use axum::extract::FromRef;

use crate::enrichment::EnrichmentPipeline;
use crate::lyrics_cache::LyricsCache;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedPipeline = Arc<EnrichmentPipeline>;
pub type GuardedLyricsCache = Arc<dyn LyricsCache>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub pipeline: GuardedPipeline,
    pub lyrics_cache: GuardedLyricsCache,
}

impl ServerState {
    pub fn new(config: ServerConfig, pipeline: EnrichmentPipeline) -> Self {
        let lyrics_cache = pipeline.services().cache.clone();
        Self {
            config,
            start_time: Instant::now(),
            pipeline: Arc::new(pipeline),
            lyrics_cache,
        }
    }
}

impl FromRef<ServerState> for GuardedPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}

impl FromRef<ServerState> for GuardedLyricsCache {
    fn from_ref(input: &ServerState) -> Self {
        input.lyrics_cache.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
