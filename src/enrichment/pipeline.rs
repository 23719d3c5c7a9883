//! The per-batch enrichment pipeline.

use super::models::{EnrichedTrack, EnrichmentReport, SkipReason, SkippedTrack, Track};
use super::timeline::{build_timeline, parse_added_at};
use crate::lyrics::{clean_lyrics, prefix_chars, LyricsProvider};
use crate::lyrics_cache::{CacheEntry, LyricsCache};
use crate::sentiment::{
    score_english, score_multilingual, ClassifierError, LanguageDetector, PolarityScorer, Scores,
    TextClassifier, ENGLISH,
};
use crate::server::metrics;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Characters of cleaned lyrics used for language detection.
const LANGUAGE_SAMPLE_CHARS: usize = 200;

pub const DEFAULT_REQUEST_PAUSE: Duration = Duration::from_millis(200);

/// Process-wide collaborators, built once at startup.
#[derive(Clone)]
pub struct Services {
    pub lyrics: Arc<dyn LyricsProvider>,
    pub language: Arc<dyn LanguageDetector>,
    pub english_emotion: Arc<dyn TextClassifier>,
    pub multilingual_sentiment: Arc<dyn TextClassifier>,
    pub polarity: Arc<dyn PolarityScorer>,
    pub cache: Arc<dyn LyricsCache>,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Track {id} has an invalid added_at timestamp: '{value}'")]
    InvalidAddedAt { id: String, value: String },
}

#[derive(Clone)]
pub struct EnrichmentPipeline {
    services: Services,
    request_pause: Duration,
}

impl EnrichmentPipeline {
    pub fn new(services: Services, request_pause: Duration) -> Self {
        Self {
            services,
            request_pause,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Enriches a batch of tracks, one at a time, and builds the weekly timeline.
    ///
    /// Tracks whose lyrics cannot be obtained or scored are left out of the
    /// result and reported in `skipped`. The whole batch is rejected up front if
    /// any `added_at` cannot be parsed.
    pub async fn enrich(&self, tracks: Vec<Track>) -> Result<EnrichmentReport, EnrichmentError> {
        let dates = tracks
            .iter()
            .map(|track| {
                parse_added_at(&track.added_at).ok_or_else(|| EnrichmentError::InvalidAddedAt {
                    id: track.id.clone(),
                    value: track.added_at.clone(),
                })
            })
            .collect::<Result<Vec<NaiveDate>, _>>()?;

        let total = tracks.len();
        let mut enriched: Vec<(NaiveDate, EnrichedTrack)> = Vec::with_capacity(total);
        let mut skipped = Vec::new();
        let mut cache_hits = 0usize;
        let mut scored = 0usize;

        for (track, added_on) in tracks.into_iter().zip(dates) {
            if let Some(entry) = self.cached_entry(&track.id) {
                debug!("Cache hit for track {}", track.id);
                metrics::record_enrichment_outcome("cache_hit");
                cache_hits += 1;
                enriched.push((
                    added_on,
                    EnrichedTrack::new(track, entry.valence, entry.energy),
                ));
                continue;
            }

            match self.enrich_uncached(&track).await {
                Ok(scores) => {
                    metrics::record_enrichment_outcome("scored");
                    scored += 1;
                    enriched.push((
                        added_on,
                        EnrichedTrack::new(track, scores.valence, scores.energy),
                    ));
                }
                Err(reason) => {
                    info!("Skipping track {} ({})", track.id, reason.as_str());
                    metrics::record_enrichment_outcome(reason.as_str());
                    skipped.push(SkippedTrack {
                        id: track.id,
                        reason,
                    });
                }
            }

            // Every miss called the lyrics provider, failed lookups included, so
            // every miss is throttled. Stricter than pausing only after a track
            // was scored and cached.
            if !self.request_pause.is_zero() {
                tokio::time::sleep(self.request_pause).await;
            }
        }

        info!(
            "Enriched {}/{} tracks ({} from cache, {} skipped)",
            enriched.len(),
            total,
            cache_hits,
            skipped.len()
        );

        if scored > 0 {
            self.refresh_cache_gauge();
        }

        let timeline = build_timeline(
            enriched
                .iter()
                .map(|(date, track)| (*date, track.valence, track.energy)),
        );

        Ok(EnrichmentReport {
            timeline,
            tracks: enriched.into_iter().map(|(_, track)| track).collect(),
            skipped,
        })
    }

    /// Re-reads the cache size after new entries were written.
    fn refresh_cache_gauge(&self) {
        match self.services.cache.get_stats() {
            Ok(stats) => metrics::set_lyrics_cache_entries(stats.entries),
            Err(e) => warn!("Could not read lyrics cache stats: {:#}", e),
        }
    }

    /// Read failures are treated as misses.
    fn cached_entry(&self, track_id: &str) -> Option<CacheEntry> {
        match self.services.cache.get_entry(track_id) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Lyrics cache read failed for track {}: {:#}", track_id, e);
                None
            }
        }
    }

    async fn enrich_uncached(&self, track: &Track) -> Result<Scores, SkipReason> {
        let artist = track.primary_artist();
        let raw_lyrics = match self.services.lyrics.search_lyrics(&track.name, artist).await {
            Ok(Some(lyrics)) => lyrics,
            Ok(None) => return Err(SkipReason::LyricsNotFound),
            Err(e) => {
                warn!(
                    "Lyrics lookup failed for '{}' by '{}': {}",
                    track.name, artist, e
                );
                return Err(SkipReason::LyricsUnavailable);
            }
        };

        let cleaned = clean_lyrics(&raw_lyrics);
        if cleaned.is_empty() {
            return Err(SkipReason::EmptyLyrics);
        }

        let lang = self
            .services
            .language
            .detect(prefix_chars(&cleaned, LANGUAGE_SAMPLE_CHARS));

        let scores = self.score(&cleaned, &lang).await.map_err(|e| {
            warn!("Scoring failed for track {} (lang {}): {}", track.id, lang, e);
            SkipReason::ScoringFailed
        })?;
        debug!(
            "Scored track {} (lang {}): valence {}, energy {}",
            track.id, lang, scores.valence, scores.energy
        );

        let entry = CacheEntry::new(
            track.id.as_str(),
            &raw_lyrics,
            lang,
            scores.valence,
            scores.energy,
            chrono::Utc::now().timestamp(),
        );
        if let Err(e) = self.services.cache.upsert_entry(&entry) {
            warn!("Lyrics cache write failed for track {}: {:#}", track.id, e);
        }

        Ok(scores)
    }

    async fn score(&self, cleaned: &str, lang: &str) -> Result<Scores, ClassifierError> {
        if lang == ENGLISH {
            let emotions = self.services.english_emotion.classify(cleaned).await?;
            let compound = self.services.polarity.compound(cleaned);
            Ok(score_english(&emotions, compound))
        } else {
            let sentiment = self.services.multilingual_sentiment.classify(cleaned).await?;
            Ok(score_multilingual(&sentiment))
        }
    }
}
