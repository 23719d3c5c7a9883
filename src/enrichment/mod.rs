//! Lyrics-based enrichment of track batches.
//!
//! For each track the pipeline reuses cached scores when present, otherwise
//! fetches lyrics, detects their language and scores them with the matching
//! model, then aggregates everything into a weekly timeline.

mod models;
mod pipeline;
mod timeline;

pub use models::{
    AnalyseRequest, EnrichedTrack, EnrichmentReport, SkipReason, SkippedTrack, TimelineBucket,
    Track,
};
pub use pipeline::{EnrichmentError, EnrichmentPipeline, Services, DEFAULT_REQUEST_PAUSE};
pub use timeline::{build_timeline, parse_added_at, week_label};
