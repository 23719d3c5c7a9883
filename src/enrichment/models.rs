//! Request/response models of the analysis endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A track as sent by the client.
///
/// Fields other than the four the pipeline needs are kept in `extra` and
/// echoed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Comma-joined artist names.
    pub artists: String,
    /// ISO-8601 timestamp of when the track was added.
    pub added_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    /// First listed artist, trimmed.
    pub fn primary_artist(&self) -> &str {
        self.artists.split(',').next().unwrap_or_default().trim()
    }
}

/// A track extended with its scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub valence: f64,
    pub energy: f64,
}

impl EnrichedTrack {
    pub fn new(mut track: Track, valence: f64, energy: f64) -> Self {
        // Client-sent scores would otherwise be serialized twice.
        track.extra.remove("valence");
        track.extra.remove("energy");
        Self {
            track,
            valence,
            energy,
        }
    }
}

/// Mean scores of the tracks added in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBucket {
    /// ISO week label, e.g. `2024-W03`.
    pub week: String,
    pub valence: f64,
    pub energy: f64,
    pub tracks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The provider has no lyrics for the track.
    LyricsNotFound,
    /// The provider could not be reached or answered with an error.
    LyricsUnavailable,
    /// Lyrics were empty, or empty once annotations were removed.
    EmptyLyrics,
    /// A classifier failed on the lyrics.
    ScoringFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::LyricsNotFound => "lyrics_not_found",
            SkipReason::LyricsUnavailable => "lyrics_unavailable",
            SkipReason::EmptyLyrics => "empty_lyrics",
            SkipReason::ScoringFailed => "scoring_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTrack {
    pub id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyseRequest {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentReport {
    pub timeline: Vec<TimelineBucket>,
    pub tracks: Vec<EnrichedTrack>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_json() -> Value {
        json!({
            "id": "t1",
            "name": "Happy",
            "artists": " Pharrell Williams , Someone Else",
            "added_at": "2024-01-15T10:30:00Z",
            "album": {"name": "G I R L"},
            "popularity": 80
        })
    }

    #[test]
    fn track_keeps_unknown_fields() {
        let track: Track = serde_json::from_value(track_json()).unwrap();
        assert_eq!(track.extra.get("popularity"), Some(&json!(80)));
        assert_eq!(serde_json::to_value(&track).unwrap(), track_json());
    }

    #[test]
    fn primary_artist_is_first_trimmed_segment() {
        let track: Track = serde_json::from_value(track_json()).unwrap();
        assert_eq!(track.primary_artist(), "Pharrell Williams");
    }

    #[test]
    fn enriched_track_serializes_flat() {
        let mut input = track_json();
        input["valence"] = json!(0.99);
        let track: Track = serde_json::from_value(input).unwrap();
        let enriched = EnrichedTrack::new(track, 0.86, 0.1);

        let mut expected = track_json();
        expected["valence"] = json!(0.86);
        expected["energy"] = json!(0.1);
        assert_eq!(serde_json::to_value(&enriched).unwrap(), expected);
    }

    #[test]
    fn empty_report_omits_skipped() {
        assert_eq!(
            serde_json::to_value(EnrichmentReport::default()).unwrap(),
            json!({"timeline": [], "tracks": []})
        );
    }

    #[test]
    fn skip_reason_serializes_as_snake_case() {
        let skipped = SkippedTrack {
            id: "t9".to_string(),
            reason: SkipReason::LyricsNotFound,
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            json!({"id": "t9", "reason": "lyrics_not_found"})
        );
        assert_eq!(SkipReason::ScoringFailed.as_str(), "scoring_failed");
    }

    #[test]
    fn request_requires_tracks() {
        assert!(serde_json::from_value::<AnalyseRequest>(json!({})).is_err());
        assert!(serde_json::from_value::<AnalyseRequest>(json!({"tracks": "nope"})).is_err());
    }
}
