//! Request payload builders and in-process fakes for end-to-end tests

use super::constants::FIXED_COMPOUND;
use serde_json::{json, Value};
use vibelines_server::sentiment::PolarityScorer;

/// Polarity scorer returning the same compound score for any text
pub struct FixedPolarity;

impl PolarityScorer for FixedPolarity {
    fn compound(&self, _text: &str) -> f64 {
        FIXED_COMPOUND
    }
}

/// A track as a client would send it
pub fn track(id: &str, name: &str, artists: &str, added_at: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": artists,
        "added_at": added_at,
    })
}

/// An analysis request body for `tracks`
pub fn analyse_body(tracks: Vec<Value>) -> Value {
    json!({ "tracks": tracks })
}
