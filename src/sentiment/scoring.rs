//! Valence/energy formulas for the two scoring paths.

use serde::Serialize;
use std::collections::BTreeMap;

/// Per-label scores returned by a text classifier.
///
/// Labels are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelScores {
    scores: BTreeMap<String, f64>,
}

impl LabelScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, score: f64) {
        self.scores.insert(label.to_lowercase(), score);
    }

    /// Score for `label`, or 0 when the classifier did not report it.
    pub fn get(&self, label: &str) -> f64 {
        self.scores
            .get(&label.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// Score of the first of `labels` that is present, or 0.
    pub fn get_any(&self, labels: &[&str]) -> f64 {
        labels
            .iter()
            .find_map(|label| self.scores.get(&label.to_lowercase()).copied())
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for LabelScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut scores = LabelScores::new();
        for (label, score) in iter {
            scores.insert(label.as_ref(), score);
        }
        scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub valence: f64,
    pub energy: f64,
}

/// Rounds to three decimal places, half away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// English path: blends lexicon polarity with the emotion classifier.
pub fn score_english(emotions: &LabelScores, compound: f64) -> Scores {
    let joy = emotions.get("joy");
    let sadness = emotions.get("sadness");
    let anger = emotions.get("anger");
    let surprise = emotions.get("surprise");
    Scores {
        valence: round3(0.6 * compound + 0.4 * (joy - sadness)),
        energy: round3(anger + surprise),
    }
}

/// Multilingual path: positive minus negative sentiment, negativity as energy.
pub fn score_multilingual(sentiment: &LabelScores) -> Scores {
    let positive = sentiment.get_any(&["pos", "positive"]);
    let negative = sentiment.get_any(&["neg", "negative"]);
    Scores {
        valence: round3(positive - negative),
        energy: round3(negative),
    }
}
