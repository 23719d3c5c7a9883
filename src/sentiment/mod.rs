//! Language detection and sentiment/emotion scoring.
//!
//! Classifiers are abstracted behind [`TextClassifier`] so the hosted models
//! can be swapped for fakes in tests, the same goes for [`LanguageDetector`]
//! and [`PolarityScorer`].

mod classifier;
mod hf_inference;
mod language;
mod polarity;
mod scoring;

pub use classifier::{ClassifierError, TextClassifier};
pub use hf_inference::{HfInferenceClient, DEFAULT_INFERENCE_URL};
pub use language::{LanguageDetector, WhatlangDetector, ENGLISH, UNDETERMINED_LANGUAGE};
pub use polarity::{PolarityScorer, VaderScorer};
pub use scoring::{round3, score_english, score_multilingual, LabelScores, Scores};
