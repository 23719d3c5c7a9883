//! Text classifier trait definition.

use super::scoring::LabelScores;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when running a text classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClassifierError::Timeout
        } else {
            ClassifierError::Connection(e.to_string())
        }
    }
}

/// A pretrained text-classification model.
///
/// Returns a score for every label the model knows about.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Get the model identifier.
    fn model(&self) -> &str;

    /// Classify `text`.
    async fn classify(&self, text: &str) -> Result<LabelScores, ClassifierError>;
}
