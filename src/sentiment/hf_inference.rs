//! Hosted text-classification models reached over the Hugging Face
//! Inference API protocol.
//!
//! Works with the public Inference API as well as self-hosted inference
//! endpoints exposing the same `POST /models/{model}` route.

use super::classifier::{ClassifierError, TextClassifier};
use super::scoring::LabelScores;
use crate::lyrics::prefix_chars;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

pub struct HfInferenceClient {
    client: Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
    max_input_chars: usize,
}

impl HfInferenceClient {
    /// Create a client for one hosted model.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the inference service.
    /// * `model` - Model id (e.g., "j-hartmann/emotion-english-distilroberta-base").
    /// * `api_token` - Optional bearer token.
    /// * `timeout` - Request timeout. Cold models can take a while to load.
    /// * `max_input_chars` - Input is cut to this many characters before sending.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
        max_input_chars: usize,
    ) -> Result<Self> {
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build inference HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
            model,
            api_token,
            max_input_chars,
        })
    }
}

#[async_trait]
impl TextClassifier for HfInferenceClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> Result<LabelScores, ClassifierError> {
        let request = InferenceRequest {
            inputs: prefix_chars(text, self.max_input_chars),
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        debug!(model = %self.model, chars = request.inputs.chars().count(), "Classifying text");

        let mut req_builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.api_token {
            req_builder = req_builder.bearer_auth(token);
        }

        let response = req_builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: InferenceResponse = response.json().await.map_err(|e| {
            ClassifierError::InvalidResponse(format!(
                "Failed to parse response from {}: {}",
                self.model, e
            ))
        })?;
        body.into_label_scores()
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// A single input yields either `[{label, score}, ...]` or the same list
/// wrapped in an outer list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_label_scores(self) -> Result<LabelScores, ClassifierError> {
        let labels = match self {
            InferenceResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(labels) => labels,
        };
        if labels.is_empty() {
            return Err(ClassifierError::InvalidResponse(
                "Classifier returned no labels".to_string(),
            ));
        }
        Ok(labels
            .into_iter()
            .map(|entry| (entry.label, entry.score))
            .collect())
    }
}
