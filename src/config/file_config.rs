use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,

    // Feature configs
    pub lyrics: Option<LyricsConfig>,
    pub models: Option<ModelsConfig>,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_sec: Option<u64>,
    pub retries: Option<u32>,
    /// Delay after every track that needed a lyrics lookup.
    pub request_pause_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ModelsConfig {
    pub inference_url: Option<String>,
    pub api_token: Option<String>,
    pub english_emotion_model: Option<String>,
    pub multilingual_sentiment_model: Option<String>,
    pub timeout_sec: Option<u64>,
    pub max_input_chars: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty or absent allows any origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
