mod file_config;

pub use file_config::{CorsConfig, FileConfig, LyricsConfig, ModelsConfig};

use crate::enrichment::DEFAULT_REQUEST_PAUSE;
use crate::lyrics::DEFAULT_GENIUS_BASE_URL;
use crate::sentiment::DEFAULT_INFERENCE_URL;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the lyrics provider
#[derive(Debug, Clone)]
pub struct LyricsSettings {
    pub base_url: String,
    pub access_token: String,
    pub timeout_sec: u64,
    /// Extra attempts after a transient failure
    pub retries: u32,
    pub request_pause_ms: u64,
}

impl LyricsSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    pub fn request_pause(&self) -> Duration {
        Duration::from_millis(self.request_pause_ms)
    }
}

/// Settings for the hosted classification models
#[derive(Debug, Clone)]
pub struct ModelsSettings {
    pub inference_url: String,
    pub api_token: Option<String>,
    pub english_emotion_model: String,
    pub multilingual_sentiment_model: String,
    pub timeout_sec: u64,
    pub max_input_chars: usize,
}

impl ModelsSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

impl Default for ModelsSettings {
    fn default() -> Self {
        Self {
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            english_emotion_model: "j-hartmann/emotion-english-distilroberta-base".to_string(),
            multilingual_sentiment_model: "cardiffnlp/twitter-xlm-roberta-base-sentiment"
                .to_string(),
            timeout_sec: 30,
            max_input_chars: 2000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsSettings {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

/// The subset of command line arguments that takes part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub genius_access_token: Option<String>,
    pub hf_api_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,

    pub lyrics: LyricsSettings,
    pub models: ModelsSettings,
    pub cors: CorsSettings,
}

impl AppConfig {
    /// Merges CLI values with the optional TOML file, the file winning on
    /// every key it sets, and validates the result.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = resolve_db_dir(
            file.db_dir
                .map(PathBuf::from)
                .or_else(|| cli.db_dir.clone()),
        )?;

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let lyrics_file = file.lyrics.unwrap_or_default();
        let access_token = lyrics_file
            .access_token
            .or_else(|| cli.genius_access_token.clone())
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Genius access token must be specified via --genius-access-token, \
                     GENIUS_ACCESS_TOKEN or [lyrics] access_token"
                )
            })?;
        let lyrics = LyricsSettings {
            base_url: lyrics_file
                .base_url
                .unwrap_or_else(|| DEFAULT_GENIUS_BASE_URL.to_string()),
            access_token,
            timeout_sec: lyrics_file.timeout_sec.unwrap_or(5),
            retries: lyrics_file.retries.unwrap_or(1),
            request_pause_ms: lyrics_file
                .request_pause_ms
                .unwrap_or(DEFAULT_REQUEST_PAUSE.as_millis() as u64),
        };
        if lyrics.timeout_sec == 0 {
            bail!("[lyrics] timeout_sec must be greater than 0");
        }

        let models_file = file.models.unwrap_or_default();
        let models_defaults = ModelsSettings::default();
        let models = ModelsSettings {
            inference_url: models_file
                .inference_url
                .unwrap_or(models_defaults.inference_url),
            api_token: models_file
                .api_token
                .or_else(|| cli.hf_api_token.clone())
                .filter(|token| !token.trim().is_empty()),
            english_emotion_model: models_file
                .english_emotion_model
                .unwrap_or(models_defaults.english_emotion_model),
            multilingual_sentiment_model: models_file
                .multilingual_sentiment_model
                .unwrap_or(models_defaults.multilingual_sentiment_model),
            timeout_sec: models_file
                .timeout_sec
                .unwrap_or(models_defaults.timeout_sec),
            max_input_chars: models_file
                .max_input_chars
                .unwrap_or(models_defaults.max_input_chars),
        };
        if models.timeout_sec == 0 {
            bail!("[models] timeout_sec must be greater than 0");
        }
        if models.max_input_chars == 0 {
            bail!("[models] max_input_chars must be greater than 0");
        }

        let cors = CorsSettings {
            allowed_origins: file
                .cors
                .and_then(|c| c.allowed_origins)
                .unwrap_or_default(),
        };

        Ok(AppConfig {
            db_dir,
            port,
            metrics_port,
            logging_level,
            lyrics,
            models,
            cors,
        })
    }

    pub fn lyrics_cache_db_path(&self) -> PathBuf {
        self.db_dir.join("lyrics_cache.db")
    }
}

fn resolve_db_dir(db_dir: Option<PathBuf>) -> Result<PathBuf> {
    let Some(db_dir) = db_dir else {
        bail!("db_dir must be specified via --db-dir or in config file");
    };
    if !db_dir.is_dir() {
        if db_dir.exists() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }
        bail!("Database directory does not exist: {:?}", db_dir);
    }
    Ok(db_dir)
}

/// Case-insensitive, same names as the `--logging-level` flag.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
