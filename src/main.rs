use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import modules from the library crate
use vibelines_server::config;
use vibelines_server::enrichment::{EnrichmentPipeline, Services};
use vibelines_server::lyrics::GeniusClient;
use vibelines_server::lyrics_cache::{LyricsCache, SqliteLyricsCache};
use vibelines_server::sentiment::{HfInferenceClient, VaderScorer, WhatlangDetector};
use vibelines_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the lyrics cache database (lyrics_cache.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Genius API client access token.
    #[clap(long, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
    pub genius_access_token: Option<String>,

    /// Token for the hosted inference API. Anonymous requests are rate limited harder.
    #[clap(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_api_token: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            genius_access_token: args.genius_access_token.clone(),
            hf_api_token: args.hf_api_token.clone(),
        }
    }
}

fn build_services(
    app_config: &config::AppConfig,
    cache: Arc<SqliteLyricsCache>,
) -> Result<Services> {
    let lyrics = &app_config.lyrics;
    let models = &app_config.models;

    let genius = GeniusClient::new(
        lyrics.base_url.clone(),
        lyrics.access_token.clone(),
        lyrics.timeout(),
        lyrics.retries,
    )?;
    let english_emotion = HfInferenceClient::new(
        &models.inference_url,
        models.english_emotion_model.clone(),
        models.api_token.clone(),
        models.timeout(),
        models.max_input_chars,
    )?;
    let multilingual_sentiment = HfInferenceClient::new(
        &models.inference_url,
        models.multilingual_sentiment_model.clone(),
        models.api_token.clone(),
        models.timeout(),
        models.max_input_chars,
    )?;

    Ok(Services {
        lyrics: Arc::new(genius),
        language: Arc::new(WhatlangDetector),
        english_emotion: Arc::new(english_emotion),
        multilingual_sentiment: Arc::new(multilingual_sentiment),
        polarity: Arc::new(VaderScorer::new()),
        cache,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);
    info!("  lyrics provider: {}", app_config.lyrics.base_url);
    info!(
        "  models: {} / {} at {}",
        app_config.models.english_emotion_model,
        app_config.models.multilingual_sentiment_model,
        app_config.models.inference_url
    );

    info!("Initializing metrics...");
    metrics::init_metrics();

    if !app_config.lyrics_cache_db_path().exists() {
        info!(
            "Creating new lyrics cache database at {:?}",
            app_config.lyrics_cache_db_path()
        );
    }
    let lyrics_cache = Arc::new(SqliteLyricsCache::new(app_config.lyrics_cache_db_path())?);
    let stats = lyrics_cache.get_stats()?;
    info!("Lyrics cache holds {} entries", stats.entries);
    metrics::set_lyrics_cache_entries(stats.entries);

    let services = build_services(&app_config, lyrics_cache)?;
    let pipeline = EnrichmentPipeline::new(services, app_config.lyrics.request_pause());

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        cors_allowed_origins: app_config.cors.allowed_origins.clone(),
    };

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);

    tokio::select! {
        result = run_server(server_config, pipeline) => {
            info!("HTTP server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
