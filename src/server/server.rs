use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::{log_requests, metrics, state::*, ServerConfig};
use crate::enrichment::{AnalyseRequest, EnrichmentError, EnrichmentPipeline, EnrichmentReport};
use crate::lyrics_cache::CacheStats;

/// Errors returned by the HTTP API, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(message) = &self {
            error!("Request failed: {}", message);
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(e: EnrichmentError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
}

/// Cached scores of one track, without the lyrics.
#[derive(Serialize)]
struct CachedScores {
    pub track_id: String,
    pub lang: String,
    pub valence: f64,
    pub energy: f64,
    pub updated_at: i64,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(stats)
}

async fn analyse(
    State(pipeline): State<GuardedPipeline>,
    payload: Result<Json<AnalyseRequest>, JsonRejection>,
) -> Result<Json<EnrichmentReport>, ApiError> {
    let Json(request) = payload?;
    metrics::record_batch_size(request.tracks.len());
    let report = pipeline.enrich(request.tracks).await?;
    Ok(Json(report))
}

async fn get_cache_stats(
    State(cache): State<GuardedLyricsCache>,
) -> Result<Json<CacheStats>, ApiError> {
    let stats = cache.get_stats()?;
    metrics::set_lyrics_cache_entries(stats.entries);
    Ok(Json(stats))
}

async fn get_cached_track(
    State(cache): State<GuardedLyricsCache>,
    Path(track_id): Path<String>,
) -> Result<Json<CachedScores>, ApiError> {
    match cache.get_entry(&track_id)? {
        Some(entry) => Ok(Json(CachedScores {
            track_id: entry.track_id,
            lang: entry.lang,
            valence: entry.valence,
            energy: entry.energy,
            updated_at: entry.updated_at,
        })),
        None => Err(ApiError::NotFound(format!(
            "No cached scores for track {}",
            track_id
        ))),
    }
}

fn make_cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn make_app(config: ServerConfig, pipeline: EnrichmentPipeline) -> Result<Router> {
    let cors = make_cors_layer(&config.cors_allowed_origins)?;
    let state = ServerState::new(config, pipeline);

    let api_routes: Router = Router::new()
        .route("/analyse", post(analyse))
        .route("/cache/stats", get(get_cache_stats))
        .route("/cache/{track_id}", get(get_cached_track))
        .layer(cors)
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics::metrics_handler))
}

pub async fn run_server(config: ServerConfig, pipeline: EnrichmentPipeline) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, pipeline)?;

    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    info!("Serving metrics on port {}", metrics_port);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, make_metrics_app()).await {
            error!("Metrics server failed: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
