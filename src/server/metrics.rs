use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Vibelines metrics
const PREFIX: &str = "vibelines";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Enrichment Metrics
    pub static ref ENRICHMENT_TRACKS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_enrichment_tracks_total"),
            "Tracks processed by the enrichment pipeline, by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create enrichment_tracks_total metric");

    pub static ref ENRICHMENT_BATCH_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_enrichment_batch_size"),
            "Number of tracks per analysis request"
        )
        .buckets(vec![0.0, 1.0, 10.0, 50.0, 100.0, 250.0, 500.0, 1000.0])
    ).expect("Failed to create enrichment_batch_size metric");

    // Cache Metrics
    pub static ref LYRICS_CACHE_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_lyrics_cache_entries"),
        "Number of entries in the lyrics cache"
    ).expect("Failed to create lyrics_cache_entries metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Registers every collector with [`REGISTRY`]. Safe to call more than once.
pub fn init_metrics() {
    let collectors: [Box<dyn prometheus::core::Collector>; 6] = [
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()),
        Box::new(ENRICHMENT_TRACKS_TOTAL.clone()),
        Box::new(ENRICHMENT_BATCH_SIZE.clone()),
        Box::new(LYRICS_CACHE_ENTRIES.clone()),
        Box::new(PROCESS_MEMORY_BYTES.clone()),
    ];
    for collector in collectors {
        // AlreadyReg when tests initialize twice
        let _ = REGISTRY.register(collector);
    }

    tracing::info!("Metrics registered under the '{}' prefix", PREFIX);
}

/// Collapses per-track paths so they don't blow up label cardinality.
pub fn categorize_endpoint(path: &str) -> &str {
    match path {
        "/" | "/api/analyse" | "/api/cache/stats" => path,
        p if p.starts_with("/api/cache/") => "/api/cache/{track_id}",
        _ => "other",
    }
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let path = categorize_endpoint(path);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of one track: `cache_hit`, `scored` or a skip reason.
pub fn record_enrichment_outcome(outcome: &str) {
    ENRICHMENT_TRACKS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_batch_size(tracks: usize) {
    ENRICHMENT_BATCH_SIZE.observe(tracks as f64);
}

pub fn set_lyrics_cache_entries(entries: usize) {
    LYRICS_CACHE_ENTRIES.set(entries as f64);
}

/// Resident set size of this process, from `/proc/self/status`.
#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let kb = status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))?
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()?;
    Some(kb * 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_bytes() -> Option<f64> {
    None
}

pub fn update_memory_usage() {
    if let Some(bytes) = resident_memory_bytes() {
        PROCESS_MEMORY_BYTES.set(bytes);
    }
}

/// Renders [`REGISTRY`] in the Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Could not encode metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }
    (StatusCode::OK, String::from_utf8_lossy(&buffer).into_owned())
}
