//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own lyrics cache database and
//! its own fake upstream APIs.

use super::constants::*;
use super::fixtures::FixedPolarity;
use super::upstream::FakeUpstream;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use vibelines_server::enrichment::{EnrichmentPipeline, Services};
use vibelines_server::lyrics::GeniusClient;
use vibelines_server::lyrics_cache::SqliteLyricsCache;
use vibelines_server::sentiment::{HfInferenceClient, WhatlangDetector};
use vibelines_server::server::{make_app, RequestsLoggingLevel, ServerConfig};

/// Test server instance with an isolated cache and upstream
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    #[allow(dead_code)]
    pub port: u16,

    /// Fake lyrics and inference APIs the server talks to
    pub upstream: FakeUpstream,

    /// Lyrics cache for direct database access in tests
    #[allow(dead_code)]
    pub lyrics_cache: Arc<SqliteLyricsCache>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// The server uses the real Genius and inference clients pointed at a
    /// fake upstream, real language detection and a fixed polarity score.
    ///
    /// # Panics
    ///
    /// Panics if the cache, the upstream or the server fail to start, or if
    /// the server doesn't become ready within the timeout.
    pub async fn spawn() -> Self {
        let upstream = FakeUpstream::spawn().await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp db dir");
        let lyrics_cache = Arc::new(
            SqliteLyricsCache::new(temp_db_dir.path().join("lyrics_cache.db"))
                .expect("Failed to open lyrics cache"),
        );

        let timeout = Duration::from_secs(UPSTREAM_TIMEOUT_SECS);
        let genius = GeniusClient::new(upstream.base_url.clone(), TEST_ACCESS_TOKEN, timeout, 0)
            .expect("Failed to build Genius client");
        let english_emotion = HfInferenceClient::new(
            &upstream.base_url,
            "j-hartmann/emotion-english-distilroberta-base",
            None,
            timeout,
            2000,
        )
        .expect("Failed to build emotion client");
        let multilingual_sentiment = HfInferenceClient::new(
            &upstream.base_url,
            "cardiffnlp/twitter-xlm-roberta-base-sentiment",
            None,
            timeout,
            2000,
        )
        .expect("Failed to build sentiment client");

        let services = Services {
            lyrics: Arc::new(genius),
            language: Arc::new(WhatlangDetector),
            english_emotion: Arc::new(english_emotion),
            multilingual_sentiment: Arc::new(multilingual_sentiment),
            polarity: Arc::new(FixedPolarity),
            cache: lyrics_cache.clone(),
        };
        // No pause between lookups in tests
        let pipeline = EnrichmentPipeline::new(services, Duration::ZERO);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app = make_app(config, pipeline).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            lyrics_cache,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
