//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all vibelines-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    #[allow(dead_code)]
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Server Info
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// POST /api/analyse with a JSON body
    pub async fn analyse(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/analyse", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Analyse request failed")
    }

    /// POST /api/analyse with an arbitrary body, sent as JSON
    pub async fn analyse_raw(&self, body: &str) -> Response {
        self.client
            .post(format!("{}/api/analyse", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Analyse request failed")
    }

    // ========================================================================
    // Lyrics Cache
    // ========================================================================

    /// GET /api/cache/stats
    pub async fn get_cache_stats(&self) -> Response {
        self.client
            .get(format!("{}/api/cache/stats", self.base_url))
            .send()
            .await
            .expect("Cache stats request failed")
    }

    /// GET /api/cache/{track_id}
    pub async fn get_cached_track(&self, track_id: &str) -> Response {
        self.client
            .get(format!("{}/api/cache/{}", self.base_url, track_id))
            .send()
            .await
            .expect("Cached track request failed")
    }
}
