//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{analyse_body, track, TestClient, TestServer, HAPPY_ARTIST, HAPPY_TITLE};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_analyse() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let body = analyse_body(vec![track("t1", HAPPY_TITLE, HAPPY_ARTIST, "2024-01-15")]);
//!     let response = client.analyse(&body).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;
mod upstream;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{analyse_body, track};
pub use server::TestServer;
