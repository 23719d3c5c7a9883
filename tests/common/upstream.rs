//! Fake lyrics and inference APIs
//!
//! A small axum app standing in for the Genius API (search plus song pages)
//! and the hosted inference API, so the server under test exercises its real
//! HTTP clients without leaving the machine.

use super::constants::*;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

struct FixtureSong {
    slug: &'static str,
    title: &'static str,
    artist: &'static str,
    lyrics: &'static str,
}

const SONGS: &[FixtureSong] = &[
    FixtureSong {
        slug: "the-test-band-sunny-morning-lyrics",
        title: HAPPY_TITLE,
        artist: HAPPY_ARTIST,
        lyrics: HAPPY_LYRICS,
    },
    FixtureSong {
        slug: "los-probadores-cancion-feliz-lyrics",
        title: SPANISH_TITLE,
        artist: SPANISH_ARTIST,
        lyrics: SPANISH_LYRICS,
    },
];

#[derive(Default)]
struct Counters {
    searches: AtomicUsize,
    page_downloads: AtomicUsize,
    classifications: AtomicUsize,
}

#[derive(Clone)]
struct UpstreamState {
    base_url: String,
    counters: Arc<Counters>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search(
    State(state): State<UpstreamState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    state.counters.searches.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", TEST_ACCESS_TOKEN);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"meta": {"status": 401}})),
        );
    }

    let q = query.q.to_lowercase();
    let hits: Vec<Value> = SONGS
        .iter()
        .filter(|song| q.contains(&song.title.to_lowercase()))
        .map(|song| {
            json!({
                "type": "song",
                "result": {
                    "title": song.title,
                    "url": format!("{}/songs/{}", state.base_url, song.slug),
                    "primary_artist": {"name": song.artist}
                }
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({"response": {"hits": hits}})))
}

fn lyrics_to_html(lyrics: &str) -> String {
    lyrics
        .lines()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("<br/>")
        .replace('\'', "&#x27;")
}

async fn song_page(
    State(state): State<UpstreamState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    state.counters.page_downloads.fetch_add(1, Ordering::SeqCst);

    match SONGS.iter().find(|song| song.slug == slug) {
        Some(song) => (
            StatusCode::OK,
            Html(format!(
                "<html><body><h1>{}</h1>\
                 <div class=\"Lyrics__Container\" data-lyrics-container=\"true\">{}</div>\
                 <div class=\"Footer\">Embed</div></body></html>",
                song.title,
                lyrics_to_html(song.lyrics)
            )),
        ),
        None => (StatusCode::NOT_FOUND, Html("not found".to_string())),
    }
}

#[derive(Deserialize)]
struct InferenceBody {
    inputs: String,
}

async fn classify(
    State(state): State<UpstreamState>,
    Path(model): Path<String>,
    Json(body): Json<InferenceBody>,
) -> impl IntoResponse {
    state.counters.classifications.fetch_add(1, Ordering::SeqCst);

    if body.inputs.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "empty inputs"})),
        );
    }

    if model.contains("emotion") {
        (
            StatusCode::OK,
            Json(json!([[
                {"label": "joy", "score": 0.8},
                {"label": "surprise", "score": 0.1},
                {"label": "sadness", "score": 0.0},
                {"label": "anger", "score": 0.0}
            ]])),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!([[
                {"label": "positive", "score": 0.7},
                {"label": "neutral", "score": 0.2},
                {"label": "negative", "score": 0.1}
            ]])),
        )
    }
}

/// Running fake upstream. Shuts down when dropped.
pub struct FakeUpstream {
    pub base_url: String,
    counters: Arc<Counters>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeUpstream {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let counters = Arc::new(Counters::default());
        let state = UpstreamState {
            base_url: base_url.clone(),
            counters: counters.clone(),
        };
        let app = Router::new()
            .route("/search", get(search))
            .route("/songs/{slug}", get(song_page))
            .route("/models/{*model}", post(classify))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url,
            counters,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn searches(&self) -> usize {
        self.counters.searches.load(Ordering::SeqCst)
    }

    pub fn page_downloads(&self) -> usize {
        self.counters.page_downloads.load(Ordering::SeqCst)
    }

    pub fn classifications(&self) -> usize {
        self.counters.classifications.load(Ordering::SeqCst)
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
