//! HTTP server for the media proxy endpoints
//!
//! Provides /health, /image?url=..., and DELETE /cache.

use crate::types::HealthResponse;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use chrono::{DateTime, Utc};
use kv_image_cache::ImageCache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: ImageCache,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(cache: ImageCache) -> Self {
        Self {
            cache,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct ImageQuery {
    url: String,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/image", get(get_image))
        .route("/cache", delete(clear_cache))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache_stats = state.cache.stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: cache_stats,
    })
}

/// Serve an image through the cache
async fn get_image(
    State(state): State<SharedState>,
    Query(query): Query<ImageQuery>,
) -> Response {
    match url::Url::parse(&query.url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "url must be an absolute http(s) URL".to_string(),
                }),
            )
                .into_response();
        }
    }

    let from_cache = state.cache.is_cached(&query.url).await;

    match state.cache.load_and_cache(&query.url).await {
        Some(data) => {
            let cache_header = if from_cache { "HIT" } else { "MISS" };

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type_for(&query.url))
                .header(header::CACHE_CONTROL, "public, max-age=86400")
                .header("X-Cache", cache_header)
                .body(Body::from(data))
                .unwrap()
        }
        None => {
            warn!(url = %query.url, "Failed to load image");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Image not found".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Manual cache reset
async fn clear_cache(State(state): State<SharedState>) -> StatusCode {
    state.cache.clear_all().await;
    info!("Cache cleared by request");
    StatusCode::NO_CONTENT
}

/// Best-effort content type from the URL's file extension.
fn content_type_for(url: &str) -> &'static str {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    match path.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
