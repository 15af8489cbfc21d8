//! Gallery Media Proxy - caching image proxy for the photo gallery
//!
//! Serves gallery images through a size- and age-bounded cache so repeat
//! views never refetch, with the cache index persisted across restarts.

mod error;
mod server;
mod types;

use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use crate::types::MediaProxyConfig;
use chrono::Duration;
use image_fetcher::{HttpImageFetcher, RetryingFetcher};
use kv_image_cache::{CacheConfig, ImageCache};
use kv_store::FileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("gallery_media_proxy=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Gallery Media Proxy...");

    // Load configuration from environment
    let config = load_config();
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", config.cache_dir);
    info!(
        "Max cache size: {} MB",
        config.max_cache_size / (1024 * 1024)
    );
    info!(
        "Max image size: {} MB",
        config.max_image_size / (1024 * 1024)
    );
    info!("Cache max age: {} seconds", config.max_age_secs);

    // Create the store, fetcher, and cache
    let store = FileStore::new(config.cache_dir);
    store.init().await?;

    let fetcher = RetryingFetcher::new(HttpImageFetcher::new());

    let cache = ImageCache::new(
        Arc::new(store),
        Arc::new(fetcher),
        CacheConfig {
            max_age: Duration::seconds(config.max_age_secs as i64),
            max_total_size: config.max_cache_size,
            max_item_size: config.max_image_size,
            ..CacheConfig::default()
        },
    );

    // Create shared state
    let state: SharedState = Arc::new(ServerState::new(cache));

    // Start HTTP server (blocking)
    start_server(state, config.port).await?;

    Ok(())
}

fn load_config() -> MediaProxyConfig {
    let defaults = MediaProxyConfig::default();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(defaults.port);

    let cache_dir = std::env::var("CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.cache_dir);

    let max_cache_size = std::env::var("MAX_CACHE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.max_cache_size);

    let max_image_size = std::env::var("MAX_IMAGE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.max_image_size);

    let max_age_secs = std::env::var("CACHE_MAX_AGE_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.max_age_secs);

    MediaProxyConfig {
        port,
        cache_dir,
        max_cache_size,
        max_image_size,
        max_age_secs,
    }
}
