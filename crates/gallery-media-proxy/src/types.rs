//! Core types for the gallery media proxy

use kv_image_cache::CacheStats;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for the media proxy
#[derive(Debug, Clone)]
pub struct MediaProxyConfig {
    pub port: u16,
    pub cache_dir: PathBuf,
    pub max_cache_size: u64,
    pub max_image_size: u64,
    pub max_age_secs: u64,
}

impl Default for MediaProxyConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cache_dir: PathBuf::from("./cache/images"),
            max_cache_size: 50 * 1024 * 1024, // 50MB
            max_image_size: 5 * 1024 * 1024,  // 5MB
            max_age_secs: 24 * 60 * 60,       // 24 hours
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}
