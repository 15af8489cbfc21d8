//! Cache configuration and statistics

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the image cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entries whose last access is older than this are eligible for
    /// age-based eviction.
    pub max_age: Duration,
    /// Total cached payload bytes may not exceed this.
    pub max_total_size: u64,
    /// Payloads larger than this are never cached.
    pub max_item_size: u64,
    /// The size pass evicts down to `max_total_size * evict_to_fraction`,
    /// leaving headroom so near-boundary writes do not evict every time.
    pub evict_to_fraction: f64,
    /// Store-key prefix for payloads; the index lives under `<prefix>index`.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(24),
            max_total_size: 50 * 1024 * 1024,
            max_item_size: 5 * 1024 * 1024,
            evict_to_fraction: 0.8,
            key_prefix: "photo_cache_".to_string(),
        }
    }
}

impl CacheConfig {
    /// Byte total the size pass evicts down to.
    pub fn evict_target(&self) -> u64 {
        (self.max_total_size as f64 * self.evict_to_fraction) as u64
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_size: u64,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_age, Duration::hours(24));
        assert_eq!(config.max_total_size, 50 * 1024 * 1024);
        assert_eq!(config.max_item_size, 5 * 1024 * 1024);
        assert_eq!(config.key_prefix, "photo_cache_");
    }

    #[test]
    fn test_evict_target() {
        let config = CacheConfig {
            max_total_size: 1000,
            evict_to_fraction: 0.8,
            ..CacheConfig::default()
        };
        assert_eq!(config.evict_target(), 800);
    }

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
