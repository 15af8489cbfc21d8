//! Bounded image cache

use crate::index::CacheIndex;
use crate::types::{CacheConfig, CacheStats};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use image_fetcher::ImageFetcher;
use kv_store::KeyValueStore;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Image cache over an injected key-value store and byte fetcher.
///
/// The index is loaded from the store at the start of each operation and
/// persisted after mutation; all state lives in the store. Interleaved
/// operations may drift the size bookkeeping, which the next eviction pass
/// corrects; payload correctness is unaffected since every write is keyed by
/// its own URL's derived key.
pub struct ImageCache {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn ImageFetcher>,
    config: CacheConfig,
    index_key: String,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImageCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn ImageFetcher>,
        config: CacheConfig,
    ) -> Self {
        let index_key = format!("{}index", config.key_prefix);
        Self {
            store,
            fetcher,
            config,
            index_key,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Derive the store key for a URL's payload.
    pub fn payload_key(&self, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{}{}", self.config.key_prefix, hex::encode(hasher.finalize()))
    }

    /// Whether a payload is currently stored for `url`. No side effects;
    /// a store read failure reads as "not cached".
    pub async fn is_cached(&self, url: &str) -> bool {
        let key = self.payload_key(url);
        match self.store.get(&key).await {
            Ok(present) => present.is_some(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to check cache, treating as miss");
                false
            }
        }
    }

    /// Fetch the cached payload for `url`, refreshing its last-access time.
    pub async fn get_cached(&self, url: &str) -> Option<Vec<u8>> {
        let key = self.payload_key(url);

        let encoded = match self.store.get(&key).await {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read cached payload");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match BASE64.decode(&encoded) {
            Ok(data) => {
                let mut index = self.load_index().await;
                if let Some(entry) = index.entries.get_mut(&key) {
                    entry.last_access = Utc::now();
                    self.persist_index(&index).await;
                }
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Some(data)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt cached payload, removing entry");
                if let Err(e) = self.store.remove(&key).await {
                    warn!(key = %key, error = %e, "Failed to remove corrupt payload");
                }
                let mut index = self.load_index().await;
                if index.remove(&key).is_some() {
                    self.persist_index(&index).await;
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `payload` for `url`. Returns `false` when the payload is
    /// oversized, when eviction cannot free enough room, or when the store
    /// rejects the write twice.
    pub async fn cache_image(&self, url: &str, payload: &[u8]) -> bool {
        let size = payload.len() as u64;
        if size > self.config.max_item_size {
            warn!(url = %url, size, max = self.config.max_item_size, "Image too large to cache");
            return false;
        }

        let mut index = self.load_index().await;

        if index.total_size + size > self.config.max_total_size {
            self.evict(&mut index).await;

            if index.total_size + size > self.config.max_total_size {
                warn!(url = %url, size, total = index.total_size, "Cache full, skipping");
                return false;
            }
        }

        let key = self.payload_key(url);
        let encoded = BASE64.encode(payload);

        if let Err(e) = self.store.set(&key, &encoded).await {
            // Last-resort recovery: drop everything and try once more.
            warn!(key = %key, error = %e, "Store write failed, clearing cache and retrying");
            self.clear_all().await;
            index = CacheIndex::default();

            if let Err(e) = self.store.set(&key, &encoded).await {
                warn!(key = %key, error = %e, "Retry after clear failed, not caching");
                return false;
            }
        }

        index.add(key.clone(), size, Utc::now());
        self.persist_index(&index).await;
        debug!(key = %key, size, "Cached image");
        true
    }

    /// Return the cached payload for `url`, fetching and caching it on a
    /// miss. Caching failure does not affect the returned bytes; fetch
    /// failure returns `None`.
    pub async fn load_and_cache(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(data) = self.get_cached(url).await {
            return Some(data);
        }

        let data = match self.fetcher.fetch(url).await {
            Ok(data) => data,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to load image");
                return None;
            }
        };

        self.cache_image(url, &data).await;
        Some(data)
    }

    /// Remove every cache-prefixed key, payloads and index alike.
    /// Idempotent; absorbs store errors.
    pub async fn clear_all(&self) {
        match self.store.list_keys().await {
            Ok(keys) => {
                for key in keys.iter().filter(|k| k.starts_with(&self.config.key_prefix)) {
                    if let Err(e) = self.store.remove(key).await {
                        warn!(key = %key, error = %e, "Failed to remove cached item");
                    }
                }
                debug!("Cache cleared");
            }
            Err(e) => {
                warn!(error = %e, "Failed to enumerate cache keys for clearing");
            }
        }
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let index = self.load_index().await;
        CacheStats {
            entries: index.len(),
            total_size: index.total_size,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Age pass then LRU size pass; persists the index once if anything was
    /// removed. A payload that fails to delete is still dropped from the
    /// index so the index never references more than what is retrievable.
    async fn evict(&self, index: &mut CacheIndex) {
        let now = Utc::now();
        let mut changed = false;

        let expired: Vec<String> = index
            .entries
            .iter()
            .filter(|(_, e)| now - e.last_access > self.config.max_age)
            .map(|(k, _)| k.clone())
            .collect();

        for key in expired {
            if let Err(e) = self.store.remove(&key).await {
                warn!(key = %key, error = %e, "Failed to remove expired payload");
            }
            index.remove(&key);
            changed = true;
            debug!(key = %key, "Evicted expired cache entry");
        }

        let target = self.config.evict_target();
        while index.total_size > target && !index.is_empty() {
            let Some(oldest) = index.oldest_key() else {
                break;
            };
            if let Err(e) = self.store.remove(&oldest).await {
                warn!(key = %oldest, error = %e, "Failed to remove oldest payload");
            }
            index.remove(&oldest);
            changed = true;
            debug!(key = %oldest, "Evicted oldest cache entry");
        }

        if changed {
            self.persist_index(index).await;
        }
    }

    /// Load the index from the store; anything unreadable means a fresh
    /// start.
    async fn load_index(&self) -> CacheIndex {
        match self.store.get(&self.index_key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(index) => index,
                Err(e) => {
                    warn!(error = %e, "Corrupt cache index, starting fresh");
                    CacheIndex::default()
                }
            },
            Ok(None) => CacheIndex::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load cache index, starting fresh");
                CacheIndex::default()
            }
        }
    }

    async fn persist_index(&self, index: &CacheIndex) {
        let json = match serde_json::to_string(index) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache index");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.index_key, &json).await {
            warn!(error = %e, "Failed to persist cache index");
        }
    }
}
