//! In-memory store with an optional byte quota

use crate::error::{Result, StoreError};
use crate::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct Inner {
    map: HashMap<String, String>,
    used: u64,
}

/// Hash-map backed store. With a quota set, `set` fails once the sum of
/// value lengths would exceed it, which is how browser-local storage behaves.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    quota: Option<u64>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                used: 0,
            }),
            quota: None,
        }
    }

    /// Create a store that rejects writes once total value bytes exceed
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                used: 0,
            }),
            quota: Some(quota_bytes),
        }
    }

    /// Total bytes currently stored across all values.
    pub async fn used_bytes(&self) -> u64 {
        self.inner.read().await.used
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner.map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let prev_len = inner.map.get(key).map(|v| v.len() as u64).unwrap_or(0);
        let new_used = inner.used - prev_len + value.len() as u64;

        if let Some(quota) = self.quota {
            // Check before mutating so a rejected write leaves the old value.
            if new_used > quota {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len() as u64,
                    available: quota.saturating_sub(inner.used - prev_len),
                });
            }
        }

        inner.map.insert(key.to_string(), value.to_string());
        inner.used = new_used;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(value) = inner.map.remove(key) {
            inner.used -= value.len() as u64;
        }
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner.map.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();

        assert!(store.get("a").await.unwrap().is_none());

        store.set("a", "hello").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("hello"));

        store.remove("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());

        // Removing an absent key is fine
        store.remove("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_value() {
        let store = MemoryStore::new();
        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.used_bytes().await, 6);
    }

    #[tokio::test]
    async fn test_list_keys() {
        let store = MemoryStore::new();
        store.set("one", "1").await.unwrap();
        store.set("two", "2").await.unwrap();

        let mut keys = store.list_keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_quota_rejects_write() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345").await.unwrap();

        let err = store.set("b", "123456789").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));

        // Rejected write changed nothing
        assert!(store.get("b").await.unwrap().is_none());
        assert_eq!(store.used_bytes().await, 5);
    }

    #[tokio::test]
    async fn test_quota_replace_charges_delta() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345678").await.unwrap();

        // Replacing an 8-byte value with a 10-byte one fits the quota even
        // though 8 + 10 would not.
        store.set("a", "1234567890").await.unwrap();
        assert_eq!(store.used_bytes().await, 10);

        let err = store.set("a", "12345678901").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1234567890"));
    }
}
