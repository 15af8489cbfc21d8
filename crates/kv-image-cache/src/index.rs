//! Persisted cache index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for one cached payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub size: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_access: DateTime<Utc>,
}

/// The set of entries currently backed by stored payloads.
///
/// `total_size` is maintained to equal the sum of entry sizes; `add` is
/// replace-aware so re-adding a key never double-counts.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheIndex {
    pub entries: HashMap<String, CacheEntry>,
    pub total_size: u64,
}

impl CacheIndex {
    /// Insert or replace the entry for `key`.
    pub fn add(&mut self, key: String, size: u64, last_access: DateTime<Utc>) {
        if let Some(prev) = self.entries.insert(key, CacheEntry { size, last_access }) {
            self.total_size -= prev.size;
        }
        self.total_size += size;
    }

    /// Remove the entry for `key`, if present.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key);
        if let Some(ref entry) = entry {
            self.total_size -= entry.size;
        }
        entry
    }

    /// Key of the entry with the oldest last access, ties arbitrary.
    pub fn oldest_key(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_add_and_remove_track_total_size() {
        let mut index = CacheIndex::default();
        let now = Utc::now();

        index.add("a".to_string(), 100, now);
        index.add("b".to_string(), 50, now);
        assert_eq!(index.total_size, 150);
        assert_eq!(index.len(), 2);

        index.remove("a");
        assert_eq!(index.total_size, 50);
        assert_eq!(index.len(), 1);

        // Removing an absent key changes nothing
        assert!(index.remove("a").is_none());
        assert_eq!(index.total_size, 50);
    }

    #[test]
    fn test_replace_does_not_double_count() {
        let mut index = CacheIndex::default();
        let now = Utc::now();

        index.add("a".to_string(), 100, now);
        index.add("a".to_string(), 70, now);
        assert_eq!(index.total_size, 70);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_oldest_key() {
        let mut index = CacheIndex::default();
        let now = Utc::now();

        assert!(index.oldest_key().is_none());

        index.add("newer".to_string(), 1, now);
        index.add("oldest".to_string(), 1, now - Duration::hours(2));
        index.add("middle".to_string(), 1, now - Duration::hours(1));

        assert_eq!(index.oldest_key().as_deref(), Some("oldest"));
    }

    #[test]
    fn test_serde_roundtrip_uses_millisecond_timestamps() {
        let mut index = CacheIndex::default();
        index.add(
            "photo_cache_abc".to_string(),
            1234,
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        );

        let json = serde_json::to_string(&index).unwrap();
        assert!(json.contains("1700000000000"));

        let parsed: CacheIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_size, 1234);
        assert_eq!(
            parsed.entries["photo_cache_abc"].last_access,
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
        );
    }
}
