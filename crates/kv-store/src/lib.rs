//! Persistent string key-value store
//!
//! Provides the storage contract consumed by the image cache: string keys,
//! string values, per-key atomic operations. Ships an in-memory store with an
//! optional byte quota for tests and a file-per-key store for durability.

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Storage contract for string keys and values.
///
/// Per-key operations are atomic from the caller's point of view; no
/// multi-key transaction is offered or assumed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// May fail with [`StoreError::QuotaExceeded`] on bounded stores; a
    /// failed set leaves the previous value intact.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is not an
    /// error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Enumerate every key currently present.
    async fn list_keys(&self) -> Result<Vec<String>>;
}
