//! Bounded image cache over a persistent key-value store
//!
//! Maps image URLs to cached bytes with a total size budget, a per-item size
//! limit, and a per-item age limit. Least-recently-used entries are evicted
//! under size pressure. The index is persisted in the same store as the
//! payloads, so the cache survives process restarts.
//!
//! No operation here lets an error cross the public boundary: every failure
//! is logged and degrades to a cache miss or a `false` write result.

mod cache;
mod index;
mod types;

pub use cache::ImageCache;
pub use index::{CacheEntry, CacheIndex};
pub use types::{CacheConfig, CacheStats};
