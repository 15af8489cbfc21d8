//! Image byte fetching
//!
//! Fetches raw image bytes over HTTP for the cache to store. The fetch seam
//! is a trait so callers can inject fakes; retry-with-backoff is a wrapper
//! layered on top rather than a concern of any single fetcher.

mod error;
mod fetcher;
mod retry;

pub use error::{FetchError, Result};
pub use fetcher::HttpImageFetcher;
pub use retry::RetryingFetcher;

use async_trait::async_trait;

/// Byte-fetch contract consumed by the image cache.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
