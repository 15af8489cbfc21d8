//! Retry policy around a fetcher

use crate::error::Result;
use crate::ImageFetcher;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Wraps a fetcher with linear-backoff retries.
///
/// A failed attempt `n` (1-based) waits `base_delay * n` before the next try.
/// The cache itself never retries; this policy sits outside it.
pub struct RetryingFetcher<F> {
    inner: F,
    max_retries: u32,
    base_delay: Duration,
}

impl<F: ImageFetcher> RetryingFetcher<F> {
    /// Wrap `inner` with the default policy: 3 retries, 1s base delay.
    pub fn new(inner: F) -> Self {
        Self::with_policy(inner, 3, Duration::from_secs(1))
    }

    pub fn with_policy(inner: F, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }
}

#[async_trait]
impl<F: ImageFetcher> ImageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut attempt = 0u32;
        loop {
            match self.inner.fetch(url).await {
                Ok(data) => return Ok(data),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }
                    warn!(
                        url = %url,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Image fetch failed, retrying"
                    );
                    tokio::time::sleep(self.base_delay * attempt).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `fail_count` calls, then succeeds.
    struct FlakyFetcher {
        fail_count: u32,
        calls: AtomicU32,
    }

    impl FlakyFetcher {
        fn new(fail_count: u32) -> Self {
            Self {
                fail_count,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for FlakyFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_count {
                Err(FetchError::Status {
                    status: 503,
                    url: url.to_string(),
                })
            } else {
                Ok(b"bytes".to_vec())
            }
        }
    }

    #[tokio::test]
    async fn test_succeeds_without_retry() {
        let fetcher = RetryingFetcher::with_policy(FlakyFetcher::new(0), 3, Duration::ZERO);
        let data = fetcher.fetch("https://x/img.png").await.unwrap();
        assert_eq!(data, b"bytes");
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let fetcher = RetryingFetcher::with_policy(FlakyFetcher::new(2), 3, Duration::ZERO);
        let data = fetcher.fetch("https://x/img.png").await.unwrap();
        assert_eq!(data, b"bytes");
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let fetcher = RetryingFetcher::with_policy(FlakyFetcher::new(10), 2, Duration::ZERO);
        let err = fetcher.fetch("https://x/img.png").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        // Initial attempt plus two retries
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }
}
