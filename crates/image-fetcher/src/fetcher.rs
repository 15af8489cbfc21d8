//! HTTP fetching of image bytes

use crate::error::{FetchError, Result};
use crate::ImageFetcher;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// HTTP client for fetching image bytes from remote servers
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a new fetcher with a default client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a fetcher around an existing client (e.g. one configured with
    /// timeouts by the caller).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "Fetching image");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to fetch image");
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let data = response.bytes().await?.to_vec();
        debug!(url = %url, size = data.len(), "Fetched image");
        Ok(data)
    }
}
