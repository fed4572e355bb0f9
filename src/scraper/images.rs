//! Photo download and base64 encoding.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::retry::{retry, RetryPolicy};
use crate::types::MAX_IMAGES;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// HTTP fetch boundary
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// GET `url` and return the body; non-success statuses are errors
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Image fetcher backed by reqwest
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", url, status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Download up to `max_images` sources (capped at `MAX_IMAGES`) and
/// base64-encode them.
///
/// A source that still fails after retrying is skipped; the rest carry on.
pub async fn download_images<F>(
    fetcher: &F,
    sources: &[Url],
    max_images: usize,
    policy: &RetryPolicy,
) -> Vec<String>
where
    F: ImageFetcher + ?Sized,
{
    let mut images = Vec::new();

    for url in sources.iter().take(max_images.min(MAX_IMAGES)) {
        let name = format!("Image download {}", url);
        match retry(policy, &name, || fetcher.fetch(url)).await {
            Some(bytes) => {
                debug!("Downloaded {} bytes from {}", bytes.len(), url);
                images.push(STANDARD.encode(bytes));
            }
            None => warn!("Skipping image {}", url),
        }
    }

    images
}
