use super::ImageFetcher;
use crate::core::error::HttpStatusError;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// reqwest による画像取得
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {url}"))?;
        Ok(bytes.to_vec())
    }
}
