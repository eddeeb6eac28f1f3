use super::ImageSource;
use crate::core::types::ImageDescriptor;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub const DEFAULT_BASE_URL: &str = "https://api.thedogapi.com";
const SEARCH_PATH: &str = "/v1/images/search";

/// The Dog API クライアント
///
/// HTTPクライアントは外部で構築して注入する。
#[derive(Clone)]
pub struct DogApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DogApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }
}

#[async_trait]
impl ImageSource for DogApiClient {
    async fn fetch(&self, count: usize) -> Result<Vec<ImageDescriptor>> {
        let url = self.search_url();
        let mut request = self
            .client
            .get(&url)
            .query(&[("limit", count.to_string())]);

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to request image list: {url}"))?
            .error_for_status()
            .with_context(|| format!("Image list request rejected: {url}"))?;

        let mut descriptors: Vec<ImageDescriptor> = response
            .json()
            .await
            .with_context(|| format!("Failed to decode image list from: {url}"))?;

        // キーなしのAPIは limit を無視して多めに返すことがある
        descriptors.truncate(count);

        log::debug!("received {} descriptors from {url}", descriptors.len());
        Ok(descriptors)
    }

    fn source_name(&self) -> &'static str {
        "thedogapi"
    }
}
