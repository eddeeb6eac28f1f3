use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod http;

/// URLから画像の生バイト列を取得するバックエンド
#[automock]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// 成功ステータス以外はエラー
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl ImageFetcher for Box<dyn ImageFetcher> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.as_ref().fetch(url).await
    }
}
