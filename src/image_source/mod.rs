use crate::core::types::ImageDescriptor;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod dog_api;

/// 画像記述子の取得元
#[automock]
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// 最大 `count` 件の記述子を取得する
    ///
    /// 通信失敗や不正なレスポンスはバッチ全体の失敗として扱われる。
    async fn fetch(&self, count: usize) -> Result<Vec<ImageDescriptor>>;

    /// 取得元の名前
    fn source_name(&self) -> &'static str;
}

#[async_trait]
impl ImageSource for Box<dyn ImageSource> {
    async fn fetch(&self, count: usize) -> Result<Vec<ImageDescriptor>> {
        self.as_ref().fetch(count).await
    }

    fn source_name(&self) -> &'static str {
        self.as_ref().source_name()
    }
}
