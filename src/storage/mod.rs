use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod local;
pub mod memory;

/// 成果物を書き出すストレージバックエンドのトレイト
#[automock]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// アイテムを書き込む。親ディレクトリがなければ作成する
    async fn write_item(&self, id: &str, data: &[u8]) -> Result<()>;
}

#[async_trait]
impl StorageBackend for Box<dyn StorageBackend> {
    async fn write_item(&self, id: &str, data: &[u8]) -> Result<()> {
        self.as_ref().write_item(id, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_boxed_backend_delegates() {
        let storage = memory::MemoryStorageBackend::new();
        let boxed: Box<dyn StorageBackend> = Box::new(storage.clone());

        boxed.write_item("results/0_a_original.png", b"abc").await.unwrap();

        assert_eq!(storage.stored_ids(), vec!["results/0_a_original.png".to_string()]);
    }
}
