use super::StorageBackend;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// メモリ内保存のストレージ実装（テスト用）
///
/// クローンは同じ領域を共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageBackend {
    items: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用：保存済みの識別子一覧
    pub fn stored_ids(&self) -> Vec<String> {
        self.lock().map(|items| items.keys().cloned().collect()).unwrap_or_default()
    }

    /// テスト用：保存件数
    pub fn len(&self) -> usize {
        self.lock().map(|items| items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.items
            .lock()
            .map_err(|e| anyhow!("memory storage lock poisoned: {e}"))
    }
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn write_item(&self, id: &str, data: &[u8]) -> Result<()> {
        self.lock()?.insert(id.to_string(), data.to_vec());
        Ok(())
    }
}
