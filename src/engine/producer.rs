// Producer - 画像記述子の配信機能

use crate::core::ImageDescriptor;
use tokio::sync::mpsc;

/// Producer: 記述子をキューへ投入し、送信できた件数を返す
///
/// 送信側はタスク終了時にドロップされ、キューが閉じる。
pub fn spawn_producer(
    descriptors: Vec<ImageDescriptor>,
    work_tx: mpsc::Sender<ImageDescriptor>,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut sent = 0;
        for descriptor in descriptors {
            if (work_tx.send(descriptor).await).is_err() {
                // 全ワーカーが終了済み（キャンセル）
                log::debug!("Work queue closed after {sent} descriptors");
                break;
            }
            sent += 1;
        }
        sent
    })
}
