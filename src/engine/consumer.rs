// Consumer - 並列ワーカー機能

use crate::{
    codec::ImageCodec,
    core::{ImageDescriptor, ItemOutcome, ProgressReporter, WorkItem},
    fetcher::ImageFetcher,
    services::ItemProcessor,
    storage::StorageBackend,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// 全ワーカーが共有する状態
pub struct WorkerContext<F, L, S, R: ?Sized> {
    pub processor: Arc<ItemProcessor<F, L, S>>,
    pub reporter: Arc<R>,
    pub work_rx: Arc<Mutex<mpsc::Receiver<ImageDescriptor>>>,
    pub cancel: CancellationToken,
    /// 完了またはスキップしたアイテム数
    pub handled: Arc<AtomicUsize>,
    pub total_items: usize,
    pub report_progress: bool,
}

impl<F, L, S, R: ?Sized> Clone for WorkerContext<F, L, S, R> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
            reporter: Arc::clone(&self.reporter),
            work_rx: Arc::clone(&self.work_rx),
            cancel: self.cancel.clone(),
            handled: Arc::clone(&self.handled),
            total_items: self.total_items,
            report_progress: self.report_progress,
        }
    }
}

/// 単一ワーカー
///
/// キューが閉じて空になるか、キャンセルされるまでアイテムを取り出す。
/// キャンセルはアイテムの間でのみ確認し、処理中のアイテムは完了させる。
pub fn spawn_single_worker<F, L, S, R>(
    worker_index: usize,
    ctx: WorkerContext<F, L, S, R>,
) -> tokio::task::JoinHandle<Vec<ItemOutcome>>
where
    F: ImageFetcher + 'static,
    L: ImageCodec + 'static,
    S: StorageBackend + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut outcomes = Vec::new();

        loop {
            // 次の作業を取得
            let descriptor = {
                let mut rx = tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => break,
                    rx = ctx.work_rx.lock() => rx,
                };
                tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => break,
                    next = rx.recv() => match next {
                        Some(descriptor) => descriptor,
                        None => break, // キュー終了
                    },
                }
            };

            let item = WorkItem::new(descriptor, worker_index);
            let outcome = ctx.processor.process(&item, ctx.reporter.as_ref()).await;
            outcomes.push(outcome);

            let handled = ctx.handled.fetch_add(1, Ordering::Relaxed) + 1;
            if ctx.report_progress {
                ctx.reporter.report_progress(handled, ctx.total_items).await;
            }
        }

        if ctx.cancel.is_cancelled() {
            log::info!("Worker {worker_index} stopped by cancellation after {} items", outcomes.len());
        } else {
            log::debug!("Worker {worker_index} drained the queue after {} items", outcomes.len());
        }
        outcomes
    })
}

/// ワーカープール: ちょうど `worker_count` 個のワーカーを起動
pub fn spawn_workers<F, L, S, R>(
    ctx: WorkerContext<F, L, S, R>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<Vec<ItemOutcome>>>
where
    F: ImageFetcher + 'static,
    L: ImageCodec + 'static,
    S: StorageBackend + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    (0..worker_count)
        .map(|worker_index| spawn_single_worker(worker_index, ctx.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::standard::StandardImageCodec;
    use crate::core::OutputFormat;
    use crate::detection::{AnyDetector, DetectorKind};
    use crate::fetcher::MockImageFetcher;
    use crate::services::NoOpProgressReporter;
    use crate::storage::memory::MemoryStorageBackend;
    use image::RgbImage;
    use std::collections::HashSet;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(4, 4)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn context(
        descriptors: Vec<ImageDescriptor>,
        storage: MemoryStorageBackend,
        cancel: CancellationToken,
    ) -> WorkerContext<MockImageFetcher, StandardImageCodec, MemoryStorageBackend, NoOpProgressReporter>
    {
        let mut fetcher = MockImageFetcher::new();
        fetcher.expect_fetch().returning(|_| Ok(png_bytes()));

        let processor = ItemProcessor::new(
            Arc::new(fetcher),
            Arc::new(StandardImageCodec::new()),
            Arc::new(storage),
            AnyDetector::from(DetectorKind::Manual),
            AnyDetector::from(DetectorKind::Library),
            "results",
            OutputFormat::Png,
        );

        let total_items = descriptors.len();
        let (work_tx, work_rx) = mpsc::channel(total_items.max(1));
        for descriptor in descriptors {
            work_tx.try_send(descriptor).unwrap();
        }
        drop(work_tx);

        WorkerContext {
            processor: Arc::new(processor),
            reporter: Arc::new(NoOpProgressReporter::new()),
            work_rx: Arc::new(Mutex::new(work_rx)),
            cancel,
            handled: Arc::new(AtomicUsize::new(0)),
            total_items,
            report_progress: true,
        }
    }

    fn descriptors(count: usize) -> Vec<ImageDescriptor> {
        (0..count)
            .map(|i| ImageDescriptor::new(format!("dog{i}"), format!("https://cdn.example.com/{i}.jpg")))
            .collect()
    }

    #[tokio::test]
    async fn test_single_worker_drains_queue() {
        let storage = MemoryStorageBackend::new();
        let ctx = context(descriptors(2), storage.clone(), CancellationToken::new());
        let handled = Arc::clone(&ctx.handled);

        let outcomes = spawn_single_worker(0, ctx).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(handled.load(Ordering::Relaxed), 2);
        assert_eq!(storage.len(), 6);
        assert!(storage.stored_ids().iter().all(|id| id.contains("/0_dog")));
    }

    #[tokio::test]
    async fn test_worker_pool_processes_each_item_exactly_once() {
        let storage = MemoryStorageBackend::new();
        let ctx = context(descriptors(7), storage.clone(), CancellationToken::new());

        let handles = spawn_workers(ctx, 3);
        assert_eq!(handles.len(), 3);

        let mut identifiers = Vec::new();
        for handle in handles {
            identifiers.extend(handle.await.unwrap().iter().map(|o| o.identifier().to_string()));
        }

        let unique: HashSet<_> = identifiers.iter().cloned().collect();
        assert_eq!(identifiers.len(), 7);
        assert_eq!(unique.len(), 7);
        assert_eq!(storage.len(), 21);
    }

    #[tokio::test]
    async fn test_cancelled_worker_takes_nothing() {
        let storage = MemoryStorageBackend::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ctx = context(descriptors(3), storage.clone(), cancel);

        let outcomes = spawn_single_worker(0, ctx).await.unwrap();

        assert!(outcomes.is_empty());
        assert!(storage.is_empty());
    }
}
