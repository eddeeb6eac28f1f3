// Orchestrator - ワーカープールのオーケストレーション
// キュー投入、ワーカー起動、全ワーカーの合流、集計

use super::{
    consumer::{spawn_workers, WorkerContext},
    producer::spawn_producer,
};
use crate::{
    codec::ImageCodec,
    core::{
        ImageDescriptor, OrchestratorState, ProcessingError, ProcessingResult, ProcessingSummary,
        ProgressReporter,
    },
    fetcher::ImageFetcher,
    services::ItemProcessor,
    storage::StorageBackend,
};
use chrono::Utc;
use std::sync::{atomic::AtomicUsize, Arc};
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// 1バッチ分のワーカープールを管理する
///
/// `Idle → Dispatching → Draining → Complete` の順に遷移し、
/// `Complete` からは戻らない。次のバッチには新しいインスタンスを使う。
pub struct BatchOrchestrator<F, L, S> {
    processor: Arc<ItemProcessor<F, L, S>>,
    state: OrchestratorState,
    report_progress: bool,
}

impl<F, L, S> BatchOrchestrator<F, L, S>
where
    F: ImageFetcher + 'static,
    L: ImageCodec + 'static,
    S: StorageBackend + 'static,
{
    pub fn new(processor: Arc<ItemProcessor<F, L, S>>) -> Self {
        Self {
            processor,
            state: OrchestratorState::Idle,
            report_progress: true,
        }
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.report_progress = enable;
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// 記述子を全て処理し、全ワーカーの終了を待ってサマリーを返す
    pub async fn run<R>(
        &mut self,
        descriptors: Vec<ImageDescriptor>,
        worker_count: usize,
        reporter: Arc<R>,
        cancel: CancellationToken,
    ) -> ProcessingResult<ProcessingSummary>
    where
        R: ProgressReporter + ?Sized + 'static,
    {
        if self.state != OrchestratorState::Idle {
            return Err(ProcessingError::invalid_state(
                OrchestratorState::Idle,
                self.state,
            ));
        }

        if worker_count == 0 {
            return Err(ProcessingError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }

        let started_at = Utc::now();
        let start_time = Instant::now();
        let total_items = descriptors.len();

        self.state = OrchestratorState::Dispatching;
        log::info!("Dispatching {total_items} items to {worker_count} workers");
        reporter.report_started(total_items, worker_count).await;

        // バッチ全体が入るキュー（Producerは待たない）
        let (work_tx, work_rx) = mpsc::channel::<ImageDescriptor>(total_items.max(1));

        let ctx = WorkerContext {
            processor: Arc::clone(&self.processor),
            reporter: Arc::clone(&reporter),
            work_rx: Arc::new(Mutex::new(work_rx)),
            cancel: cancel.clone(),
            handled: Arc::new(AtomicUsize::new(0)),
            total_items,
            report_progress: self.report_progress,
        };

        // ワーカー起動
        let worker_handles = spawn_workers(ctx, worker_count);

        // Producer起動と完了待ち（ここでキューが閉じる）
        let sent = spawn_producer(descriptors, work_tx)
            .await
            .map_err(ProcessingError::task)?;
        log::debug!("Enqueued {sent}/{total_items} items");

        self.state = OrchestratorState::Draining;

        // 全ワーカーの合流
        let mut outcomes = Vec::with_capacity(total_items);
        for handle in worker_handles {
            outcomes.extend(handle.await.map_err(ProcessingError::task)?);
        }

        self.state = OrchestratorState::Complete;

        let summary = ProcessingSummary::from_outcomes(
            total_items,
            worker_count,
            &outcomes,
            started_at,
            start_time.elapsed().as_millis() as u64,
        );

        if summary.cancelled_items > 0 {
            log::warn!(
                "Batch cancelled: {} of {} items were not processed",
                summary.cancelled_items,
                total_items
            );
        }
        log::info!(
            "Batch complete: {} completed, {} skipped, {} artifacts written, {} artifact failures",
            summary.completed_items,
            summary.skipped_items,
            summary.artifacts_written,
            summary.artifact_failures
        );

        reporter.report_completed(&summary).await;
        Ok(summary)
    }
}
