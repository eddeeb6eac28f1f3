// ProcessingEngine - 完全依存性注入によるバッチ処理エンジン
// 全ての依存関係がコンストラクタで注入される

use super::orchestrator::BatchOrchestrator;
use crate::{
    codec::ImageCodec,
    core::{
        ImageDescriptor, ProcessingConfig, ProcessingError, ProcessingResult, ProcessingSummary,
        ProgressReporter,
    },
    detection::AnyDetector,
    fetcher::ImageFetcher,
    image_source::ImageSource,
    services::{validate_config, ItemProcessor},
    storage::StorageBackend,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 完全依存性注入によるバッチ処理エンジン
///
/// 画像ソース、ダウンローダー、コーデック、ストレージ、設定、レポーターを
/// 全てコンストラクタで受け取る。ワーカー間で共有するものは初めから
/// `Arc` で保持する。
pub struct ProcessingEngine<Src, F, L, S, C, R> {
    source: Arc<Src>,
    fetcher: Arc<F>,
    codec: Arc<L>,
    storage: Arc<S>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<Src, F, L, S, C, R> ProcessingEngine<Src, F, L, S, C, R>
where
    Src: ImageSource + 'static,
    F: ImageFetcher + 'static,
    L: ImageCodec + 'static,
    S: StorageBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    /// 新しい処理エンジンを作成
    pub fn new(source: Src, fetcher: F, codec: L, storage: S, config: C, reporter: R) -> Self {
        Self {
            source: Arc::new(source),
            fetcher: Arc::new(fetcher),
            codec: Arc::new(codec),
            storage: Arc::new(storage),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// 画像ソースから `batch_size` 件を取得して処理する
    ///
    /// ソースの失敗はバッチ全体のエラーになる。
    pub async fn run_batch(&self, cancel: CancellationToken) -> ProcessingResult<ProcessingSummary> {
        validate_config(self.config.as_ref())?;

        let batch_size = self.config.batch_size();
        log::info!(
            "Requesting {batch_size} images from {}",
            self.source.source_name()
        );

        let descriptors = self
            .source
            .fetch(batch_size)
            .await
            .map_err(ProcessingError::source_request)?;
        log::info!("Received {} image links", descriptors.len());

        self.process_descriptors(descriptors, cancel).await
    }

    /// 取得済みの記述子リストを処理する
    pub async fn process_descriptors(
        &self,
        descriptors: Vec<ImageDescriptor>,
        cancel: CancellationToken,
    ) -> ProcessingResult<ProcessingSummary> {
        validate_config(self.config.as_ref())?;

        let processor = ItemProcessor::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.codec),
            Arc::clone(&self.storage),
            AnyDetector::from(self.config.primary_detector()),
            AnyDetector::from(self.config.comparison_detector()),
            self.config.output_dir(),
            self.config.output_format(),
        );

        // バッチごとに新しいオーケストレーター
        let mut orchestrator = BatchOrchestrator::new(Arc::new(processor))
            .with_progress_reporting(self.config.enable_progress_reporting());

        orchestrator
            .run(
                descriptors,
                self.config.max_concurrent_tasks(),
                Arc::clone(&self.reporter),
                cancel,
            )
            .await
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// ストレージへの参照を取得
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
