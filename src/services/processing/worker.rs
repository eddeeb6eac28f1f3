// Worker - 単一画像の処理機能

use crate::codec::ImageCodec;
use crate::core::{
    ArtifactKind, ItemOutcome, OutputFormat, ProcessingError, ProcessingResult, ProgressReporter,
    WorkItem,
};
use crate::detection::{AnyDetector, ImageDetector};
use crate::fetcher::ImageFetcher;
use crate::storage::StorageBackend;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// 1アイテム分の処理（ダウンロード → デコード → 検出 → 保存）
///
/// ワーカー間で `Arc` 共有される。内部状態は持たない。
pub struct ItemProcessor<F, L, S> {
    fetcher: Arc<F>,
    codec: Arc<L>,
    storage: Arc<S>,
    detectors: [AnyDetector; 2],
    output_dir: PathBuf,
    output_format: OutputFormat,
}

impl<F, L, S> ItemProcessor<F, L, S>
where
    F: ImageFetcher + 'static,
    L: ImageCodec + 'static,
    S: StorageBackend + 'static,
{
    pub fn new(
        fetcher: Arc<F>,
        codec: Arc<L>,
        storage: Arc<S>,
        primary: AnyDetector,
        comparison: AnyDetector,
        output_dir: impl Into<PathBuf>,
        output_format: OutputFormat,
    ) -> Self {
        // 設定の順序に関わらず manual → lib の順で書き出す
        let mut detectors = [primary, comparison];
        detectors.sort_by_key(AnyDetector::kind);

        Self {
            fetcher,
            codec,
            storage,
            detectors,
            output_dir: output_dir.into(),
            output_format,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 1アイテムを処理する
    ///
    /// ダウンロードかデコードに失敗したらスキップ。成果物の保存失敗は
    /// 数えるだけで残りの成果物は書き込む。
    pub async fn process<R>(&self, item: &WorkItem, reporter: &R) -> ItemOutcome
    where
        R: ProgressReporter + ?Sized,
    {
        let start_time = Instant::now();
        let descriptor = &item.descriptor;

        reporter.report_item_started(item).await;

        let image = match self.download_and_decode(item).await {
            Ok(image) => image,
            Err(error) => {
                log::warn!(
                    "Skipping image {} from {}: {error:#}",
                    descriptor.identifier,
                    descriptor.source_url
                );
                let reason = error.to_string();
                reporter.report_item_skipped(item, &reason).await;
                return ItemOutcome::Skipped {
                    identifier: descriptor.identifier.clone(),
                    url: descriptor.source_url.clone(),
                    reason,
                };
            }
        };

        let mut artifacts_written = Vec::with_capacity(3);
        let mut artifact_failures = 0;

        let original = self
            .persist(item, ArtifactKind::Original, image.clone(), reporter)
            .await;
        Self::tally(original, &mut artifacts_written, &mut artifact_failures);

        let image = Arc::new(image);
        for detector in self.detectors {
            let kind = ArtifactKind::Detection(detector.kind());
            let result = match Self::detect(detector, Arc::clone(&image)).await {
                Ok(edges) => self.persist(item, kind, edges, reporter).await,
                Err(error) => Err(error),
            };
            Self::tally(result, &mut artifacts_written, &mut artifact_failures);
        }

        ItemOutcome::Completed {
            identifier: descriptor.identifier.clone(),
            worker_index: item.worker_index,
            artifacts_written,
            artifact_failures,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    async fn download_and_decode(&self, item: &WorkItem) -> ProcessingResult<DynamicImage> {
        let descriptor = &item.descriptor;

        let bytes = self
            .fetcher
            .fetch(&descriptor.source_url)
            .await
            .map_err(|e| ProcessingError::fetch(&descriptor.source_url, e))?;

        let loaded = self
            .codec
            .load_from_bytes(&bytes)
            .await
            .map_err(|e| ProcessingError::decode(&descriptor.identifier, e))?;

        log::debug!(
            "Decoded {} ({}x{}) in {}ms",
            descriptor.identifier,
            loaded.dimensions.0,
            loaded.dimensions.1,
            loaded.decode_time_ms
        );
        Ok(loaded.image)
    }

    /// 検出処理をブロッキングプールで実行
    async fn detect(detector: AnyDetector, image: Arc<DynamicImage>) -> ProcessingResult<DynamicImage> {
        tokio::task::spawn_blocking(move || detector.edge_detection(&image))
            .await
            .map_err(|e| ProcessingError::detection(detector.kind().artifact_suffix(), e))
    }

    async fn persist<R>(
        &self,
        item: &WorkItem,
        kind: ArtifactKind,
        image: DynamicImage,
        reporter: &R,
    ) -> ProcessingResult<PathBuf>
    where
        R: ProgressReporter + ?Sized,
    {
        let path = item.artifact_path(&self.output_dir, kind, self.output_format);
        let id = path.to_string_lossy().to_string();

        let bytes = self
            .codec
            .encode(image, self.output_format)
            .await
            .map_err(|e| ProcessingError::artifact_write(&id, e))?;

        self.storage
            .write_item(&id, &bytes)
            .await
            .map_err(|e| ProcessingError::artifact_write(&id, e))?;

        reporter.report_artifact_saved(item, &path).await;
        Ok(path)
    }

    fn tally(
        result: ProcessingResult<PathBuf>,
        written: &mut Vec<PathBuf>,
        failures: &mut usize,
    ) {
        match result {
            Ok(path) => written.push(path),
            Err(error) => {
                log::error!("[{}] {error:#}", error.category().as_str());
                *failures += 1;
            }
        }
    }
}
