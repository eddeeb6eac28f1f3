// パイプラインの抽象化インターフェース定義

use super::types::{OutputFormat, ProcessingSummary, WorkItem};
use crate::detection::DetectorKind;
use async_trait::async_trait;
use mockall::automock;
use std::path::{Path, PathBuf};

/// パイプラインの設定を抽象化するトレイト
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 同時に動かすワーカー数
    fn max_concurrent_tasks(&self) -> usize;

    /// 画像ソースへ要求する件数
    fn batch_size(&self) -> usize;

    /// 成果物の出力ディレクトリ
    fn output_dir(&self) -> PathBuf;

    /// 成果物のエンコード形式
    fn output_format(&self) -> OutputFormat;

    /// 主検出器（既定は手書き実装）
    fn primary_detector(&self) -> DetectorKind;

    /// 比較用検出器（既定はライブラリ実装）
    fn comparison_detector(&self) -> DetectorKind;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

impl ProcessingConfig for Box<dyn ProcessingConfig> {
    fn max_concurrent_tasks(&self) -> usize {
        self.as_ref().max_concurrent_tasks()
    }

    fn batch_size(&self) -> usize {
        self.as_ref().batch_size()
    }

    fn output_dir(&self) -> PathBuf {
        self.as_ref().output_dir()
    }

    fn output_format(&self) -> OutputFormat {
        self.as_ref().output_format()
    }

    fn primary_detector(&self) -> DetectorKind {
        self.as_ref().primary_detector()
    }

    fn comparison_detector(&self) -> DetectorKind {
        self.as_ref().comparison_detector()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// バッチ開始時の報告
    async fn report_started(&self, total_items: usize, worker_count: usize);

    /// アイテムのダウンロード開始
    async fn report_item_started(&self, item: &WorkItem);

    /// 成果物の保存完了
    async fn report_artifact_saved(&self, item: &WorkItem, path: &Path);

    /// アイテムのスキップ
    async fn report_item_skipped(&self, item: &WorkItem, reason: &str);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// バッチ完了時の報告
    async fn report_completed(&self, summary: &ProcessingSummary);
}

#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize, worker_count: usize) {
        self.as_ref().report_started(total_items, worker_count).await
    }

    async fn report_item_started(&self, item: &WorkItem) {
        self.as_ref().report_item_started(item).await
    }

    async fn report_artifact_saved(&self, item: &WorkItem, path: &Path) {
        self.as_ref().report_artifact_saved(item, path).await
    }

    async fn report_item_skipped(&self, item: &WorkItem, reason: &str) {
        self.as_ref().report_item_skipped(item, reason).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_completed(&self, summary: &ProcessingSummary) {
        self.as_ref().report_completed(summary).await
    }
}
