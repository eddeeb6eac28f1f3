// 進捗監視の具象実装

use crate::core::{ProcessingSummary, ProgressReporter, WorkItem};
use async_trait::async_trait;
use std::path::Path;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: usize, worker_count: usize) {
        if !self.quiet {
            println!("📥 Received {total_items} image links, starting {worker_count} workers...");
        }
    }

    async fn report_item_started(&self, item: &WorkItem) {
        if !self.quiet {
            println!(
                "⬇️  [worker {}] Downloading {}",
                item.worker_index, item.descriptor.source_url
            );
        }
    }

    async fn report_artifact_saved(&self, item: &WorkItem, path: &Path) {
        if !self.quiet {
            println!("💾 [worker {}] Saved {}", item.worker_index, path.display());
        }
    }

    async fn report_item_skipped(&self, item: &WorkItem, reason: &str) {
        if !self.quiet {
            eprintln!("❌ Skipped {}: {reason}", item.descriptor.identifier);
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % 100 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_completed(&self, summary: &ProcessingSummary) {
        if !self.quiet {
            println!(
                "✅ All tasks done! Completed: {}, Skipped: {}, Cancelled: {}, Artifacts: {} ({} failed)",
                summary.completed_items,
                summary.skipped_items,
                summary.cancelled_items,
                summary.artifacts_written,
                summary.artifact_failures
            );
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: usize, _worker_count: usize) {
        // 何もしない
    }

    async fn report_item_started(&self, _item: &WorkItem) {
        // 何もしない
    }

    async fn report_artifact_saved(&self, _item: &WorkItem, _path: &Path) {
        // 何もしない
    }

    async fn report_item_skipped(&self, _item: &WorkItem, _reason: &str) {
        // 何もしない
    }

    async fn report_progress(&self, _completed: usize, _total: usize) {
        // 何もしない
    }

    async fn report_completed(&self, _summary: &ProcessingSummary) {
        // 何もしない
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageDescriptor;
    use chrono::Utc;

    fn sample_summary() -> ProcessingSummary {
        ProcessingSummary::from_outcomes(0, 1, &[], Utc::now(), 0)
    }

    #[tokio::test]
    async fn test_console_reporter_all_events() {
        let reporter = ConsoleProgressReporter::new();
        assert!(!reporter.is_quiet());

        let item = WorkItem::new(ImageDescriptor::new("abc", "https://cdn.example.com/abc.jpg"), 1);
        reporter.report_started(1, 1).await;
        reporter.report_item_started(&item).await;
        reporter
            .report_artifact_saved(&item, Path::new("results/1_abc_original.png"))
            .await;
        reporter.report_item_skipped(&item, "status 404").await;
        reporter.report_progress(1, 1).await;
        reporter.report_progress(0, 0).await;
        reporter.report_completed(&sample_summary()).await;
    }

    #[tokio::test]
    async fn test_quiet_reporter() {
        let reporter = ConsoleProgressReporter::quiet();
        assert!(reporter.is_quiet());

        reporter.report_started(10, 2).await;
        reporter.report_progress(5, 10).await;
        reporter.report_completed(&sample_summary()).await;
    }

    #[tokio::test]
    async fn test_noop_reporter() {
        let reporter = NoOpProgressReporter::new();
        let item = WorkItem::new(ImageDescriptor::new("abc", "https://cdn.example.com/abc.jpg"), 0);

        reporter.report_started(1, 1).await;
        reporter.report_item_started(&item).await;
        reporter.report_item_skipped(&item, "error").await;
        reporter.report_completed(&sample_summary()).await;
    }
}
