// パイプラインで受け渡すデータ型定義

use crate::detection::DetectorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 画像ソースが返す1件分の記述子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(rename = "url")]
    pub source_url: String,
}

impl ImageDescriptor {
    pub fn new(identifier: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source_url: source_url.into(),
        }
    }
}

/// キューから取り出された作業単位
///
/// `worker_index` は成果物の命名にだけ使われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub descriptor: ImageDescriptor,
    pub worker_index: usize,
}

impl WorkItem {
    pub fn new(descriptor: ImageDescriptor, worker_index: usize) -> Self {
        Self {
            descriptor,
            worker_index,
        }
    }

    /// 成果物の保存先パスを組み立てる
    ///
    /// `{output_dir}/{worker_index}_{identifier}_{suffix}.{ext}` の形式。
    /// 識別子に含まれるパス区切り文字は `_` に置き換える。
    pub fn artifact_path(&self, output_dir: &Path, kind: ArtifactKind, format: OutputFormat) -> PathBuf {
        let identifier: String = self
            .descriptor
            .identifier
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();

        output_dir.join(format!(
            "{}_{}_{}.{}",
            self.worker_index,
            identifier,
            kind.suffix(),
            format.extension()
        ))
    }
}

/// 出力画像のエンコード形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub const fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// 1アイテムにつき書き出す成果物の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// ダウンロードした元画像
    Original,
    /// 検出器による処理結果
    Detection(DetectorKind),
}

impl ArtifactKind {
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Detection(kind) => kind.artifact_suffix(),
        }
    }
}

/// 1アイテムの処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Completed {
        identifier: String,
        worker_index: usize,
        artifacts_written: Vec<PathBuf>,
        artifact_failures: usize,
        processing_time_ms: u64,
    },
    Skipped {
        identifier: String,
        url: String,
        reason: String,
    },
}

impl ItemOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Completed { identifier, .. } | Self::Skipped { identifier, .. } => identifier,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// バッチ全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingSummary {
    pub total_items: usize,
    pub completed_items: usize,
    pub skipped_items: usize,
    pub cancelled_items: usize,
    pub artifacts_written: usize,
    pub artifact_failures: usize,
    pub worker_count: usize,
    pub started_at: DateTime<Utc>,
    pub total_processing_time_ms: u64,
    pub average_time_per_item_ms: f64,
}

impl ProcessingSummary {
    /// 各ワーカーの処理結果を集計する
    pub fn from_outcomes(
        total_items: usize,
        worker_count: usize,
        outcomes: &[ItemOutcome],
        started_at: DateTime<Utc>,
        total_processing_time_ms: u64,
    ) -> Self {
        let mut completed_items = 0;
        let mut skipped_items = 0;
        let mut artifacts_written = 0;
        let mut artifact_failures = 0;

        for outcome in outcomes {
            match outcome {
                ItemOutcome::Completed {
                    artifacts_written: written,
                    artifact_failures: failures,
                    ..
                } => {
                    completed_items += 1;
                    artifacts_written += written.len();
                    artifact_failures += failures;
                }
                ItemOutcome::Skipped { .. } => skipped_items += 1,
            }
        }

        let handled = completed_items + skipped_items;
        let average_time_per_item_ms = if handled > 0 {
            total_processing_time_ms as f64 / handled as f64
        } else {
            0.0
        };

        Self {
            total_items,
            completed_items,
            skipped_items,
            cancelled_items: total_items.saturating_sub(handled),
            artifacts_written,
            artifact_failures,
            worker_count,
            started_at,
            total_processing_time_ms,
            average_time_per_item_ms,
        }
    }
}
