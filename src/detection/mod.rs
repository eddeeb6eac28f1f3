// 検出器 - 手書き実装とライブラリ実装を同じ能力インターフェースで扱う

use image::DynamicImage;
use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod convolution;
pub mod grayscale;
pub mod library;
pub mod manual;

pub use classifier::{classify_edges, EDGE_THRESHOLD};
pub use convolution::{convolve, Kernel, Matrix, SOBEL_X, SOBEL_Y};
pub use grayscale::to_luminance;
pub use library::LibraryDetector;
pub use manual::ManualDetector;

/// 画像検出の能力インターフェース
///
/// 検出はCPUのみで完結するため同期APIとし、呼び出し側がブロッキング
/// プールで実行する。
pub trait ImageDetector: Send + Sync {
    /// 検出器の名前
    fn name(&self) -> &'static str;

    /// エッジ検出。入力と同じ寸法の画像を返す
    fn edge_detection(&self, image: &DynamicImage) -> DynamicImage;

    /// コーナー検出
    fn corner_detection(&self, image: &DynamicImage) -> DynamicImage;

    /// 円検出
    fn circle_detection(&self, image: &DynamicImage) -> DynamicImage;
}

/// 設定で選択する検出器の種類
///
/// 並び順は成果物の書き込み順（手書き → ライブラリ）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// 手書きの Sobel 実装
    Manual,
    /// imageproc による実装
    Library,
}

impl DetectorKind {
    /// 成果物ファイル名の接尾辞
    pub const fn artifact_suffix(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Library => "lib",
        }
    }
}

/// 設定から選ばれた検出器
///
/// 継承ではなく列挙型で2種類の実装を切り替える。
#[derive(Debug, Clone, Copy)]
pub enum AnyDetector {
    Manual(ManualDetector),
    Library(LibraryDetector),
}

impl AnyDetector {
    pub fn kind(&self) -> DetectorKind {
        match self {
            Self::Manual(_) => DetectorKind::Manual,
            Self::Library(_) => DetectorKind::Library,
        }
    }
}

impl From<DetectorKind> for AnyDetector {
    fn from(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::Manual => Self::Manual(ManualDetector::new()),
            DetectorKind::Library => Self::Library(LibraryDetector::new()),
        }
    }
}

impl ImageDetector for AnyDetector {
    fn name(&self) -> &'static str {
        match self {
            Self::Manual(d) => d.name(),
            Self::Library(d) => d.name(),
        }
    }

    fn edge_detection(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::Manual(d) => d.edge_detection(image),
            Self::Library(d) => d.edge_detection(image),
        }
    }

    fn corner_detection(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::Manual(d) => d.corner_detection(image),
            Self::Library(d) => d.corner_detection(image),
        }
    }

    fn circle_detection(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::Manual(d) => d.circle_detection(image),
            Self::Library(d) => d.circle_detection(image),
        }
    }
}
