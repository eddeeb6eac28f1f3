// エッジ検出パイプライン用のエラー型定義
// バッチ全体・アイテム単位・成果物単位の3段階で失敗を分類する

use thiserror::Error;

/// パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("画像ソース取得エラー: {source}")]
    SourceRequestError {
        #[source]
        source: anyhow::Error,
    },

    #[error("画像ダウンロードエラー: {url} - {source}")]
    FetchError {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("画像デコードエラー: {identifier} - {source}")]
    DecodeError {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("成果物書き込みエラー: {path} - {source}")]
    ArtifactWriteError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("検出エラー: {detector} - {source}")]
    DetectionError {
        detector: String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("状態遷移エラー: {expected:?} が必要ですが現在は {actual:?} です")]
    InvalidStateError {
        expected: OrchestratorState,
        actual: OrchestratorState,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ProcessingError {
    /// 画像ソース取得エラーの作成
    pub fn source_request(source: anyhow::Error) -> Self {
        Self::SourceRequestError { source }
    }

    /// ダウンロードエラーの作成
    pub fn fetch(url: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FetchError {
            url: url.into(),
            source,
        }
    }

    /// デコードエラーの作成
    pub fn decode(identifier: impl Into<String>, source: anyhow::Error) -> Self {
        Self::DecodeError {
            identifier: identifier.into(),
            source,
        }
    }

    /// 成果物書き込みエラーの作成
    pub fn artifact_write(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ArtifactWriteError {
            path: path.into(),
            source,
        }
    }

    /// 検出エラーの作成（ブロッキングプール上の検出タスクの失敗）
    pub fn detection(detector: impl Into<String>, source: tokio::task::JoinError) -> Self {
        Self::DetectionError {
            detector: detector.into(),
            source,
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 状態遷移エラーの作成
    pub fn invalid_state(expected: OrchestratorState, actual: OrchestratorState) -> Self {
        Self::InvalidStateError { expected, actual }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// エラーの影響範囲を取得
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceRequestError { .. }
            | Self::ConfigurationError { .. }
            | Self::InvalidStateError { .. }
            | Self::TaskError { .. } => ErrorCategory::BatchFatal,
            Self::FetchError { .. } | Self::DecodeError { .. } => ErrorCategory::ItemSkipped,
            Self::ArtifactWriteError { .. } | Self::DetectionError { .. } => {
                ErrorCategory::ArtifactWriteFailed
            }
        }
    }

    /// バッチを継続できるかどうか
    pub fn is_recoverable(&self) -> bool {
        self.category() != ErrorCategory::BatchFatal
    }
}

/// エラーの影響範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// 単一成果物のみ失敗。同じアイテムの他の成果物は書き込まれる
    ArtifactWriteFailed,
    /// 単一アイテムをスキップ
    ItemSkipped,
    /// バッチ全体を中断
    BatchFatal,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ArtifactWriteFailed => "ARTIFACT_WRITE_FAILED",
            Self::ItemSkipped => "ITEM_SKIPPED",
            Self::BatchFatal => "BATCH_FATAL",
        }
    }
}

/// オーケストレーターの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Dispatching,
    Draining,
    Complete,
}

/// HTTP取得時のステータス異常
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected HTTP status {status} for {url}")]
pub struct HttpStatusError {
    pub url: String,
    pub status: u16,
}

/// パイプラインの結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;
