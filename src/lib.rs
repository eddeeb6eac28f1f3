// 画像エッジ検出バッチパイプライン
//
// レイヤー構成:
// - core: トレイト・型・エラー
// - detection: グレースケール変換、畳み込み、エッジ判定、検出器
// - image_source / fetcher / codec / storage: 外部とのI/O境界
// - services: 設定、進捗報告、1アイテムの処理
// - engine: ワーカープールとバッチ処理エンジン
// - cli: コマンドライン

pub mod cli;
pub mod codec;
pub mod core;
pub mod detection;
pub mod engine;
pub mod fetcher;
pub mod image_source;
pub mod services;
pub mod storage;

pub use crate::core::{ProcessingError, ProcessingResult, ProcessingSummary};
pub use engine::{BatchOrchestrator, ProcessingEngine};
