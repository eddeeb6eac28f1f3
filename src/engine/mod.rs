// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせてバッチ処理を提供

pub mod consumer;
pub mod orchestrator;
pub mod processing_engine;
pub mod producer;

// 公開API - 主要エンジンクラス
pub use orchestrator::BatchOrchestrator;
pub use processing_engine::ProcessingEngine;
