// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、エンジン層から組み合わせて使う

pub mod config;
pub mod monitoring;
pub mod processing;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{validate_config, DefaultProcessingConfig};
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use processing::ItemProcessor;
