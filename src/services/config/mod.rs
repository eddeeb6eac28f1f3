// 設定管理機能
// 並列数・バッチサイズ・出力先・検出器の選択

pub mod implementations;

// 公開API
pub use implementations::{validate_config, DefaultProcessingConfig};
