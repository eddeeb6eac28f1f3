// 進捗監視機能
// バッチ開始、ダウンロード、保存、スキップ、完了の通知

pub mod implementations;

// 公開API
pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
