// 画像処理機能
// 単一画像のダウンロード、デコード、エッジ検出、成果物の保存

pub mod worker;

// 公開API
pub use worker::ItemProcessor;
