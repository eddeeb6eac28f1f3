use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;
use mockall::automock;

use crate::core::types::OutputFormat;

pub mod standard;

/// 画像デコードの結果情報
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// デコードされた画像
    pub image: DynamicImage,
    /// 画像サイズ
    pub dimensions: (u32, u32),
    /// デコードにかかった時間（ミリ秒）
    pub decode_time_ms: u64,
}

/// 画像コーデックのトレイト
///
/// デコードとエンコードはどちらもCPU処理なので、実装はブロッキング
/// プールで実行する。
#[automock]
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// バイト配列から画像をデコードする
    async fn load_from_bytes(&self, data: &[u8]) -> Result<LoadResult>;

    /// 画像を指定形式でエンコードする
    async fn encode(&self, image: DynamicImage, format: OutputFormat) -> Result<Vec<u8>>;

    /// コーデックの名前を取得
    fn codec_name(&self) -> &'static str;
}

#[async_trait]
impl ImageCodec for Box<dyn ImageCodec> {
    async fn load_from_bytes(&self, data: &[u8]) -> Result<LoadResult> {
        self.as_ref().load_from_bytes(data).await
    }

    async fn encode(&self, image: DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        self.as_ref().encode(image, format).await
    }

    fn codec_name(&self) -> &'static str {
        self.as_ref().codec_name()
    }
}
