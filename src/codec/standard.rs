use super::{ImageCodec, LoadResult};
use crate::core::types::OutputFormat;
use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use std::io::Cursor;
use std::time::Instant;

/// image クレートによる標準コーデック
#[derive(Clone, Debug, Default)]
pub struct StandardImageCodec;

impl StandardImageCodec {
    pub fn new() -> Self {
        Self
    }

    /// JPEG はアルファや16ビットを扱えないため 8ビット RGB/グレーに落とす
    fn prepare_for(image: DynamicImage, format: OutputFormat) -> DynamicImage {
        match format {
            OutputFormat::Png => image,
            OutputFormat::Jpeg => match image {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
                ref other if other.color().has_color() => DynamicImage::ImageRgb8(other.to_rgb8()),
                ref other => DynamicImage::ImageLuma8(other.to_luma8()),
            },
        }
    }
}

#[async_trait]
impl ImageCodec for StandardImageCodec {
    async fn load_from_bytes(&self, data: &[u8]) -> Result<LoadResult> {
        let start_time = Instant::now();

        let image = tokio::task::spawn_blocking({
            let data = data.to_vec();
            move || image::load_from_memory(&data)
        })
        .await
        .context("Failed to spawn blocking task for image decoding")?
        .context("Failed to decode image from memory")?;

        Ok(LoadResult {
            dimensions: (image.width(), image.height()),
            image,
            decode_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn encode(&self, image: DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let image = Self::prepare_for(image, format);
            let mut buffer = Cursor::new(Vec::new());
            image
                .write_to(&mut buffer, format.image_format())
                .with_context(|| format!("Failed to encode image as {format:?}"))?;
            Ok(buffer.into_inner())
        })
        .await
        .context("Failed to spawn blocking task for image encoding")?
    }

    fn codec_name(&self) -> &'static str {
        "image"
    }
}
