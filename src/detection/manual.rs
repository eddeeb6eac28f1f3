use super::classifier::{classify_edges, EDGE_THRESHOLD};
use super::convolution::{convolve, SOBEL_X, SOBEL_Y};
use super::grayscale::to_luminance;
use super::ImageDetector;
use image::{DynamicImage, GrayImage};
use std::time::Instant;

/// 手書きの Sobel + しきい値処理による検出器
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualDetector;

impl ManualDetector {
    pub fn new() -> Self {
        Self
    }

    /// 二値エッジ画像を直接返す
    ///
    /// 輝度変換 → 水平/垂直 Sobel 畳み込み → 強度しきい値。
    pub fn edge_map(&self, image: &DynamicImage) -> GrayImage {
        let start_time = Instant::now();

        let luminance = to_luminance(image);
        let gx = convolve(&luminance, &SOBEL_X);
        let gy = convolve(&luminance, &SOBEL_Y);
        let edges = classify_edges(&gx, &gy, EDGE_THRESHOLD);

        log::debug!(
            "manual edge detection on {}x{} took {:?}",
            luminance.width(),
            luminance.height(),
            start_time.elapsed()
        );
        edges
    }
}

impl ImageDetector for ManualDetector {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn edge_detection(&self, image: &DynamicImage) -> DynamicImage {
        DynamicImage::ImageLuma8(self.edge_map(image))
    }

    // コーナー・円検出は未実装のため入力をそのまま返す
    fn corner_detection(&self, image: &DynamicImage) -> DynamicImage {
        image.clone()
    }

    fn circle_detection(&self, image: &DynamicImage) -> DynamicImage {
        image.clone()
    }
}
