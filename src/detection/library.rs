use super::ImageDetector;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::gradients::sobel_gradients;

/// imageproc の Sobel 勾配に委譲する比較用検出器
///
/// 勾配強度を 0〜255 に飽和させたグレースケール画像を返す。
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryDetector;

impl LibraryDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDetector for LibraryDetector {
    fn name(&self) -> &'static str {
        "library"
    }

    fn edge_detection(&self, image: &DynamicImage) -> DynamicImage {
        let gray = image.to_luma8();
        let gradients = sobel_gradients(&gray);

        let edges = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let magnitude = gradients.get_pixel(x, y)[0];
            Luma([magnitude.min(u8::MAX as u16) as u8])
        });
        DynamicImage::ImageLuma8(edges)
    }

    fn corner_detection(&self, image: &DynamicImage) -> DynamicImage {
        image.clone()
    }

    fn circle_detection(&self, image: &DynamicImage) -> DynamicImage {
        image.clone()
    }
}
