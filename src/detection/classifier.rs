// エッジ分類 - 2方向の勾配場から二値エッジ画像を作る

use super::convolution::Matrix;
use image::{GrayImage, Luma};

/// 勾配強度のしきい値（0〜255 の輝度スケール）
pub const EDGE_THRESHOLD: f64 = 99.0;

pub const EDGE: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// `sqrt(gx² + gy²) >= threshold` のセルを 255、それ以外を 0 にする
///
/// 強度は f64 で計算する。2つの勾配場の形状は必ず一致していること。
pub fn classify_edges(gx: &Matrix, gy: &Matrix, threshold: f64) -> GrayImage {
    assert_eq!(
        gx.dimensions(),
        gy.dimensions(),
        "gradient fields must share dimensions"
    );

    let (width, height) = gx.dimensions();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        let (gx, gy) = (gx.get(row, col) as f64, gy.get(row, col) as f64);
        if (gx * gx + gy * gy).sqrt() >= threshold {
            Luma([EDGE])
        } else {
            Luma([BACKGROUND])
        }
    })
}
