// 輝度変換 - カラー画像を 0〜255 スケールの f32 行列へ

use super::convolution::Matrix;
use image::DynamicImage;

/// ITU-R BT.601 の輝度係数
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// 画像を輝度行列に変換する
///
/// チャンネル値は16ビットに揃えてから 257 で割り、小数部は切り捨てる。
/// 8ビット画像はそのままの値になる。アルファは無視する。
pub fn to_luminance(image: &DynamicImage) -> Matrix {
    let rgb = image.to_rgb16();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let mut matrix = Matrix::zeros(width, height);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0.map(|channel| (channel / 257) as f32);
        let value = LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b;
        matrix.set(y as usize, x as usize, value);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_primary_colors_use_luma_weights() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));

        let matrix = to_luminance(&DynamicImage::ImageRgb8(img));

        assert!((matrix.get(0, 0) - 76.245).abs() < 1e-3);
        assert!((matrix.get(0, 1) - 149.685).abs() < 1e-3);
        assert!((matrix.get(0, 2) - 29.07).abs() < 1e-3);
    }

    #[test]
    fn test_dimensions_match_source() {
        let img = RgbImage::new(5, 3);
        let matrix = to_luminance(&DynamicImage::ImageRgb8(img));

        assert_eq!(matrix.dimensions(), (5, 3));
    }

    #[test]
    fn test_gray_pixel_keeps_its_value() {
        let img = RgbImage::from_pixel(2, 2, Rgb([128, 128, 128]));
        let matrix = to_luminance(&DynamicImage::ImageRgb8(img));

        for &v in matrix.as_slice() {
            assert!((v - 128.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = RgbaImage::from_pixel(1, 1, Rgba([10, 200, 30, 255]));
        let transparent = RgbaImage::from_pixel(1, 1, Rgba([10, 200, 30, 0]));

        assert_eq!(
            to_luminance(&DynamicImage::ImageRgba8(opaque)),
            to_luminance(&DynamicImage::ImageRgba8(transparent))
        );
    }

    #[test]
    fn test_sixteen_bit_input_is_normalised() {
        let img = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(1, 1, Rgb([65535, 65535, 65535]));
        let matrix = to_luminance(&DynamicImage::ImageRgb16(img));

        assert!((matrix.get(0, 0) - 255.0).abs() < 1e-2);
    }

    #[test]
    fn test_sixteen_bit_channels_are_truncated() {
        // 25900 / 257 = 100.77... は 100 になる
        let img = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(1, 1, Rgb([25900, 25900, 25900]));
        let matrix = to_luminance(&DynamicImage::ImageRgb16(img));

        assert!((matrix.get(0, 0) - 100.0).abs() < 1e-3);
    }
}
