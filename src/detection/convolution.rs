//! 2次元畳み込みエンジン
//!
//! 境界は端の値を複製する（インデックスを `[0, dim-1]` に飽和させる）。
//! ゼロ埋めや折り返しは行わない。

use anyhow::{ensure, Result};
use rayon::prelude::*;

/// 行優先の `f32` 行列
///
/// 輝度行列と勾配場の両方に使う。
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// ゼロで埋めた行列を作成
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// 行優先のデータから行列を作成
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        ensure!(
            data.len() == width * height,
            "matrix data length {} does not match {}x{}",
            data.len(),
            width,
            height
        );
        Ok(Self { width, height, data })
    }

    /// すべてのセルが同じ値の行列を作成
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// (行, 列) の値
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }
}

/// 奇数サイズの畳み込みカーネル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel<'a> {
    width: usize,
    height: usize,
    weights: &'a [f32],
}

/// 水平方向 Sobel カーネル
pub const SOBEL_X: Kernel<'static> = Kernel {
    width: 3,
    height: 3,
    weights: &[-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
};

/// 垂直方向 Sobel カーネル
pub const SOBEL_Y: Kernel<'static> = Kernel {
    width: 3,
    height: 3,
    weights: &[-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
};

impl<'a> Kernel<'a> {
    /// カーネルを作成
    ///
    /// 中心が一意に決まるよう、幅と高さは奇数でなければならない。
    pub fn new(width: usize, height: usize, weights: &'a [f32]) -> Result<Self> {
        ensure!(
            width % 2 == 1 && height % 2 == 1,
            "kernel dimensions must be odd, got {width}x{height}"
        );
        ensure!(
            weights.len() == width * height,
            "kernel weight count {} does not match {}x{}",
            weights.len(),
            width,
            height
        );
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.width + col]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// 行列にカーネルを畳み込む
///
/// 出力は入力と同じ形状。各出力行は読み取り専用の入力とカーネルにしか
/// 依存しないため、行単位で rayon に分配する。
pub fn convolve(input: &Matrix, kernel: &Kernel<'_>) -> Matrix {
    let (width, height) = input.dimensions();
    let mut output = Matrix::zeros(width, height);

    if input.is_empty() {
        return output;
    }

    let pad_h = kernel.height() / 2;
    let pad_w = kernel.width() / 2;

    output
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, out_row)| {
            for (j, out) in out_row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for ki in 0..kernel.height() {
                    let ii = clamp_index(i + ki, pad_h, height);
                    let in_row = input.row(ii);
                    for kj in 0..kernel.width() {
                        let jj = clamp_index(j + kj, pad_w, width);
                        sum += in_row[jj] * kernel.weight(ki, kj);
                    }
                }
                *out = sum;
            }
        });

    output
}

/// `shifted - pad` を `[0, len-1]` に飽和させる
#[inline]
fn clamp_index(shifted: usize, pad: usize, len: usize) -> usize {
    shifted.saturating_sub(pad).min(len - 1)
}
