//! Square convolution kernels.

use super::FloatImage;
use crate::error::ImageError;

/// A square matrix of weights with odd side length.
///
/// Rows run along y and columns along x; the centre cell sits on the pixel
/// the kernel is applied at.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a `size` by `size` kernel from row-major `weights`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is even or zero, or `weights` is not `size * size`
    /// long.
    pub fn new(size: usize, weights: Vec<f32>) -> Self {
        assert!(
            size % 2 == 1,
            "kernel size must be odd and positive, got {}",
            size
        );
        assert_eq!(
            weights.len(),
            size * size,
            "a {}x{} kernel needs {} weights",
            size,
            size,
            size * size
        );
        Self { size, weights }
    }

    /// Kernel with every weight equal to `weight`.
    pub fn uniform(size: usize, weight: f32) -> Self {
        Self::new(size, vec![weight; size * size])
    }

    /// Kernel averaging a `size` by `size` block.
    pub fn box_average(size: usize) -> Self {
        Self::uniform(size, 1.0 / (size * size) as f32)
    }

    /// 1x1 kernel of weight 1.
    pub fn identity() -> Self {
        Self::new(1, vec![1.0])
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at kernel row `row`, column `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.size + col]
    }
}

impl FloatImage {
    /// Apply `kernel` centred at pixel `(x, y)` and return the sum of
    /// weights times pixels.
    ///
    /// Kernel cells falling outside the image read the mirror-image pixel
    /// inside it (see [`FloatImage::get_pixel_with_reflection`]).
    pub fn apply_kernel(
        &mut self,
        x: isize,
        y: isize,
        kernel: &Kernel,
    ) -> Result<f32, ImageError> {
        Ok(self.kernel_sum(x, y, kernel)? as f32)
    }

    /// [`FloatImage::apply_kernel`] accumulated in double precision.
    pub(crate) fn kernel_sum(
        &mut self,
        x: isize,
        y: isize,
        kernel: &Kernel,
    ) -> Result<f64, ImageError> {
        let half = (kernel.size() / 2) as isize;
        let mut sum = 0.0f64;

        for row in 0..kernel.size() {
            let py = y + row as isize - half;
            for col in 0..kernel.size() {
                let px = x + col as isize - half;
                let pixel = self.get_pixel_with_reflection(px, py)?;
                sum += kernel.get(row, col) as f64 * pixel as f64;
            }
        }

        Ok(sum)
    }
}
