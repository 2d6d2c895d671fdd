//! Sampling at real-valued coordinates.

use super::sinc::SincTable;
use super::FloatImage;
use crate::error::ImageError;

/// How nearby pixels are combined to estimate the value at a point that
/// falls between pixel centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleMethod {
    /// Nearest pixel
    NearestNeighbor,
    /// Linearly weighted average of the four surrounding pixels
    Bilinear,
    /// Catmull-Rom cubic spline over the surrounding 16 pixels
    Bicubic,
    /// Windowed sinc over a square neighbourhood, using the shared table
    Sinc,
}

/// Catmull-Rom weights for the pixels at offsets -1, 0, 1, 2 from the pixel
/// left of a sample `t` of the way to the next one.
#[inline]
fn cubic_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

impl FloatImage {
    /// Estimate the image value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// For [`SampleMethod::NearestNeighbor`], panics if the nearest pixel is
    /// outside the image. For the other methods, panics unless
    /// `0 <= x <= size_x - 1` and `0 <= y <= size_y - 1`.
    pub fn sample(&mut self, x: f32, y: f32, method: SampleMethod) -> Result<f32, ImageError> {
        match method {
            SampleMethod::NearestNeighbor => self.sample_nearest(x, y),
            SampleMethod::Bilinear => self.sample_bilinear(x, y),
            SampleMethod::Bicubic => self.sample_bicubic(x, y),
            SampleMethod::Sinc => self.sample_sinc(x, y, SincTable::shared()),
        }
    }

    /// Windowed-sinc interpolation at `(x, y)` with an explicit kernel table.
    ///
    /// `table.points()` taps are used in each dimension; taps falling outside
    /// the image are reflected back into it.
    pub fn sample_sinc(&mut self, x: f32, y: f32, table: &SincTable) -> Result<f32, ImageError> {
        self.assert_in_sample_domain(x, y);

        let ix = x.floor();
        let iy = y.floor();
        let x_kernel = table.kernel(x - ix);
        let y_kernel = table.kernel(y - iy);

        let half = (table.points() / 2) as isize;
        let x_start = ix as isize + 1 - half;
        let y_start = iy as isize + 1 - half;

        let mut value = 0.0f64;
        for (j, &wy) in y_kernel.iter().enumerate() {
            let py = y_start + j as isize;
            let mut row_sum = 0.0f64;
            for (i, &wx) in x_kernel.iter().enumerate() {
                let px = x_start + i as isize;
                row_sum += wx as f64 * self.get_pixel_with_reflection(px, py)? as f64;
            }
            value += wy as f64 * row_sum;
        }

        Ok(value as f32)
    }

    fn assert_in_sample_domain(&self, x: f32, y: f32) {
        assert!(
            x >= 0.0
                && y >= 0.0
                && x <= (self.size_x - 1) as f32
                && y <= (self.size_y - 1) as f32,
            "sample point ({}, {}) outside [0, {}] x [0, {}]",
            x,
            y,
            self.size_x - 1,
            self.size_y - 1
        );
    }

    fn sample_nearest(&mut self, x: f32, y: f32) -> Result<f32, ImageError> {
        let ix = (x + 0.5).floor();
        let iy = (y + 0.5).floor();
        assert!(
            ix >= 0.0
                && iy >= 0.0
                && (ix as usize) < self.size_x
                && (iy as usize) < self.size_y,
            "nearest pixel to ({}, {}) outside {}x{} image",
            x,
            y,
            self.size_x,
            self.size_y
        );
        self.get_pixel(ix as usize, iy as usize)
    }

    fn sample_bilinear(&mut self, x: f32, y: f32) -> Result<f32, ImageError> {
        self.assert_in_sample_domain(x, y);

        let ix = x.floor() as usize;
        let iy = y.floor() as usize;
        let fx = x - ix as f32;
        let fy = y - iy as f32;

        // On the right or bottom edge the fraction is zero, so the clamped
        // neighbour carries no weight.
        let x1 = (ix + 1).min(self.size_x - 1);
        let y1 = (iy + 1).min(self.size_y - 1);

        let f00 = self.get_pixel(ix, iy)?;
        let f10 = self.get_pixel(x1, iy)?;
        let f01 = self.get_pixel(ix, y1)?;
        let f11 = self.get_pixel(x1, y1)?;

        let a00 = f00;
        let a10 = f10 - f00;
        let a01 = f01 - f00;
        let a11 = f00 - f10 - f01 + f11;

        Ok(a00 + a10 * fx + a01 * fy + a11 * fx * fy)
    }

    fn sample_bicubic(&mut self, x: f32, y: f32) -> Result<f32, ImageError> {
        self.assert_in_sample_domain(x, y);

        let ix = x.floor();
        let iy = y.floor();
        let wx = cubic_weights((x - ix) as f64);
        let wy = cubic_weights((y - iy) as f64);
        let (ix, iy) = (ix as isize, iy as isize);

        let mut value = 0.0f64;
        for (j, weight_y) in wy.iter().enumerate() {
            let py = iy + j as isize - 1;
            let mut row_sum = 0.0f64;
            for (i, weight_x) in wx.iter().enumerate() {
                let px = ix + i as isize - 1;
                row_sum += weight_x * self.get_pixel_with_reflection(px, py)? as f64;
            }
            value += weight_y * row_sum;
        }

        Ok(value as f32)
    }
}
