//! Whole-image statistics.

use super::FloatImage;
use crate::error::ImageError;

/// Minimum, maximum, mean and population standard deviation of every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub standard_deviation: f32,
}

/// Mean and population standard deviation of a subsample of pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateStatistics {
    pub mean: f32,
    pub standard_deviation: f32,
}

impl FloatImage {
    /// Compute exact statistics in one pass over every pixel.
    ///
    /// Every tile of the image is paged through memory, so this is slow for
    /// large images.
    pub fn statistics(&mut self) -> Result<Statistics, ImageError> {
        let mut row = vec![0.0f32; self.size_x];
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        // Welford's running mean and sum of squared deviations
        let mut count = 0u64;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;

        for y in 0..self.size_y {
            self.get_row(y, &mut row)?;
            for &value in &row {
                min = min.min(value);
                max = max.max(value);

                count += 1;
                let value = value as f64;
                let delta = value - mean;
                mean += delta / count as f64;
                m2 += delta * (value - mean);
            }
        }

        Ok(Statistics {
            min,
            max,
            mean: mean as f32,
            standard_deviation: (m2 / count as f64).sqrt() as f32,
        })
    }

    /// Estimate the mean and standard deviation from every `stride`-th pixel
    /// in each dimension.
    ///
    /// The sampled pixels are gathered in memory first, so small strides on
    /// large images use a lot of memory.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is zero.
    pub fn approximate_statistics(
        &mut self,
        stride: usize,
    ) -> Result<ApproximateStatistics, ImageError> {
        assert!(stride > 0, "statistics stride must be positive");

        let mut samples =
            Vec::with_capacity(self.size_x.div_ceil(stride) * self.size_y.div_ceil(stride));
        for y in (0..self.size_y).step_by(stride) {
            for x in (0..self.size_x).step_by(stride) {
                samples.push(self.get_pixel(x, y)? as f64);
            }
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;

        Ok(ApproximateStatistics {
            mean: mean as f32,
            standard_deviation: variance.sqrt() as f32,
        })
    }
}
