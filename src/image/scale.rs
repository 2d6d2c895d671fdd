//! Reduced-resolution construction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use super::kernel::Kernel;
use super::FloatImage;
use crate::error::ImageError;
use crate::io::{ByteOrder, RawFloatReader};
use crate::tile::DEFAULT_CACHE_SPACE;

impl FloatImage {
    /// Form a reduced-resolution copy of `model` by averaging
    /// `factor` by `factor` blocks of pixels.
    ///
    /// The new image is `ceil(size_x / factor)` by `ceil(size_y / factor)`.
    /// Output pixel `(ox, oy)` averages the block centred on model pixel
    /// `(ox * factor + factor / 2, oy * factor + factor / 2)`; blocks hanging
    /// over the right or bottom edge read reflected pixels. The copy uses the
    /// model's cache budget.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is even or zero.
    pub fn new_from_model_scaled(
        model: &mut FloatImage,
        factor: usize,
    ) -> Result<Self, ImageError> {
        assert!(
            factor % 2 == 1,
            "scale factor must be odd and positive, got {}",
            factor
        );

        let size_x = model.size_x.div_ceil(factor);
        let size_y = model.size_y.div_ceil(factor);
        let kernel = Kernel::uniform(factor, 1.0);
        let block_area = (factor * factor) as f64;
        let half = factor / 2;

        debug!(
            model_x = model.size_x,
            model_y = model.size_y,
            factor,
            size_x,
            size_y,
            "Scaling image by block averaging"
        );

        let cache_space = model.cache_space();
        Self::from_rows_with_cache_space(size_x, size_y, cache_space, |oy, row| {
            let cy = (oy * factor + half) as isize;
            for (ox, value) in row.iter_mut().enumerate() {
                let cx = (ox * factor + half) as isize;
                *value = (model.kernel_sum(cx, cy, &kernel)? / block_area) as f32;
            }
            Ok(())
        })
    }

    /// Form a `size_x` by `size_y` thumbnail of the `original_size_x` by
    /// `original_size_y` raw float raster at byte `offset` of `path`.
    ///
    /// Pixels are sampled bilinearly with the corners of the thumbnail on the
    /// corners of the original. Only the source rows a thumbnail row needs
    /// are read, so this is much faster than loading the original and
    /// scaling it, at the price of aliasing.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn new_from_file_scaled(
        size_x: usize,
        size_y: usize,
        original_size_x: usize,
        original_size_y: usize,
        path: impl AsRef<Path>,
        offset: u64,
        byte_order: ByteOrder,
    ) -> Result<Self, ImageError> {
        assert!(
            original_size_x > 0 && original_size_y > 0,
            "original dimensions must be positive, got {}x{}",
            original_size_x,
            original_size_y
        );

        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ImageError::io(format!("opening {}", path.display()), e))?;
        let reader = RawFloatReader::new(
            BufReader::new(file),
            original_size_x,
            byte_order,
            path.display().to_string(),
        );
        let mut rows = RowPair::new(reader, offset, original_size_x);

        let step_x = sample_step(original_size_x, size_x);
        let step_y = sample_step(original_size_y, size_y);

        debug!(
            original_size_x,
            original_size_y,
            size_x,
            size_y,
            path = %path.display(),
            "Sampling thumbnail from file"
        );

        Self::from_rows_with_cache_space(size_x, size_y, DEFAULT_CACHE_SPACE, |y, row| {
            let (iy, fy) = split_coordinate(y as f64 * step_y, original_size_y);
            let iy1 = (iy + 1).min(original_size_y - 1);
            let (upper, lower) = rows.fetch(iy, iy1)?;

            for (x, value) in row.iter_mut().enumerate() {
                let (ix, fx) = split_coordinate(x as f64 * step_x, original_size_x);
                let ix1 = (ix + 1).min(original_size_x - 1);

                let f00 = upper[ix] as f64;
                let f10 = upper[ix1] as f64;
                let f01 = lower[ix] as f64;
                let f11 = lower[ix1] as f64;

                let top = f00 + (f10 - f00) * fx;
                let bottom = f01 + (f11 - f01) * fx;
                *value = (top + (bottom - top) * fy) as f32;
            }
            Ok(())
        })
    }
}

/// Distance in source pixels between consecutive output pixels.
fn sample_step(original: usize, size: usize) -> f64 {
    if size > 1 {
        (original - 1) as f64 / (size - 1) as f64
    } else {
        0.0
    }
}

/// Split a source coordinate into a pixel index and a fraction, keeping the
/// index inside `0..size`.
fn split_coordinate(coordinate: f64, size: usize) -> (usize, f64) {
    let index = (coordinate.floor() as usize).min(size - 1);
    let fraction = (coordinate - index as f64).clamp(0.0, 1.0);
    (index, fraction)
}

/// The two most recently read source rows.
struct RowPair<R> {
    reader: RawFloatReader<R>,
    offset: u64,
    rows: [(Option<usize>, Vec<f32>); 2],
}

impl<R: std::io::Read + std::io::Seek> RowPair<R> {
    fn new(reader: RawFloatReader<R>, offset: u64, size_x: usize) -> Self {
        Self {
            reader,
            offset,
            rows: [(None, vec![0.0; size_x]), (None, vec![0.0; size_x])],
        }
    }

    /// Rows `upper` and `lower`, reading only those not already held.
    fn fetch(&mut self, upper: usize, lower: usize) -> Result<(&[f32], &[f32]), ImageError> {
        // Moving down one row turns the old lower row into the new upper one
        if self.rows[0].0 != Some(upper) && self.rows[1].0 == Some(upper) {
            self.rows.swap(0, 1);
        }
        if self.rows[0].0 != Some(upper) {
            self.load(0, upper)?;
        }
        if self.rows[1].0 != Some(lower) {
            self.load(1, lower)?;
        }
        Ok((&self.rows[0].1, &self.rows[1].1))
    }

    fn load(&mut self, slot: usize, index: usize) -> Result<(), ImageError> {
        // Mark the slot empty until the read succeeds
        self.rows[slot].0 = None;
        self.reader.seek_to_row(self.offset, index)?;
        self.reader.read_row(&mut self.rows[slot].1)?;
        self.rows[slot].0 = Some(index);
        Ok(())
    }
}
