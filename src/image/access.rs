//! Pixel, region and row accessors.

use super::FloatImage;
use crate::error::ImageError;

/// Map a possibly out-of-range index into `0..size` by odd reflection.
///
/// Reflection is about the centre of the edge pixels, so the edge pixel is
/// not duplicated: `-1` maps to `1` and `size` maps to `size - 2`. Indices
/// further out keep folding back and forth across the image.
#[inline]
pub(crate) fn reflect_index(index: isize, size: usize) -> usize {
    let size = size as isize;
    if (0..size).contains(&index) {
        return index as usize;
    }
    if size == 1 {
        return 0;
    }

    let period = 2 * (size - 1);
    let folded = index.rem_euclid(period);
    if folded >= size {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

impl FloatImage {
    #[inline]
    fn assert_in_bounds(&self, x: usize, y: usize) {
        assert!(
            x < self.size_x && y < self.size_y,
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            self.size_x,
            self.size_y
        );
    }

    fn assert_region_in_bounds(&self, x: usize, y: usize, size_x: usize, size_y: usize) {
        assert!(
            x + size_x <= self.size_x && y + size_y <= self.size_y,
            "region {}x{} at ({}, {}) outside {}x{} image",
            size_x,
            size_y,
            x,
            y,
            self.size_x,
            self.size_y
        );
    }

    /// Get the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn get_pixel(&mut self, x: usize, y: usize) -> Result<f32, ImageError> {
        self.assert_in_bounds(x, y);
        let location = self.geometry.locate(x, y);
        let tile = self.cache.tile(location.tile_index)?;
        Ok(tile[location.offset(self.geometry.tile_size())])
    }

    /// Set the pixel at `(x, y)` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, value: f32) -> Result<(), ImageError> {
        self.assert_in_bounds(x, y);
        let location = self.geometry.locate(x, y);
        let tile = self.cache.tile_mut(location.tile_index)?;
        tile[location.offset(self.geometry.tile_size())] = value;
        Ok(())
    }

    /// Get the pixel at `(x, y)`, reflecting indices that fall outside the
    /// image back into it.
    ///
    /// This is the edge rule used by [`FloatImage::apply_kernel`] and by the
    /// bicubic and sinc samplers.
    #[inline]
    pub fn get_pixel_with_reflection(&mut self, x: isize, y: isize) -> Result<f32, ImageError> {
        let x = reflect_index(x, self.size_x);
        let y = reflect_index(y, self.size_y);
        self.get_pixel(x, y)
    }

    /// Copy the `size_x` by `size_y` region with upper left corner `(x, y)`
    /// into `buffer`, row-major.
    ///
    /// # Panics
    ///
    /// Panics if the region is not inside the image or `buffer` is too small.
    pub fn get_region(
        &mut self,
        x: usize,
        y: usize,
        size_x: usize,
        size_y: usize,
        buffer: &mut [f32],
    ) -> Result<(), ImageError> {
        self.assert_region_in_bounds(x, y, size_x, size_y);
        assert!(buffer.len() >= size_x * size_y, "region buffer too small");

        let tile_size = self.geometry.tile_size();
        for row in 0..size_y {
            let mut dst = row * size_x;
            let mut col = x;
            while col < x + size_x {
                let location = self.geometry.locate(col, y + row);
                let run = (tile_size - location.local_x).min(x + size_x - col);
                let src = location.offset(tile_size);

                let tile = self.cache.tile(location.tile_index)?;
                buffer[dst..dst + run].copy_from_slice(&tile[src..src + run]);

                dst += run;
                col += run;
            }
        }
        Ok(())
    }

    /// Write `buffer` into the `size_x` by `size_y` region with upper left
    /// corner `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the region is not inside the image or `buffer` is too small.
    pub fn set_region(
        &mut self,
        x: usize,
        y: usize,
        size_x: usize,
        size_y: usize,
        buffer: &[f32],
    ) -> Result<(), ImageError> {
        self.assert_region_in_bounds(x, y, size_x, size_y);
        assert!(buffer.len() >= size_x * size_y, "region buffer too small");

        let tile_size = self.geometry.tile_size();
        for row in 0..size_y {
            let mut src = row * size_x;
            let mut col = x;
            while col < x + size_x {
                let location = self.geometry.locate(col, y + row);
                let run = (tile_size - location.local_x).min(x + size_x - col);
                let dst = location.offset(tile_size);

                let tile = self.cache.tile_mut(location.tile_index)?;
                tile[dst..dst + run].copy_from_slice(&buffer[src..src + run]);

                src += run;
                col += run;
            }
        }
        Ok(())
    }

    /// Copy row `row` into `buffer`.
    ///
    /// Consecutive calls with increasing row numbers mostly hit tiles that
    /// are already resident.
    pub fn get_row(&mut self, row: usize, buffer: &mut [f32]) -> Result<(), ImageError> {
        let size_x = self.size_x;
        self.get_region(0, row, size_x, 1, buffer)
    }
}
