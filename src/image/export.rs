//! Raw float and JPEG output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, Luma};
use tracing::debug;

use super::FloatImage;
use crate::error::ImageError;
use crate::io::{ByteOrder, RawFloatWriter};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Largest side length a baseline JPEG can hold.
const MAX_JPEG_DIMENSION: usize = 65_535;

impl FloatImage {
    /// Write the image to `path` as raw floats in `byte_order`.
    ///
    /// The output is readable by [`FloatImage::new_from_file`] with the same
    /// dimensions and byte order at offset zero.
    pub fn store(
        &mut self,
        path: impl AsRef<Path>,
        byte_order: ByteOrder,
    ) -> Result<(), ImageError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| ImageError::io(format!("creating {}", path.display()), e))?;

        let mut writer =
            RawFloatWriter::new(BufWriter::new(file), byte_order, path.display().to_string());
        let mut row = vec![0.0f32; self.size_x];
        for y in 0..self.size_y {
            self.get_row(y, &mut row)?;
            writer.write_row(&row)?;
        }
        writer.finish()?;

        debug!(path = %path.display(), ?byte_order, "Stored raw float image");
        Ok(())
    }

    /// Render the image as 8-bit grayscale with its largest side no longer
    /// than `max_dimension`.
    ///
    /// Larger images are first reduced by block averaging with the smallest
    /// odd factor that fits. Values within two standard deviations of the
    /// mean are mapped linearly onto `[0, 255]`; values outside are clamped.
    /// A constant image renders black if its value is zero and white
    /// otherwise.
    ///
    /// Every pixel of the image is read, twice.
    ///
    /// # Panics
    ///
    /// Panics if `max_dimension` is zero or larger than the largest side of
    /// the image.
    pub fn to_gray_image(&mut self, max_dimension: usize) -> Result<GrayImage, ImageError> {
        let largest = self.size_x.max(self.size_y);
        assert!(
            max_dimension > 0 && max_dimension <= largest,
            "max dimension {} outside 1..={}",
            max_dimension,
            largest
        );

        let mut factor = largest.div_ceil(max_dimension);
        if factor % 2 == 0 {
            factor += 1;
        }

        if factor == 1 {
            self.gray_pixels()
        } else {
            FloatImage::new_from_model_scaled(self, factor)?.gray_pixels()
        }
    }

    fn gray_pixels(&mut self) -> Result<GrayImage, ImageError> {
        let stats = self.statistics()?;
        assert!(
            self.size_x <= u32::MAX as usize && self.size_y <= u32::MAX as usize,
            "{}x{} image too large to render",
            self.size_x,
            self.size_y
        );
        let (width, height) = (self.size_x as u32, self.size_y as u32);

        if stats.min == stats.max {
            let level = if stats.min == 0.0 { 0 } else { 255 };
            return Ok(GrayImage::from_pixel(width, height, Luma([level])));
        }

        let low = stats.mean as f64 - 2.0 * stats.standard_deviation as f64;
        let high = stats.mean as f64 + 2.0 * stats.standard_deviation as f64;
        let scale = 255.0 / (high - low);

        let mut gray = GrayImage::new(width, height);
        let mut row = vec![0.0f32; self.size_x];
        for y in 0..self.size_y {
            self.get_row(y, &mut row)?;
            for (x, &value) in row.iter().enumerate() {
                let level = ((value as f64 - low) * scale).round().clamp(0.0, 255.0);
                gray.put_pixel(x as u32, y as u32, Luma([level as u8]));
            }
        }
        Ok(gray)
    }

    /// Export the image to `path` as a grayscale JPEG at
    /// [`DEFAULT_JPEG_QUALITY`]. See [`FloatImage::to_gray_image`] for the
    /// scaling and pixel mapping.
    pub fn export_as_jpeg(
        &mut self,
        path: impl AsRef<Path>,
        max_dimension: usize,
    ) -> Result<(), ImageError> {
        self.export_as_jpeg_with_quality(path, max_dimension, DEFAULT_JPEG_QUALITY)
    }

    /// Like [`FloatImage::export_as_jpeg`] with an explicit quality, clamped
    /// to 1-100.
    ///
    /// # Panics
    ///
    /// Panics if `max_dimension` exceeds 65535, the JPEG size limit.
    pub fn export_as_jpeg_with_quality(
        &mut self,
        path: impl AsRef<Path>,
        max_dimension: usize,
        quality: u8,
    ) -> Result<(), ImageError> {
        assert!(
            max_dimension <= MAX_JPEG_DIMENSION,
            "max dimension {} exceeds the JPEG limit of {}",
            max_dimension,
            MAX_JPEG_DIMENSION
        );
        let quality = quality.clamp(1, 100);
        let gray = self.to_gray_image(max_dimension)?;

        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| ImageError::io(format!("creating {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);

        let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        encoder
            .encode_image(&gray)
            .map_err(|e| ImageError::Encode {
                message: e.to_string(),
            })?;
        writer
            .flush()
            .map_err(|e| ImageError::io(format!("flushing {}", path.display()), e))?;

        debug!(
            path = %path.display(),
            width = gray.width(),
            height = gray.height(),
            quality,
            "Exported JPEG"
        );
        Ok(())
    }
}
