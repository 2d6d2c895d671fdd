//! Disk-backed float images.
//!
//! A [`FloatImage`] is a rectangular block of `f32` pixels that can be much
//! larger than available memory. On creation a copy of the image is written
//! to a private temporary file with the pixels rearranged into square tiles;
//! afterwards a small pool of tiles is kept in memory and paged in on demand.
//! Callers can treat the image as if it were fully resident, provided
//! successive accesses are spatially close.
//!
//! # Access pattern
//!
//! When a pixel is read or written:
//!
//! 1. If its tile is resident, the pixel is fetched or set directly.
//! 2. Otherwise the tile is loaded, possibly displacing the tile that was
//!    loaded longest ago. There is no most-recently-used heuristic.
//!
//! A larger cache budget means larger tiles and fewer loads.
//!
//! # Concurrency
//!
//! Every accessor takes `&mut self`, since even reads may page tiles in.
//! Split a large image into several instances to process it in parallel.

mod access;
mod export;
mod kernel;
mod sample;
mod scale;
mod sinc;
mod stats;

pub use export::DEFAULT_JPEG_QUALITY;
pub use kernel::Kernel;
pub use sample::SampleMethod;
pub use sinc::{SincTable, WindowFunction, DEFAULT_SINC_POINTS, KAISER_ALPHA, NUM_SINCS};
pub use stats::{ApproximateStatistics, Statistics};

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::ImageError;
use crate::io::{ByteOrder, RawFloatReader, TileStore};
use crate::tile::{CacheStats, TileCache, TileGeometry, DEFAULT_CACHE_SPACE};

/// A large 2-D raster of `f32` pixels with a transparent tile cache.
///
/// Only the dimensions are part of the public state; tile bookkeeping is
/// private to the instance.
pub struct FloatImage {
    size_x: usize,
    size_y: usize,
    geometry: TileGeometry,
    cache: TileCache<TileStore>,
}

impl FloatImage {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an image filled with zeros.
    pub fn new(size_x: usize, size_y: usize) -> Result<Self, ImageError> {
        Self::new_with_value(size_x, size_y, 0.0)
    }

    /// Create an image with every pixel set to `value`.
    pub fn new_with_value(size_x: usize, size_y: usize, value: f32) -> Result<Self, ImageError> {
        Self::from_rows(size_x, size_y, |_, row| {
            row.fill(value);
            Ok(())
        })
    }

    /// Create an image from a row-major buffer of `size_x * size_y` pixels.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` does not hold exactly `size_x * size_y` pixels.
    pub fn new_from_memory(
        size_x: usize,
        size_y: usize,
        buffer: &[f32],
    ) -> Result<Self, ImageError> {
        assert_eq!(
            buffer.len(),
            size_x * size_y,
            "buffer holds {} pixels, a {}x{} image needs {}",
            buffer.len(),
            size_x,
            size_y,
            size_x * size_y
        );

        Self::from_rows(size_x, size_y, |y, row| {
            row.copy_from_slice(&buffer[y * size_x..(y + 1) * size_x]);
            Ok(())
        })
    }

    /// Create an image from raw floats stored at byte `offset` of `path`.
    ///
    /// The file must hold `size_x * size_y` samples in `byte_order`, laid out
    /// as for [`FloatImage::new_from_memory`].
    pub fn new_from_file(
        size_x: usize,
        size_y: usize,
        path: impl AsRef<Path>,
        offset: u64,
        byte_order: ByteOrder,
    ) -> Result<Self, ImageError> {
        Self::new_from_file_with_cache_space(
            size_x,
            size_y,
            path,
            offset,
            byte_order,
            DEFAULT_CACHE_SPACE,
        )
    }

    /// Like [`FloatImage::new_from_file`], with a custom memory cache budget
    /// in bytes.
    pub fn new_from_file_with_cache_space(
        size_x: usize,
        size_y: usize,
        path: impl AsRef<Path>,
        offset: u64,
        byte_order: ByteOrder,
        cache_space: usize,
    ) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ImageError::io(format!("opening {}", path.display()), e))?;

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset)).map_err(|e| {
            ImageError::io(
                format!("seeking to offset {} in {}", offset, path.display()),
                e,
            )
        })?;

        let mut raw = RawFloatReader::new(reader, size_x, byte_order, path.display().to_string());
        Self::from_rows_with_cache_space(size_x, size_y, cache_space, |_, row| raw.read_row(row))
    }

    /// Create an image from raw floats in an open stream.
    ///
    /// `offset` is relative to the current position of `reader`.
    pub fn new_from_reader<R: Read + Seek>(
        size_x: usize,
        size_y: usize,
        reader: &mut R,
        offset: i64,
        byte_order: ByteOrder,
    ) -> Result<Self, ImageError> {
        reader.seek(SeekFrom::Current(offset)).map_err(|e| {
            ImageError::io(format!("seeking {} bytes in input stream", offset), e)
        })?;

        let mut raw = RawFloatReader::new(reader, size_x, byte_order, "input stream");
        Self::from_rows(size_x, size_y, |_, row| raw.read_row(row))
    }

    /// Create an image whose rows are produced by `fill_row`.
    ///
    /// `fill_row(y, row)` is called once per row, in increasing `y`, with a
    /// `size_x` pixel buffer to fill. This is the hook format readers use to
    /// feed decoded data into the tile store.
    pub fn from_rows<F>(size_x: usize, size_y: usize, fill_row: F) -> Result<Self, ImageError>
    where
        F: FnMut(usize, &mut [f32]) -> Result<(), ImageError>,
    {
        Self::from_rows_with_cache_space(size_x, size_y, DEFAULT_CACHE_SPACE, fill_row)
    }

    /// Like [`FloatImage::from_rows`], with a custom memory cache budget in
    /// bytes.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or the cache budget is out of range
    /// (see [`TileGeometry::new`]).
    pub fn from_rows_with_cache_space<F>(
        size_x: usize,
        size_y: usize,
        cache_space: usize,
        fill_row: F,
    ) -> Result<Self, ImageError>
    where
        F: FnMut(usize, &mut [f32]) -> Result<(), ImageError>,
    {
        let geometry = TileGeometry::new(size_x, size_y, cache_space);
        Self::from_geometry(geometry, fill_row)
    }

    fn from_geometry<F>(geometry: TileGeometry, fill_row: F) -> Result<Self, ImageError>
    where
        F: FnMut(usize, &mut [f32]) -> Result<(), ImageError>,
    {
        let store = TileStore::create(&geometry, fill_row)?;
        let cache = TileCache::new(
            store,
            geometry.tile_area(),
            geometry.cache_size_in_tiles(),
            geometry.tile_count(),
        );

        debug!(
            size_x = geometry.size_x(),
            size_y = geometry.size_y(),
            tile_size = geometry.tile_size(),
            cache_tiles = geometry.cache_size_in_tiles(),
            tile_count = geometry.tile_count(),
            "Created float image"
        );

        Ok(Self {
            size_x: geometry.size_x(),
            size_y: geometry.size_y(),
            geometry,
            cache,
        })
    }

    // =========================================================================
    // Dimensions and Cache Control
    // =========================================================================

    /// Image width in pixels.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Image height in pixels.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Tiling currently in use.
    pub fn tile_geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Memory cache budget of this image, in bytes.
    pub fn cache_space(&self) -> usize {
        self.geometry.cache_space()
    }

    /// Cache counters since the tiling was last (re)built.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Change the memory cache budget to `cache_space` bytes.
    ///
    /// The tiling is recomputed, the tile file regenerated from the current
    /// pixel values and the memory cache emptied, so this is slow.
    ///
    /// # Panics
    ///
    /// Panics if the budget is out of range (see [`TileGeometry::new`]).
    pub fn set_cache_size(&mut self, cache_space: usize) -> Result<(), ImageError> {
        let geometry = TileGeometry::new(self.size_x, self.size_y, cache_space);

        debug!(
            old_tile_size = self.geometry.tile_size(),
            new_tile_size = geometry.tile_size(),
            cache_space,
            "Regenerating tile file for new cache size"
        );

        // Rows are read through the current cache, so unflushed writes are
        // carried over.
        let store = TileStore::create(&geometry, |y, row| self.get_row(y, row))?;
        self.cache = TileCache::new(
            store,
            geometry.tile_area(),
            geometry.cache_size_in_tiles(),
            geometry.tile_count(),
        );
        self.geometry = geometry;
        Ok(())
    }

    /// Write modified resident tiles to the tile file.
    pub fn flush(&mut self) -> Result<(), ImageError> {
        self.cache.flush()
    }
}

impl std::fmt::Debug for FloatImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatImage")
            .field("size_x", &self.size_x)
            .field("size_y", &self.size_y)
            .field("tile_size", &self.geometry.tile_size())
            .field("cache_size_in_tiles", &self.geometry.cache_size_in_tiles())
            .finish()
    }
}
