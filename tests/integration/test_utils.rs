//! Test utilities for integration tests.
//!
//! This module provides a tracking tile source and helpers for building
//! images and raw float files with known contents.

use std::io::Write;

use tempfile::NamedTempFile;

use float_raster::io::{encode_f32s, TileSource};
use float_raster::{ByteOrder, FloatImage, ImageError};

// =============================================================================
// Tracking Tile Source
// =============================================================================

/// An in-memory tile source that records loads and counts stores.
///
/// Every tile is initially filled with its own index, so the origin of a
/// resident tile can be checked.
pub struct TrackingTileSource {
    tiles: Vec<Vec<f32>>,
    stores: usize,
    load_log: Vec<usize>,
}

impl TrackingTileSource {
    pub fn new(tile_count: usize, tile_area: usize) -> Self {
        Self {
            tiles: (0..tile_count)
                .map(|index| vec![index as f32; tile_area])
                .collect(),
            stores: 0,
            load_log: Vec::new(),
        }
    }

    pub fn load_count(&self) -> usize {
        self.load_log.len()
    }

    pub fn store_count(&self) -> usize {
        self.stores
    }

    /// Tile indices in the order they were loaded.
    pub fn load_log(&self) -> &[usize] {
        &self.load_log
    }

    pub fn tile(&self, index: usize) -> &[f32] {
        &self.tiles[index]
    }
}

impl TileSource for TrackingTileSource {
    fn load_tile(&mut self, tile_index: usize, tile: &mut [f32]) -> Result<(), ImageError> {
        self.load_log.push(tile_index);
        tile.copy_from_slice(&self.tiles[tile_index]);
        Ok(())
    }

    fn store_tile(&mut self, tile_index: usize, tile: &[f32]) -> Result<(), ImageError> {
        self.stores += 1;
        self.tiles[tile_index].copy_from_slice(tile);
        Ok(())
    }
}

// =============================================================================
// Image Helpers
// =============================================================================

/// Value of pixel `(x, y)` in images built by [`create_coordinate_image`].
pub fn coordinate_value(x: usize, y: usize) -> f32 {
    (1000 * y + x) as f32
}

/// Create an image whose pixels encode their own coordinates.
pub fn create_coordinate_image(size_x: usize, size_y: usize, cache_space: usize) -> FloatImage {
    FloatImage::from_rows_with_cache_space(size_x, size_y, cache_space, |y, row| {
        for (x, value) in row.iter_mut().enumerate() {
            *value = coordinate_value(x, y);
        }
        Ok(())
    })
    .unwrap()
}

/// Pixel coordinates of the upper left corner of tile `index` in a grid
/// `tiles_x` tiles wide.
pub fn tile_origin(index: usize, tiles_x: usize, tile_size: usize) -> (usize, usize) {
    ((index % tiles_x) * tile_size, (index / tiles_x) * tile_size)
}

// =============================================================================
// Raw File Helpers
// =============================================================================

/// Write `values` as raw floats after `offset` bytes of padding.
pub fn create_raw_file(values: &[f32], byte_order: ByteOrder, offset: usize) -> NamedTempFile {
    let mut bytes = vec![0x5Au8; offset];
    encode_f32s(values, byte_order, &mut bytes);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Row-major pixel values of a `size_x` by `size_y` coordinate image.
pub fn coordinate_values(size_x: usize, size_y: usize) -> Vec<f32> {
    (0..size_y)
        .flat_map(|y| (0..size_x).map(move |x| coordinate_value(x, y)))
        .collect()
}

/// Check whether bytes look like a JPEG image (SOI marker).
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}
