//! Disk-resident copy of an image, reorganized into contiguous tiles.
//!
//! The tile file holds `tile_count` tiles of `tile_size * tile_size` floats
//! each, row-major within a tile, tiles ordered by (tile row, tile column),
//! in the native byte order of the process. Edge tiles are zero padded out
//! to the full tile size. The file is private to one image and is removed
//! when the store is dropped.

use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::byte_order::{decode_f32s, encode_f32s, ByteOrder, BYTES_PER_SAMPLE};
use super::raw::read_fully;
use crate::error::ImageError;
use crate::tile::TileGeometry;

/// Backing storage for whole tiles, addressed by tile index.
///
/// The tile cache only talks to its backing store through this trait, so
/// it can be exercised against an in-memory source in tests.
pub trait TileSource {
    /// Fill `tile` with the stored contents of tile `tile_index`.
    fn load_tile(&mut self, tile_index: usize, tile: &mut [f32]) -> Result<(), ImageError>;

    /// Persist `tile` as the contents of tile `tile_index`.
    fn store_tile(&mut self, tile_index: usize, tile: &[f32]) -> Result<(), ImageError>;
}

/// Tile file on local disk.
pub struct TileStore {
    file: NamedTempFile,
    tile_area: usize,
    tile_count: usize,
    /// Scratch buffer holding one encoded tile
    bytes: Vec<u8>,
}

impl TileStore {
    /// Generate the tile file in a single pass over the source rows.
    ///
    /// `fill_row(y, row)` must write row `y` of the image (`size_x` pixels)
    /// into `row`. Rows are requested once each, in increasing order.
    pub fn create<F>(geometry: &TileGeometry, mut fill_row: F) -> Result<Self, ImageError>
    where
        F: FnMut(usize, &mut [f32]) -> Result<(), ImageError>,
    {
        let file = tempfile::Builder::new()
            .prefix("float-raster-tiles-")
            .tempfile()
            .map_err(|e| ImageError::io("creating temporary tile file", e))?;

        let tile_size = geometry.tile_size();
        let tile_area = geometry.tile_area();
        let context = format!("writing tile file {}", file.path().display());

        debug!(
            path = %file.path().display(),
            tile_size,
            tile_count = geometry.tile_count(),
            "Generating tile file"
        );

        // One strip is a full row of tiles, which is contiguous on disk.
        let mut row = vec![0.0f32; geometry.size_x()];
        let mut strip = vec![0.0f32; tile_area * geometry.tile_count_x()];
        let mut bytes = Vec::with_capacity(strip.len() * BYTES_PER_SAMPLE);

        {
            let mut writer = BufWriter::new(file.as_file());

            for tile_y in 0..geometry.tile_count_y() {
                strip.fill(0.0);

                for local_y in 0..tile_size {
                    let y = tile_y * tile_size + local_y;
                    if y >= geometry.size_y() {
                        break;
                    }
                    fill_row(y, &mut row)?;

                    for (tile_x, chunk) in row.chunks(tile_size).enumerate() {
                        let start = tile_x * tile_area + local_y * tile_size;
                        strip[start..start + chunk.len()].copy_from_slice(chunk);
                    }
                }

                bytes.clear();
                encode_f32s(&strip, ByteOrder::native(), &mut bytes);
                writer
                    .write_all(&bytes)
                    .map_err(|e| ImageError::io(context.clone(), e))?;
            }

            writer.flush().map_err(|e| ImageError::io(context, e))?;
        }

        Ok(Self {
            file,
            tile_area,
            tile_count: geometry.tile_count(),
            bytes: vec![0u8; tile_area * BYTES_PER_SAMPLE],
        })
    }

    /// Location of the tile file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of tiles in the file.
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    #[inline]
    fn tile_bytes(&self) -> usize {
        self.tile_area * BYTES_PER_SAMPLE
    }

    fn seek_to_tile(&mut self, tile_index: usize, action: &str) -> Result<(), ImageError> {
        assert!(
            tile_index < self.tile_count,
            "tile index {} out of range (tile count {})",
            tile_index,
            self.tile_count
        );

        let offset = (tile_index * self.tile_bytes()) as u64;
        let path = self.file.path().display().to_string();
        self.file
            .as_file_mut()
            .seek(SeekFrom::Start(offset))
            .map_err(|e| {
                ImageError::io(
                    format!("seeking to {} tile {} in {}", action, tile_index, path),
                    e,
                )
            })?;
        Ok(())
    }
}

impl TileSource for TileStore {
    fn load_tile(&mut self, tile_index: usize, tile: &mut [f32]) -> Result<(), ImageError> {
        debug_assert_eq!(tile.len(), self.tile_area);
        self.seek_to_tile(tile_index, "load")?;

        let path = self.file.path().display().to_string();
        let context = || format!("loading tile {} from {}", tile_index, path);
        let read = read_fully(self.file.as_file_mut(), &mut self.bytes)
            .map_err(|e| ImageError::io(context(), e))?;

        if read != self.bytes.len() {
            return Err(ImageError::ShortRead {
                context: context(),
                expected: self.bytes.len(),
                actual: read,
            });
        }

        decode_f32s(&self.bytes, ByteOrder::native(), tile);
        Ok(())
    }

    fn store_tile(&mut self, tile_index: usize, tile: &[f32]) -> Result<(), ImageError> {
        debug_assert_eq!(tile.len(), self.tile_area);
        self.seek_to_tile(tile_index, "store")?;

        self.bytes.clear();
        encode_f32s(tile, ByteOrder::native(), &mut self.bytes);

        let path = self.file.path().display().to_string();
        self.file
            .as_file_mut()
            .write_all(&self.bytes)
            .map_err(|e| ImageError::io(format!("storing tile {} to {}", tile_index, path), e))
    }
}
