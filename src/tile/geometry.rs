//! Tile grid geometry.
//!
//! Given the image dimensions and a memory budget, the image is divided into
//! square tiles small enough that two full rows (or columns, whichever is
//! longer) of tiles fit in the memory cache at once.

use crate::io::BYTES_PER_SAMPLE;

/// Default per-image memory cache budget: 16MB
pub const DEFAULT_CACHE_SPACE: usize = 16 * 1024 * 1024;

/// Largest per-image memory cache budget accepted: 4GB
///
/// Held as `u64` so the limit exists on 32-bit targets, where no `usize`
/// budget can reach it.
pub const MAX_CACHE_SPACE: u64 = 4 * 1024 * 1024 * 1024;

/// Position of a pixel within the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLocation {
    /// Tile column
    pub tile_x: usize,
    /// Tile row
    pub tile_y: usize,
    /// Linear tile index, `tile_y * tile_count_x + tile_x`
    pub tile_index: usize,
    /// Column within the tile
    pub local_x: usize,
    /// Row within the tile
    pub local_y: usize,
}

impl TileLocation {
    /// Offset of the pixel within a row-major tile buffer.
    #[inline]
    pub fn offset(&self, tile_size: usize) -> usize {
        self.local_y * tile_size + self.local_x
    }
}

/// Tiling of an image for a given cache budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGeometry {
    size_x: usize,
    size_y: usize,
    cache_space: usize,
    tile_size: usize,
    cache_size_in_tiles: usize,
    tile_count_x: usize,
    tile_count_y: usize,
}

impl TileGeometry {
    /// Derive the tiling for a `size_x` by `size_y` image with a memory
    /// cache of `cache_space` bytes.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero, if `cache_space` exceeds
    /// [`MAX_CACHE_SPACE`], or if it cannot hold two rows of one-pixel tiles
    /// along the largest image dimension.
    pub fn new(size_x: usize, size_y: usize, cache_space: usize) -> Self {
        assert!(
            size_x > 0 && size_y > 0,
            "image dimensions must be positive, got {}x{}",
            size_x,
            size_y
        );
        assert!(
            cache_space as u64 <= MAX_CACHE_SPACE,
            "cache size {} bytes exceeds maximum of {} bytes",
            cache_space,
            MAX_CACHE_SPACE
        );

        let cache_area = cache_space / BYTES_PER_SAMPLE;
        let largest = size_x.max(size_y);
        assert!(
            cache_area >= 2 * largest,
            "cache size {} bytes too small for a {}x{} image (need at least {} bytes)",
            cache_space,
            size_x,
            size_y,
            2 * largest * BYTES_PER_SAMPLE
        );

        // Two strips of tiles along the largest dimension must fit.
        let fits = |tile_size: usize| {
            2 * largest.div_ceil(tile_size) * tile_size * tile_size <= cache_area
        };
        let mut tile_size = (cache_area / (2 * largest)).clamp(1, largest);
        while tile_size > 1 && !fits(tile_size) {
            tile_size -= 1;
        }

        let tile_count_x = size_x.div_ceil(tile_size);
        let tile_count_y = size_y.div_ceil(tile_size);
        let cache_size_in_tiles =
            (cache_area / (tile_size * tile_size)).min(tile_count_x * tile_count_y);

        Self {
            size_x,
            size_y,
            cache_space,
            tile_size,
            cache_size_in_tiles,
            tile_count_x,
            tile_count_y,
        }
    }

    /// Build a geometry with an explicit tile size and cache capacity.
    ///
    /// # Panics
    ///
    /// Panics if any argument is zero.
    pub fn with_tile_size(
        size_x: usize,
        size_y: usize,
        tile_size: usize,
        cache_size_in_tiles: usize,
    ) -> Self {
        assert!(size_x > 0 && size_y > 0, "image dimensions must be positive");
        assert!(tile_size > 0, "tile size must be positive");
        assert!(cache_size_in_tiles > 0, "cache must hold at least one tile");

        let tile_count_x = size_x.div_ceil(tile_size);
        let tile_count_y = size_y.div_ceil(tile_size);

        Self {
            size_x,
            size_y,
            cache_space: cache_size_in_tiles * tile_size * tile_size * BYTES_PER_SAMPLE,
            tile_size,
            cache_size_in_tiles: cache_size_in_tiles.min(tile_count_x * tile_count_y),
            tile_count_x,
            tile_count_y,
        }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Memory cache budget in bytes.
    pub fn cache_space(&self) -> usize {
        self.cache_space
    }

    /// Tile side length in pixels.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Pixels per tile.
    pub fn tile_area(&self) -> usize {
        self.tile_size * self.tile_size
    }

    /// Maximum number of tiles resident in memory.
    pub fn cache_size_in_tiles(&self) -> usize {
        self.cache_size_in_tiles
    }

    pub fn tile_count_x(&self) -> usize {
        self.tile_count_x
    }

    pub fn tile_count_y(&self) -> usize {
        self.tile_count_y
    }

    /// Total number of tiles in the image.
    pub fn tile_count(&self) -> usize {
        self.tile_count_x * self.tile_count_y
    }

    /// Locate pixel `(x, y)` in the tile grid.
    #[inline]
    pub fn locate(&self, x: usize, y: usize) -> TileLocation {
        let tile_x = x / self.tile_size;
        let tile_y = y / self.tile_size;
        TileLocation {
            tile_x,
            tile_y,
            tile_index: tile_y * self.tile_count_x + tile_x,
            local_x: x % self.tile_size,
            local_y: y % self.tile_size,
        }
    }
}
