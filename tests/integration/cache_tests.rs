//! Tile cache integration tests.
//!
//! Tests verify:
//! - Replacement is strictly first-in first-out, not least recently used
//! - Writes survive eviction and cache resizing
//! - Sequential row access keeps tiles resident

use float_raster::tile::TileCache;
use float_raster::FloatImage;

use super::test_utils::{
    coordinate_value, create_coordinate_image, tile_origin, TrackingTileSource,
};

/// 8x8 image with 128 bytes of cache: 2x2 tiles in a 4x4 grid, 8 resident.
fn small_cache_image() -> FloatImage {
    let image = create_coordinate_image(8, 8, 128);
    let geometry = image.tile_geometry();
    assert_eq!(geometry.tile_size(), 2);
    assert_eq!(geometry.tile_count_x(), 4);
    assert_eq!(geometry.tile_count(), 16);
    assert_eq!(geometry.cache_size_in_tiles(), 8);
    image
}

/// Read one pixel of tile `index` and return the total number of loads.
fn touch_tile(image: &mut FloatImage, index: usize) -> u64 {
    let (x, y) = tile_origin(index, 4, 2);
    assert_eq!(image.get_pixel(x, y).unwrap(), coordinate_value(x, y));
    image.cache_stats().loads
}

// =============================================================================
// FIFO Replacement
// =============================================================================

#[test]
fn test_oldest_tile_is_evicted_first() {
    let mut image = small_cache_image();

    // Fill the cache with T0..T7, then T8 displaces T0
    for index in 0..=8 {
        touch_tile(&mut image, index);
    }
    let stats = image.cache_stats();
    assert_eq!(stats.loads, 9);
    assert_eq!(stats.evictions, 1);

    // T1 is second-oldest and still resident
    assert_eq!(touch_tile(&mut image, 1), 9);

    // T0 was evicted and must be reloaded
    assert_eq!(touch_tile(&mut image, 0), 10);
}

#[test]
fn test_hits_do_not_promote_tiles() {
    let mut image = small_cache_image();
    for index in 0..=8 {
        touch_tile(&mut image, index);
    }

    // Hit T1 repeatedly. Under LRU this would protect it; under FIFO the
    // reload of T0 still displaces T1, the oldest resident tile.
    for _ in 0..5 {
        assert_eq!(touch_tile(&mut image, 1), 9);
    }
    assert_eq!(touch_tile(&mut image, 0), 10);

    // T2 survives, T1 does not
    assert_eq!(touch_tile(&mut image, 2), 10);
    assert_eq!(touch_tile(&mut image, 1), 11);
}

#[test]
fn test_cache_over_tracking_source() {
    let mut cache = TileCache::new(TrackingTileSource::new(6, 4), 4, 3, 6);

    for index in [0, 1, 2, 0, 3, 0, 1] {
        let tile = cache.tile(index).unwrap();
        assert_eq!(tile[0], index as f32);
    }

    // 0,1,2 loaded; 0 hit; 3 evicts 0; 0 evicts 1; 1 evicts 2
    assert_eq!(cache.inner().load_log(), &[0, 1, 2, 3, 0, 1]);
    assert_eq!(cache.inner().load_count(), 6);
    assert_eq!(cache.stats().hits, 1);
    assert!(cache.is_resident(3) && cache.is_resident(0) && cache.is_resident(1));
    assert!(!cache.is_resident(2));
}

// =============================================================================
// Write-Back
// =============================================================================

#[test]
fn test_dirty_tiles_written_back_on_eviction() {
    let mut cache = TileCache::new(TrackingTileSource::new(4, 4), 4, 2, 4);

    cache.tile_mut(0).unwrap()[3] = -1.0;
    cache.tile(1).unwrap();
    assert_eq!(cache.inner().store_count(), 0);

    // Loading tile 2 evicts dirty tile 0
    cache.tile(2).unwrap();
    assert_eq!(cache.inner().store_count(), 1);
    assert_eq!(cache.inner().tile(0), &[0.0, 0.0, 0.0, -1.0]);

    // Clean tile 1 is evicted without a store
    cache.tile(3).unwrap();
    assert_eq!(cache.inner().store_count(), 1);

    // The modified tile comes back intact
    assert_eq!(cache.tile(0).unwrap()[3], -1.0);
}

#[test]
fn test_writes_survive_heavy_eviction() {
    let mut image = create_coordinate_image(37, 23, 400);
    assert!(image.tile_geometry().cache_size_in_tiles() < image.tile_geometry().tile_count());

    // Column-major order defeats the cache as much as possible
    for x in 0..37 {
        for y in 0..23 {
            image.set_pixel(x, y, -coordinate_value(x, y)).unwrap();
        }
    }
    for y in 0..23 {
        for x in 0..37 {
            assert_eq!(image.get_pixel(x, y).unwrap(), -coordinate_value(x, y));
        }
    }

    let stats = image.cache_stats();
    assert!(stats.evictions > 0);
    assert!(stats.write_backs > 0);
}

#[test]
fn test_resize_keeps_unflushed_writes() {
    let mut image = create_coordinate_image(30, 20, 256);
    image.set_pixel(29, 19, 0.5).unwrap();
    image.set_pixel(0, 0, 1.5).unwrap();

    image.set_cache_size(64 * 1024).unwrap();
    assert_eq!(image.tile_geometry().tile_count(), 1);

    assert_eq!(image.get_pixel(29, 19).unwrap(), 0.5);
    assert_eq!(image.get_pixel(0, 0).unwrap(), 1.5);
    assert_eq!(image.get_pixel(10, 10).unwrap(), coordinate_value(10, 10));
}

// =============================================================================
// Access Patterns
// =============================================================================

#[test]
fn test_sequential_rows_load_each_tile_once() {
    let mut image = create_coordinate_image(64, 64, 4096);
    let geometry = image.tile_geometry().clone();
    assert!(geometry.cache_size_in_tiles() >= 2 * geometry.tile_count_x());

    let mut row = vec![0.0f32; 64];
    for y in 0..64 {
        image.get_row(y, &mut row).unwrap();
        assert_eq!(row[63], coordinate_value(63, y));
    }

    assert_eq!(image.cache_stats().loads, geometry.tile_count() as u64);
}
