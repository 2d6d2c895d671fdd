//! Property-based tests for pixel access.
//!
//! Tests verify:
//! - A written pixel reads back exactly, whatever else was evicted
//! - Region reads agree with pixel reads for arbitrary rectangles

use float_raster::FloatImage;
use proptest::prelude::*;

use super::test_utils::{coordinate_value, create_coordinate_image};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_set_then_get_round_trip(
        size_x in 1usize..40,
        size_y in 1usize..40,
        writes in prop::collection::vec((0usize..40, 0usize..40, any::<f32>()), 1..60),
    ) {
        // Smallest legal cache: one-pixel tiles, heavy eviction
        let cache_space = 8 * size_x.max(size_y);
        let mut image = FloatImage::from_rows_with_cache_space(size_x, size_y, cache_space, |_, row| {
            row.fill(0.0);
            Ok(())
        })?;

        for (x, y, value) in writes {
            let (x, y) = (x % size_x, y % size_y);
            image.set_pixel(x, y, value)?;
            let read = image.get_pixel(x, y)?;
            prop_assert_eq!(
                read.to_bits(),
                value.to_bits(),
                "pixel ({}, {}) wrote {} read {}",
                x, y, value, read
            );
        }
    }

    #[test]
    fn test_region_matches_pixels(
        x in 0usize..30,
        y in 0usize..20,
        width in 1usize..12,
        height in 1usize..12,
    ) {
        let mut image = create_coordinate_image(41, 31, 400);
        let width = width.min(41 - x);
        let height = height.min(31 - y);

        let mut buffer = vec![0.0f32; width * height];
        image.get_region(x, y, width, height, &mut buffer)?;

        for row in 0..height {
            for col in 0..width {
                prop_assert_eq!(buffer[row * width + col], coordinate_value(x + col, y + row));
            }
        }
    }
}
