//! Raw float input and output integration tests.
//!
//! Tests verify:
//! - Images read from files at byte offsets in either byte order
//! - Store then reload reproduces every pixel
//! - Short and missing files surface as errors
//! - Thumbnails sampled directly from files

use std::fs::File;

use float_raster::{ByteOrder, FloatImage, ImageError};

use super::test_utils::{
    coordinate_value, coordinate_values, create_coordinate_image, create_raw_file,
};

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_new_from_file_with_offset_both_byte_orders() {
    let values = coordinate_values(13, 9);

    for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let file = create_raw_file(&values, byte_order, 720);
        let mut image = FloatImage::new_from_file(13, 9, file.path(), 720, byte_order).unwrap();

        for y in 0..9 {
            for x in 0..13 {
                assert_eq!(image.get_pixel(x, y).unwrap(), coordinate_value(x, y));
            }
        }
    }
}

#[test]
fn test_wrong_byte_order_scrambles_values() {
    let values = coordinate_values(4, 4);
    let file = create_raw_file(&values, ByteOrder::BigEndian, 0);
    let mut image =
        FloatImage::new_from_file(4, 4, file.path(), 0, ByteOrder::LittleEndian).unwrap();
    assert_ne!(image.get_pixel(3, 3).unwrap(), coordinate_value(3, 3));
}

#[test]
fn test_new_from_reader_at_current_position() {
    let values = coordinate_values(5, 3);
    let file = create_raw_file(&values, ByteOrder::BigEndian, 64);

    let mut handle = File::open(file.path()).unwrap();
    // Relative to the start of the file
    let mut image =
        FloatImage::new_from_reader(5, 3, &mut handle, 64, ByteOrder::BigEndian).unwrap();
    assert_eq!(image.get_pixel(4, 2).unwrap(), coordinate_value(4, 2));
}

#[test]
fn test_short_file_is_an_error() {
    let values = coordinate_values(10, 10);
    let file = create_raw_file(&values[..95], ByteOrder::LittleEndian, 0);

    let result = FloatImage::new_from_file(10, 10, file.path(), 0, ByteOrder::LittleEndian);
    match result {
        Err(ImageError::ShortRead {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 40);
            assert_eq!(actual, 20);
        }
        other => panic!("Expected ShortRead, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.raw");

    let result = FloatImage::new_from_file(4, 4, &path, 0, ByteOrder::LittleEndian);
    match result {
        Err(err @ ImageError::Io { .. }) => {
            assert!(err.to_string().contains("missing.raw"));
        }
        other => panic!("Expected Io error, got {:?}", other),
    }
}

// =============================================================================
// Store Round Trip
// =============================================================================

#[test]
fn test_store_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    // Small cache so storing pages tiles in and out
    let mut image = create_coordinate_image(50, 31, 512);
    image.set_pixel(17, 30, f32::MIN_POSITIVE).unwrap();
    image.set_pixel(49, 0, -0.0).unwrap();

    for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let path = dir.path().join(format!("round_trip_{:?}.raw", byte_order));
        image.store(&path, byte_order).unwrap();

        let mut reloaded = FloatImage::new_from_file(50, 31, &path, 0, byte_order).unwrap();
        for y in 0..31 {
            for x in 0..50 {
                let expected = image.get_pixel(x, y).unwrap();
                let actual = reloaded.get_pixel(x, y).unwrap();
                assert_eq!(actual.to_bits(), expected.to_bits(), "pixel ({}, {})", x, y);
            }
        }
    }
}

// =============================================================================
// Thumbnails
// =============================================================================

#[test]
fn test_file_scaled_thumbnail() {
    // 21x11 source sampled onto 11x6: every other pixel exactly
    let values = coordinate_values(21, 11);
    let file = create_raw_file(&values, ByteOrder::BigEndian, 16);

    let mut thumb =
        FloatImage::new_from_file_scaled(11, 6, 21, 11, file.path(), 16, ByteOrder::BigEndian)
            .unwrap();
    assert_eq!((thumb.size_x(), thumb.size_y()), (11, 6));

    for y in 0..6 {
        for x in 0..11 {
            assert_eq!(thumb.get_pixel(x, y).unwrap(), coordinate_value(2 * x, 2 * y));
        }
    }
}

#[test]
fn test_file_scaled_single_pixel() {
    let values = coordinate_values(6, 6);
    let file = create_raw_file(&values, ByteOrder::LittleEndian, 0);

    let mut thumb =
        FloatImage::new_from_file_scaled(1, 1, 6, 6, file.path(), 0, ByteOrder::LittleEndian)
            .unwrap();
    assert_eq!(thumb.get_pixel(0, 0).unwrap(), coordinate_value(0, 0));
}
