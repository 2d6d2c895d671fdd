//! JPEG export and reduction integration tests.
//!
//! Tests verify:
//! - Constant images export as black or white
//! - Exported images respect the maximum dimension
//! - Block-averaged reductions preserve uniform regions

use float_raster::FloatImage;

use super::test_utils::{create_coordinate_image, is_valid_jpeg};

fn decode_gray(path: &std::path::Path) -> image::GrayImage {
    image::open(path).unwrap().to_luma8()
}

// =============================================================================
// JPEG Export
// =============================================================================

#[test]
fn test_constant_zero_exports_black() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("black.jpg");

    let mut image = FloatImage::new(40, 24).unwrap();
    image.export_as_jpeg(&path, 40).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(is_valid_jpeg(&bytes));

    let gray = decode_gray(&path);
    assert_eq!(gray.dimensions(), (40, 24));
    assert!(gray.pixels().all(|p| p.0[0] <= 2));
}

#[test]
fn test_constant_nonzero_exports_white() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("white.jpg");

    let mut image = FloatImage::new_with_value(40, 24, 0.001).unwrap();
    image.export_as_jpeg(&path, 40).unwrap();

    let gray = decode_gray(&path);
    assert!(gray.pixels().all(|p| p.0[0] >= 253));
}

#[test]
fn test_export_reduces_large_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reduced.jpg");

    let mut image = create_coordinate_image(300, 120, 64 * 1024);
    image.export_as_jpeg(&path, 64).unwrap();

    // ceil(300 / 64) = 5, already odd
    let gray = decode_gray(&path);
    assert_eq!(gray.dimensions(), (60, 24));
}

#[test]
fn test_export_brightness_follows_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("halves.jpg");

    // Left half low, right half high
    let mut image = FloatImage::from_rows(64, 32, |_, row| {
        for (x, value) in row.iter_mut().enumerate() {
            *value = if x < 32 { -5.0 } else { 5.0 };
        }
        Ok(())
    })
    .unwrap();
    image.export_as_jpeg_with_quality(&path, 64, 95).unwrap();

    // Mean 0 and stddev 5 put -5 at 64 and 5 at 191
    let gray = decode_gray(&path);
    assert!(gray.get_pixel(8, 16).0[0] < 96);
    assert!(gray.get_pixel(56, 16).0[0] > 160);
}

#[test]
fn test_gray_image_without_encoding() {
    let mut image = create_coordinate_image(90, 45, 64 * 1024);
    let gray = image.to_gray_image(30).unwrap();
    assert_eq!(gray.dimensions(), (30, 15));

    // Values grow with y, so brightness does too
    assert!(gray.get_pixel(15, 0).0[0] < gray.get_pixel(15, 14).0[0]);
}

// =============================================================================
// Block-Averaged Reduction
// =============================================================================

#[test]
fn test_model_scaled_uniform_invariance() {
    for value in [0.0f32, 1.0, -3.75, 1.0e6] {
        let mut model = FloatImage::new_with_value(9, 9, value).unwrap();
        let mut scaled = FloatImage::new_from_model_scaled(&mut model, 3).unwrap();

        assert_eq!((scaled.size_x(), scaled.size_y()), (3, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(scaled.get_pixel(x, y).unwrap(), value);
            }
        }
    }
}

#[test]
fn test_model_scaled_reflects_partial_blocks() {
    // 4x1 row [0, 1, 2, 3] reduced by 3: the second block is centred on
    // x = 4 and reads x = 3, 4 -> 2, 5 -> 1
    let mut model = FloatImage::new_from_memory(4, 1, &[0.0, 1.0, 2.0, 3.0]).unwrap();
    let mut scaled = FloatImage::new_from_model_scaled(&mut model, 3).unwrap();

    assert_eq!((scaled.size_x(), scaled.size_y()), (2, 1));
    assert_eq!(scaled.get_pixel(0, 0).unwrap(), 1.0);
    assert_eq!(scaled.get_pixel(1, 0).unwrap(), 2.0);
}
