//! # Float Raster
//!
//! Disk-backed `f32` rasters with a transparent tile cache.
//!
//! This library lets code treat a raster much larger than memory as if it
//! were fully resident. On creation the pixels are rearranged into square
//! tiles in a private temporary file; a bounded pool of tiles is then paged
//! in on demand, evicting the tile loaded longest ago.
//!
//! ## Features
//!
//! - **Tile cache**: FIFO replacement with write-back of modified tiles
//! - **Accessors**: pixels, rectangular regions and rows, with odd reflection
//!   past the edges
//! - **Sampling**: nearest, bilinear, bicubic and windowed-sinc interpolation
//! - **Derived data**: convolution kernels, block-averaged reductions,
//!   statistics, raw float and grayscale JPEG output
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - Byte order handling, raw float rows and the on-disk tile store
//! - [`tile`] - Tile geometry and the FIFO tile cache
//! - [`mod@image`] - The [`FloatImage`] type and everything built on it
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use float_raster::{ByteOrder, FloatImage, SampleMethod};
//!
//! # fn main() -> Result<(), float_raster::ImageError> {
//! let mut image = FloatImage::new_from_file(4096, 4096, "scene.raw", 0, ByteOrder::BigEndian)?;
//!
//! let stats = image.statistics()?;
//! println!("mean {} stddev {}", stats.mean, stats.standard_deviation);
//!
//! let value = image.sample(100.25, 200.5, SampleMethod::Bicubic)?;
//! println!("value {}", value);
//!
//! image.export_as_jpeg("scene.jpg", 1024)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod io;
pub mod tile;

// Re-export commonly used types
pub use config::{Cli, Command};
pub use error::ImageError;
pub use image::{
    ApproximateStatistics, FloatImage, Kernel, SampleMethod, SincTable, Statistics,
    WindowFunction, DEFAULT_JPEG_QUALITY, DEFAULT_SINC_POINTS, KAISER_ALPHA, NUM_SINCS,
};
pub use io::ByteOrder;
pub use tile::{CacheStats, DEFAULT_CACHE_SPACE, MAX_CACHE_SPACE};
