//! Command-line configuration for the `float-raster` tool.
//!
//! Every subcommand loads a raw float raster described by [`InputArgs`]
//! (path, dimensions, byte offset and byte order) and then does one thing
//! with it. Options can also be set via environment variables with the
//! `FLOAT_RASTER_` prefix:
//!
//! - `FLOAT_RASTER_BYTE_ORDER` - Byte order of input samples (default: little)
//! - `FLOAT_RASTER_CACHE_SPACE` - Tile cache budget in bytes (default: 16 MiB)
//! - `FLOAT_RASTER_JPEG_QUALITY` - JPEG export quality (default: 80)
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use float_raster::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.into_command() {
//!     Command::Stats(config) => println!("stride {:?}", config.stride),
//!     _ => {}
//! }
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::image::{SampleMethod, WindowFunction, DEFAULT_JPEG_QUALITY, DEFAULT_SINC_POINTS};
use crate::io::ByteOrder;
use crate::io::BYTES_PER_SAMPLE;
use crate::tile::{DEFAULT_CACHE_SPACE, MAX_CACHE_SPACE};

// =============================================================================
// Default Values
// =============================================================================

/// Default largest side of an exported JPEG.
pub const DEFAULT_MAX_DIMENSION: usize = 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Float Raster - inspect and convert large raw float rasters.
///
/// Images are paged through a small tile cache, so rasters much larger than
/// memory can be processed.
#[derive(Parser, Debug, Clone)]
#[command(name = "float-raster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the parsed arguments and return the subcommand.
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print min, max, mean and standard deviation of a raster.
    Stats(StatsConfig),

    /// Write a raster as a contrast-stretched grayscale JPEG.
    Export(ExportConfig),

    /// Reduce a raster by block averaging and store it as raw floats.
    Scale(ScaleConfig),

    /// Print the interpolated value of a raster at a real coordinate.
    Sample(SampleConfig),
}

/// Byte order of raw float samples.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderArg {
    Little,
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Little => ByteOrder::LittleEndian,
            ByteOrderArg::Big => ByteOrder::BigEndian,
        }
    }
}

/// Interpolation method for `sample`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    Nearest,
    Bilinear,
    Bicubic,
    Sinc,
}

impl From<MethodArg> for SampleMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Nearest => SampleMethod::NearestNeighbor,
            MethodArg::Bilinear => SampleMethod::Bilinear,
            MethodArg::Bicubic => SampleMethod::Bicubic,
            MethodArg::Sinc => SampleMethod::Sinc,
        }
    }
}

/// Window applied to sinc kernels.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowArg {
    None,
    Kaiser,
    Hamming,
    Lanczos,
}

impl From<WindowArg> for WindowFunction {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::None => WindowFunction::None,
            WindowArg::Kaiser => WindowFunction::Kaiser,
            WindowArg::Hamming => WindowFunction::Hamming,
            WindowArg::Lanczos => WindowFunction::Lanczos,
        }
    }
}

// =============================================================================
// Input Raster
// =============================================================================

/// Location and layout of the input raster.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Raw float file to read.
    pub input: PathBuf,

    /// Raster width in pixels.
    #[arg(long)]
    pub width: usize,

    /// Raster height in pixels.
    #[arg(long)]
    pub height: usize,

    /// Byte offset of the first sample in the file.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Byte order of the samples.
    #[arg(
        long,
        value_enum,
        default_value_t = ByteOrderArg::Little,
        env = "FLOAT_RASTER_BYTE_ORDER"
    )]
    pub byte_order: ByteOrderArg,

    /// Tile cache budget in bytes.
    #[arg(long, default_value_t = DEFAULT_CACHE_SPACE, env = "FLOAT_RASTER_CACHE_SPACE")]
    pub cache_space: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InputArgs {
    /// Validate the input description and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be greater than 0".to_string());
        }

        if self.cache_space as u64 > MAX_CACHE_SPACE {
            return Err(format!("cache_space must be at most {} bytes", MAX_CACHE_SPACE));
        }

        // The cache must hold two tile rows or columns of the largest side
        let largest = self.width.max(self.height);
        if self.cache_space / BYTES_PER_SAMPLE < 2 * largest {
            return Err(format!(
                "cache_space must be at least {} bytes for a {}x{} raster",
                2 * BYTES_PER_SAMPLE * largest,
                self.width,
                self.height
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Subcommand Configuration
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct StatsConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// Estimate from every Nth pixel in each dimension instead of reading
    /// all of them.
    #[arg(long)]
    pub stride: Option<usize>,
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()?;
        if self.stride == Some(0) {
            return Err("stride must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// JPEG file to write.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Largest side of the output image; larger rasters are reduced.
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
    pub max_dimension: usize,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "FLOAT_RASTER_JPEG_QUALITY")]
    pub jpeg_quality: u8,
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()?;

        if self.max_dimension == 0 || self.max_dimension > 65_535 {
            return Err("max_dimension must be between 1 and 65535".to_string());
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        Ok(())
    }

    /// Largest output side actually used: never more than the raster's
    /// own largest side.
    pub fn effective_max_dimension(&self) -> usize {
        self.max_dimension.min(self.input.width.max(self.input.height))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScaleConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// Raw float file to write.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Block size to average; must be odd.
    #[arg(long)]
    pub factor: usize,

    /// Byte order of the output; defaults to the input byte order.
    #[arg(long, value_enum)]
    pub output_byte_order: Option<ByteOrderArg>,
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()?;
        if self.factor % 2 == 0 {
            return Err("factor must be odd and greater than 0".to_string());
        }
        Ok(())
    }

    pub fn output_byte_order(&self) -> ByteOrder {
        self.output_byte_order.unwrap_or(self.input.byte_order).into()
    }
}

#[derive(Args, Debug, Clone)]
pub struct SampleConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// X coordinate in pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub x: f32,

    /// Y coordinate in pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub y: f32,

    /// Interpolation method.
    #[arg(long, value_enum, default_value_t = MethodArg::Bilinear)]
    pub method: MethodArg,

    /// Sinc taps per dimension (sinc method only); must be even.
    #[arg(long, default_value_t = DEFAULT_SINC_POINTS)]
    pub sinc_points: usize,

    /// Sinc window (sinc method only).
    #[arg(long, value_enum, default_value_t = WindowArg::Hamming)]
    pub window: WindowArg,
}

impl SampleConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()?;

        if self.sinc_points == 0 || self.sinc_points % 2 != 0 {
            return Err("sinc_points must be even and greater than 0".to_string());
        }

        let max_x = (self.input.width - 1) as f32;
        let max_y = (self.input.height - 1) as f32;
        let in_range = match self.method {
            // Nearest accepts anything that rounds to a pixel
            MethodArg::Nearest => {
                self.x >= -0.5
                    && self.y >= -0.5
                    && self.x < max_x + 0.5
                    && self.y < max_y + 0.5
            }
            _ => self.x >= 0.0 && self.y >= 0.0 && self.x <= max_x && self.y <= max_y,
        };
        if !in_range {
            return Err(format!(
                "coordinate ({}, {}) is outside the {}x{} raster",
                self.x, self.y, self.input.width, self.input.height
            ));
        }

        Ok(())
    }

    /// True when the shared default sinc table can be used.
    pub fn uses_default_sinc(&self) -> bool {
        self.sinc_points == DEFAULT_SINC_POINTS && self.window == WindowArg::Hamming
    }
}

// =============================================================================
// Tests
// =============================================================================
