//! Float Raster - inspect and convert large raw float rasters.
//!
//! This binary parses the command line, loads the input raster through the
//! tile cache and runs one subcommand.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use float_raster::{
    config::{
        Cli, Command, ExportConfig, InputArgs, MethodArg, SampleConfig, ScaleConfig, StatsConfig,
    },
    FloatImage, ImageError, SincTable,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Stats(config) => run_stats(config),
        Command::Export(config) => run_export(config),
        Command::Scale(config) => run_scale(config),
        Command::Sample(config) => run_sample(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "float_raster=debug"
    } else {
        "float_raster=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load the input raster described by `input`.
fn load(input: &InputArgs) -> Result<FloatImage, ImageError> {
    info!(
        "Loading {} ({}x{}, offset {}, {:?})",
        input.input.display(),
        input.width,
        input.height,
        input.offset,
        input.byte_order
    );

    let image = FloatImage::new_from_file_with_cache_space(
        input.width,
        input.height,
        &input.input,
        input.offset,
        input.byte_order.into(),
        input.cache_space,
    )?;

    debug!(
        tile_size = image.tile_geometry().tile_size(),
        cache_tiles = image.tile_geometry().cache_size_in_tiles(),
        "Tile cache ready"
    );
    Ok(image)
}

/// Shared prologue: logging, validation and loading.
fn prepare(input: &InputArgs, validation: Result<(), String>) -> Option<FloatImage> {
    init_logging(input.verbose);

    if let Err(e) = validation {
        error!("Configuration error: {}", e);
        return None;
    }

    match load(input) {
        Ok(image) => Some(image),
        Err(e) => {
            error!("Failed to load raster: {}", e);
            None
        }
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn run_stats(config: StatsConfig) -> ExitCode {
    let Some(mut image) = prepare(&config.input, config.validate()) else {
        return ExitCode::FAILURE;
    };

    match config.stride {
        Some(stride) => match image.approximate_statistics(stride) {
            Ok(stats) => {
                println!("stride: {}", stride);
                println!("mean: {}", stats.mean);
                println!("standard deviation: {}", stats.standard_deviation);
            }
            Err(e) => {
                error!("Failed to compute statistics: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => match image.statistics() {
            Ok(stats) => {
                println!("min: {}", stats.min);
                println!("max: {}", stats.max);
                println!("mean: {}", stats.mean);
                println!("standard deviation: {}", stats.standard_deviation);
            }
            Err(e) => {
                error!("Failed to compute statistics: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    debug!(stats = ?image.cache_stats(), "Cache counters");
    ExitCode::SUCCESS
}

// =============================================================================
// Export Command
// =============================================================================

fn run_export(config: ExportConfig) -> ExitCode {
    let Some(mut image) = prepare(&config.input, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let max_dimension = config.effective_max_dimension();
    if let Err(e) =
        image.export_as_jpeg_with_quality(&config.output, max_dimension, config.jpeg_quality)
    {
        error!("Failed to export {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    info!("Wrote {}", config.output.display());
    ExitCode::SUCCESS
}

// =============================================================================
// Scale Command
// =============================================================================

fn run_scale(config: ScaleConfig) -> ExitCode {
    let Some(mut image) = prepare(&config.input, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let output_byte_order = config.output_byte_order();
    let result = FloatImage::new_from_model_scaled(&mut image, config.factor)
        .and_then(|mut scaled| scaled.store(&config.output, output_byte_order).map(|_| scaled));

    match result {
        Ok(scaled) => {
            info!(
                "Wrote {} ({}x{}, {:?})",
                config.output.display(),
                scaled.size_x(),
                scaled.size_y(),
                output_byte_order
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to scale raster: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Sample Command
// =============================================================================

fn run_sample(config: SampleConfig) -> ExitCode {
    let Some(mut image) = prepare(&config.input, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let result = if config.method == MethodArg::Sinc && !config.uses_default_sinc() {
        let table = SincTable::new(config.sinc_points, config.window.into());
        image.sample_sinc(config.x, config.y, &table)
    } else {
        image.sample(config.x, config.y, config.method.into())
    };

    match result {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to sample raster: {}", e);
            ExitCode::FAILURE
        }
    }
}
