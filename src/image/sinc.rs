//! Precomputed windowed-sinc interpolation kernels.
//!
//! Sinc interpolation weights source pixels by a sinc function whose peak
//! sits on the point being interpolated. Rather than evaluate the sinc for
//! every sample, a table of [`NUM_SINCS`] + 1 kernels is built once, each
//! shifted by a fraction `phase / NUM_SINCS` of a pixel, and the kernel
//! closest to the sample's fractional position is looked up.
//!
//! A [`SincTable`] is immutable once built. [`SincTable::shared`] returns a
//! process-wide default table initialized on first use; other point counts
//! or windows are built explicitly and passed by reference.

use std::f64::consts::PI;
use std::sync::OnceLock;

use tracing::debug;

/// Number of fractional shifts per pixel in a sinc table.
pub const NUM_SINCS: usize = 512;

/// Taps per dimension of the shared sinc table.
pub const DEFAULT_SINC_POINTS: usize = 8;

/// Shape parameter of the Kaiser window.
pub const KAISER_ALPHA: f64 = 5.0;

/// Window applied to the sinc function to taper its tails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFunction {
    /// Plain truncated sinc
    None,
    /// Kaiser window with alpha = [`KAISER_ALPHA`]
    Kaiser,
    /// Hamming window
    Hamming,
    /// Lanczos (sinc) window
    Lanczos,
}

impl WindowFunction {
    /// Window weight at normalized distance `t` from the centre, where
    /// `|t| = 1` is the edge of the kernel.
    fn weight(self, t: f64) -> f64 {
        match self {
            WindowFunction::None => 1.0,
            WindowFunction::Kaiser => {
                let r = (1.0 - t * t).max(0.0).sqrt();
                bessel_i0(KAISER_ALPHA * r) / bessel_i0(KAISER_ALPHA)
            }
            WindowFunction::Hamming => 0.54 + 0.46 * (PI * t).cos(),
            WindowFunction::Lanczos => normalized_sinc(t),
        }
    }
}

/// `sin(pi x) / (pi x)`, with the removable singularity at zero filled in.
fn normalized_sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Zeroth order modified Bessel function of the first kind.
fn bessel_i0(x: f64) -> f64 {
    // Power series: sum over k of ((x/2)^k / k!)^2
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-16 {
        term *= (half / k) * (half / k);
        sum += term;
        k += 1.0;
    }
    sum
}

/// Table of phase-shifted, windowed and normalized sinc kernels.
#[derive(Debug, Clone)]
pub struct SincTable {
    points: usize,
    window: WindowFunction,
    /// `(NUM_SINCS + 1) * points` weights, one kernel per phase
    kernels: Vec<f32>,
}

impl SincTable {
    /// Build a table for `points` taps per dimension.
    ///
    /// # Panics
    ///
    /// Panics if `points` is odd or zero.
    pub fn new(points: usize, window: WindowFunction) -> Self {
        assert!(
            points >= 2 && points % 2 == 0,
            "sinc point count must be even and positive, got {}",
            points
        );

        let half_width = (points / 2) as f64;
        let mut kernels = Vec::with_capacity((NUM_SINCS + 1) * points);
        let mut kernel = vec![0.0f64; points];

        for phase in 0..=NUM_SINCS {
            let shift = phase as f64 / NUM_SINCS as f64;

            // Tap j sits at offset j + 1 - points/2 from the pixel left of
            // the sample, i.e. at distance `arg` from the sample itself.
            for (tap, weight) in kernel.iter_mut().enumerate() {
                let arg = tap as f64 - half_width + 1.0 - shift;
                *weight = normalized_sinc(arg) * window.weight(arg / half_width);
            }

            let total: f64 = kernel.iter().sum();
            kernels.extend(kernel.iter().map(|weight| (weight / total) as f32));
        }

        debug!(points, ?window, "Built sinc table");

        Self {
            points,
            window,
            kernels,
        }
    }

    /// Process-wide table with [`DEFAULT_SINC_POINTS`] taps and a Hamming
    /// window, built on first use.
    pub fn shared() -> &'static SincTable {
        static SHARED: OnceLock<SincTable> = OnceLock::new();
        SHARED.get_or_init(|| SincTable::new(DEFAULT_SINC_POINTS, WindowFunction::Hamming))
    }

    /// Taps per dimension.
    pub fn points(&self) -> usize {
        self.points
    }

    pub fn window(&self) -> WindowFunction {
        self.window
    }

    /// Kernel for a sample `fraction` of a pixel past its left neighbour.
    ///
    /// # Panics
    ///
    /// Panics if `fraction` is outside `[0, 1]`.
    #[inline]
    pub fn kernel(&self, fraction: f32) -> &[f32] {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "sinc fraction {} outside [0, 1]",
            fraction
        );
        let phase = (fraction * NUM_SINCS as f32).round() as usize;
        &self.kernels[phase * self.points..(phase + 1) * self.points]
    }
}
