use std::f64::consts::PI;

use crate::FilterError;

/// Maximal count of channels that filters can process at once.
pub const MAX_CHANNELS: usize = 4;

/// Scratch buffer of a kernel holds `radius + SCRATCH_EXTRA_PIXELS` pixels.
pub(crate) const SCRATCH_EXTRA_PIXELS: usize = 2;

/// How the generic convolution treats taps that fall outside the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Only taps with real data are accumulated and the result is divided
    /// by the sum of their weights.
    #[default]
    Renormalize,
    /// Missing taps reuse the nearest pixel of the row.
    Clamp,
}

/// One-dimensional convolution kernel with odd count of weights
/// and working memory used by filters.
///
/// The scratch buffer is rewritten by every call of a filter, so filters
/// take the kernel by mutable reference. Clone the kernel to give each
/// worker thread its own copy.
#[derive(Debug, Clone)]
pub struct ConvolutionKernel {
    radius: u32,
    weights: Vec<f32>,
    scratch: Vec<f32>,
    threshold_min_change: f32,
    threshold_max_change: f32,
    edge_mode: EdgeMode,
}

impl ConvolutionKernel {
    /// Creates a kernel with `2 * radius + 1` zero weights.
    pub fn new(radius: u32) -> Result<Self, FilterError> {
        let width = radius as usize * 2 + 1;
        let scratch_size = (radius as usize + SCRATCH_EXTRA_PIXELS) * MAX_CHANNELS;
        let weights = zeroed_vec(width)?;
        let scratch = zeroed_vec(scratch_size)?;
        Ok(Self {
            radius,
            weights,
            scratch,
            threshold_min_change: 0.,
            threshold_max_change: 0.,
            edge_mode: EdgeMode::default(),
        })
    }

    /// Creates a kernel with not normalized weights of Gaussian function.
    pub fn gaussian(sigma: f64, radius: u32) -> Result<Self, FilterError> {
        let mut kernel = Self::new(radius)?;
        for (i, w) in kernel.weights.iter_mut().enumerate() {
            let x = (radius as i64 - i as i64).unsigned_abs() as f64;
            *w = gaussian_pdf(x, sigma) as f32;
        }
        Ok(kernel)
    }

    /// Creates a blurring kernel with Gaussian weights which sum is equal to 1.
    pub fn gaussian_normalized(sigma: f64, radius: u32) -> Result<Self, FilterError> {
        let mut kernel = Self::gaussian(sigma, radius)?;
        kernel.normalize(1.);
        Ok(kernel)
    }

    /// Creates an unsharp kernel equal to `2 * identity - gaussian`
    /// normalized to sum 1.
    pub fn gaussian_sharpen(sigma: f64, radius: u32) -> Result<Self, FilterError> {
        let mut kernel = Self::gaussian(sigma, radius)?;
        let sum = kernel.sum();
        let center = radius as usize;
        for (i, w) in kernel.weights.iter_mut().enumerate() {
            if i == center {
                *w = (2. * sum - *w as f64) as f32;
            } else {
                *w = -*w;
            }
        }
        kernel.normalize(1.);
        Ok(kernel)
    }

    #[inline(always)]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Count of weights, always equal to `2 * radius + 1`.
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.weights.len() as u32
    }

    #[inline(always)]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline(always)]
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    /// Returns sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|&w| w as f64).sum()
    }

    /// Scales weights so that their sum becomes equal to `target_sum`.
    ///
    /// A kernel with zero sum of weights is left unchanged.
    pub fn normalize(&mut self, target_sum: f32) {
        let sum = self.sum();
        if sum == 0. {
            return;
        }
        let factor = (target_sum as f64 / sum) as f32;
        self.weights.iter_mut().for_each(|w| *w *= factor);
    }

    #[inline(always)]
    pub fn threshold_min_change(&self) -> f32 {
        self.threshold_min_change
    }

    #[inline(always)]
    pub fn threshold_max_change(&self) -> f32 {
        self.threshold_max_change
    }

    /// Sets thresholds of the edge-preserving gate of [convolve_rows](crate::convolve_rows).
    ///
    /// A pixel keeps its original value if the sum of absolute changes of its
    /// channels is less than `min_change` or greater than `max_change`.
    /// Zero value disables the corresponding bound.
    pub fn set_thresholds(&mut self, min_change: f32, max_change: f32) {
        self.threshold_min_change = min_change;
        self.threshold_max_change = max_change;
    }

    #[inline(always)]
    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    pub fn set_edge_mode(&mut self, edge_mode: EdgeMode) {
        self.edge_mode = edge_mode;
    }

    #[inline(always)]
    pub(crate) fn scratch_mut(&mut self) -> &mut [f32] {
        &mut self.scratch
    }

    /// Weights and scratch buffer borrowed at the same time.
    #[inline(always)]
    pub(crate) fn split_mut(&mut self) -> (&[f32], &mut [f32]) {
        (&self.weights, &mut self.scratch)
    }
}

fn zeroed_vec(size: usize) -> Result<Vec<f32>, FilterError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(size)
        .map_err(|_| FilterError::OutOfMemory)?;
    vec.resize(size, 0.);
    Ok(vec)
}

/// Density of normal distribution with zero mean.
/// Degenerated distribution (`sigma <= 0`) is an impulse at zero.
#[inline]
fn gaussian_pdf(x: f64, sigma: f64) -> f64 {
    if sigma <= 0. {
        return if x == 0. { 1. } else { 0. };
    }
    (-x * x / (2. * sigma * sigma)).exp() / ((2. * PI).sqrt() * sigma)
}
