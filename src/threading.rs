//! Parallel versions of filters.
//!
//! An image is split into bands of adjacent rows and every band is
//! processed in `rayon` thread pool. Each band gets its own copy of
//! the kernel because the scratch buffer of a kernel can't be shared.
use std::num::NonZeroU32;

use rayon::current_num_threads;
use rayon::prelude::*;

use crate::{
    approx_gaussian_blur_rows, boxblur_rows, convolve_rows, sharpen_rows, ConvolutionKernel,
    FilterError, FloatImage,
};

#[inline]
pub(crate) fn split_h_for_threading<'a>(
    image: &'a mut FloatImage,
) -> Option<Vec<FloatImage<'a>>> {
    let max_num_parts = calculate_max_h_parts_number(image.width(), image.height());
    let num_threads = current_num_threads() as u32;
    if num_threads > 1 && max_num_parts > 1 {
        let num_parts = NonZeroU32::new(num_threads.min(max_num_parts))?;
        return image.split_by_height_mut(num_parts);
    }
    None
}

/// It is not optimal to split images on too small parts.
/// We have to calculate minimal height of one part.
/// For small images, it is equal to `constant / area`.
/// For tall images, it is equal to `height / 256`.
fn calculate_max_h_parts_number(width: u32, height: u32) -> u32 {
    if width == 0 || height == 0 {
        return 1;
    }
    let area = height as u64 * height.max(width) as u64;
    let min_height = ((1u64 << 14) / area).max(height as u64 / 256);
    (height as u64 / min_height.max(1)) as u32
}

fn for_each_band<F>(
    image: &mut FloatImage,
    kernel: &mut ConvolutionKernel,
    filter: F,
) -> Result<(), FilterError>
where
    F: Fn(&mut FloatImage, &mut ConvolutionKernel) -> Result<(), FilterError> + Sync,
{
    let template: &ConvolutionKernel = kernel;
    if let Some(mut parts) = split_h_for_threading(image) {
        log::debug!("Filter image by {} bands of rows", parts.len());
        return parts.par_iter_mut().try_for_each(|part| {
            let mut band_kernel = template.clone();
            filter(part, &mut band_kernel)
        });
    }
    filter(image, kernel)
}

/// Parallel version of [convolve_rows] that processes all rows of image.
pub fn par_convolve(
    image: &mut FloatImage,
    kernel: &mut ConvolutionKernel,
    active_channels: u32,
) -> Result<(), FilterError> {
    for_each_band(image, kernel, |band, kernel| {
        convolve_rows(band, kernel, active_channels, 0, None)
    })
}

/// Parallel version of [boxblur_rows] that processes all rows of image.
pub fn par_boxblur(
    image: &mut FloatImage,
    radius: u32,
    passes: u32,
    active_channels: u32,
    kernel: &mut ConvolutionKernel,
) -> Result<(), FilterError> {
    for_each_band(image, kernel, |band, kernel| {
        boxblur_rows(band, radius, passes, active_channels, kernel, 0, None)
    })
}

/// Parallel version of [approx_gaussian_blur_rows] that processes all rows of image.
pub fn par_approx_gaussian_blur(
    image: &mut FloatImage,
    sigma: f32,
    kernel: &mut ConvolutionKernel,
) -> Result<(), FilterError> {
    for_each_band(image, kernel, |band, kernel| {
        approx_gaussian_blur_rows(band, sigma, kernel, 0, None)
    })
}

/// Parallel version of [sharpen_rows] that processes all rows of image.
pub fn par_sharpen(image: &mut FloatImage, pct: f64) -> Result<(), FilterError> {
    if let Some(mut parts) = split_h_for_threading(image) {
        return parts.par_iter_mut().try_for_each(|part| {
            let height = part.height();
            sharpen_rows(part, 0, height, pct)
        });
    }
    let height = image.height();
    sharpen_rows(image, 0, height, pct)
}
