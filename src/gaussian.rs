use crate::rows::checked_row_count;
use crate::{
    boxblur_misaligned_rows, boxblur_rows, ConvolutionKernel, FilterError, FloatImage,
    InvalidStateReason,
};

/// `3 * sqrt(2 * PI) / 4`
const BOX_DIAMETER_FACTOR: f64 = 1.879_971_205_973_250_3;

/// Returns diameter of box blur that being applied three times
/// approximates Gaussian blur with given `sigma`.
///
/// The diameter never exceeds half of the image width.
pub fn box_blur_diameter(sigma: f32, image_width: u32) -> u32 {
    let d = (BOX_DIAMETER_FACTOR * sigma as f64 + 0.5).floor();
    let d = if d > 0. { d as u32 } else { 0 };
    d.min(image_width.saturating_sub(1) / 2)
}

/// Approximates Gaussian blur of rows with three successive box blurs.
///
/// If the box diameter `d` is odd, three box blurs of size `d` centered
/// on the output pixel are used, they differ from the true Gaussian by
/// 3.5-5.5% of its peak. Otherwise, two half-weighted box blurs of
/// size `d` (see [`boxblur_misaligned_rows`]) are followed by one box blur
/// of size `d + 1`. This cascade is wider than the Gaussian: the error is
/// about 27% of peak for `d = 2`, 15% for `d = 4`, 12% for `d = 6` and
/// about 3% from `d = 8` on.
///
/// The kernel is used for its scratch buffer only, its radius must be
/// at least `(d + 1) / 2`.
pub fn approx_gaussian_blur_rows(
    image: &mut FloatImage,
    sigma: f32,
    kernel: &mut ConvolutionKernel,
    from_row: u32,
    row_count: Option<u32>,
) -> Result<(), FilterError> {
    let d = box_blur_diameter(sigma, image.width());
    let max_radius = (d + 1) / 2;
    if max_radius > kernel.radius() {
        log::warn!(
            "Kernel radius {} is too small to blur with sigma {} (box diameter {})",
            kernel.radius(),
            sigma,
            d
        );
        return Err(InvalidStateReason::KernelRadiusTooSmall {
            required: max_radius,
            available: kernel.radius(),
        }
        .into());
    }
    checked_row_count(image, from_row, row_count)?;
    if d == 0 {
        log::debug!("Skip Gaussian blur with sigma {}: box diameter is zero", sigma);
        return Ok(());
    }

    let channels = image.channels();
    if d % 2 == 1 {
        log::debug!("Gaussian blur with sigma {}: 3 box blurs of size {}", sigma, d);
        boxblur_rows(image, d / 2, 3, channels, kernel, from_row, row_count)?;
    } else {
        log::debug!(
            "Gaussian blur with sigma {}: 2 misaligned box blurs of size {} and one of size {}",
            sigma,
            d,
            d + 1
        );
        boxblur_misaligned_rows(image, max_radius, -1, channels, kernel, from_row, row_count)?;
        boxblur_misaligned_rows(image, max_radius, 1, channels, kernel, from_row, row_count)?;
        boxblur_rows(image, max_radius, 1, channels, kernel, from_row, row_count)?;
    }
    Ok(())
}
