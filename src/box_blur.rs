use crate::kernel::MAX_CHANNELS;
use crate::rows::{checked_channels, checked_row_count, WriteBackRing};
use crate::{ConvolutionKernel, FilterError, FloatImage, InvalidStateReason};

/// Blurs rows of image in place by moving average with window of
/// `2 * radius + 1` pixels, `passes` times in a row.
///
/// Near the edges of a row the window shrinks to pixels that exist,
/// the average is taken over them only.
///
/// Only the scratch buffer of the kernel is used, its weights are ignored.
/// The scratch buffer must hold `radius + 1` pixels.
pub fn boxblur_rows(
    image: &mut FloatImage,
    radius: u32,
    passes: u32,
    active_channels: u32,
    kernel: &mut ConvolutionKernel,
    from_row: u32,
    row_count: Option<u32>,
) -> Result<(), FilterError> {
    let ch_used = checked_channels(image, active_channels)?;
    let row_count = checked_row_count(image, from_row, row_count)?;

    let buffer_count = radius as usize + 1;
    let mut ring = WriteBackRing::new(kernel.scratch_mut(), buffer_count, ch_used)?;

    let width = image.width() as usize;
    let step = image.channels() as usize;
    let radius = radius as usize;
    let std_count = radius * 2 + 1;
    let std_factor = 1. / std_count as f32;

    for row in image.iter_rows_mut(from_row, row_count) {
        for _ in 0..passes {
            let mut sum = [0f32; MAX_CHANNELS];
            let sum = &mut sum[..ch_used];
            let mut count = 0usize;

            for x in 0..radius.min(width) {
                add_pixel(sum, row, x, step, 1.);
                count += 1;
            }

            for ndx in 0..width + buffer_count {
                if ndx >= buffer_count {
                    let position = ndx - buffer_count;
                    if ndx < width {
                        // Remove trailing pixel before it is overwritten
                        add_pixel(sum, row, position, step, -1.);
                        count -= 1;
                    }
                    ring.flush(position, row, position, step);
                }
                if ndx < width {
                    if ndx + radius < width {
                        add_pixel(sum, row, ndx + radius, step, 1.);
                        count += 1;
                    }
                    let slot = ring.slot_mut(ndx);
                    if count == std_count {
                        for (dst, &s) in slot.iter_mut().zip(sum.iter()) {
                            *dst = s * std_factor;
                        }
                    } else {
                        let count = count as f32;
                        for (dst, &s) in slot.iter_mut().zip(sum.iter()) {
                            *dst = s / count;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Blurs rows of image in place by moving average with window of even
/// size `2 * radius`.
///
/// The window is centered on a pixel and covers its `radius - 1` neighbours
/// on each side with full weight and the two outermost pixels with half
/// weight. Near the edges of a row the window shrinks to pixels that exist.
///
/// `align` selects the end of row the pass starts from: `-1` sweeps from
/// the left end to the right, `1` from the right end to the left. Filtered
/// pixels are written back with a delay of `radius + 2` positions along the
/// sweep. The window is symmetric, so both directions give the same values
/// up to rounding and pixels never move along the row. A pass with
/// `align = 1` over a mirrored row is the mirror of a pass with
/// `align = -1`.
///
/// `align` must be `-1` or `1`. The scratch buffer of the kernel must hold
/// `radius + 2` pixels. Zero radius leaves the image unchanged.
pub fn boxblur_misaligned_rows(
    image: &mut FloatImage,
    radius: u32,
    align: i32,
    active_channels: u32,
    kernel: &mut ConvolutionKernel,
    from_row: u32,
    row_count: Option<u32>,
) -> Result<(), FilterError> {
    if align != 1 && align != -1 {
        log::warn!("Alignment of misaligned box blur must be -1 or 1, got {}", align);
        return Err(InvalidStateReason::InvalidAlign(align).into());
    }
    let ch_used = checked_channels(image, active_channels)?;
    let row_count = checked_row_count(image, from_row, row_count)?;
    if radius == 0 {
        log::debug!("Skip misaligned box blur with zero radius");
        return Ok(());
    }

    let buffer_count = radius as usize + 2;
    let mut ring = WriteBackRing::new(kernel.scratch_mut(), buffer_count, ch_used)?;

    let width = image.width() as usize;
    let step = image.channels() as usize;
    let radius = radius as usize;
    // Maps position along the sweep to index of pixel in the row.
    let pixel = |position: usize| {
        if align < 0 {
            position
        } else {
            width - 1 - position
        }
    };

    for row in image.iter_rows_mut(from_row, row_count) {
        let mut sum = [0f32; MAX_CHANNELS];
        let sum = &mut sum[..ch_used];
        let mut count = 0f32;

        for x in 0..radius.min(width) {
            let factor = if x == radius - 1 { 0.5 } else { 1. };
            add_pixel(sum, row, pixel(x), step, factor);
            count += factor;
        }

        for ndx in 0..width + buffer_count {
            if ndx < width {
                // Each pixel enters and leaves the window by two halves.
                if ndx + radius < width {
                    add_pixel(sum, row, pixel(ndx + radius), step, 0.5);
                    count += 0.5;
                }
                if ndx + radius - 1 < width {
                    add_pixel(sum, row, pixel(ndx + radius - 1), step, 0.5);
                    count += 0.5;
                }
                if ndx >= radius {
                    add_pixel(sum, row, pixel(ndx - radius), step, -0.5);
                    count -= 0.5;
                }
                if ndx > radius {
                    add_pixel(sum, row, pixel(ndx - radius - 1), step, -0.5);
                    count -= 0.5;
                }
            }
            if ndx >= buffer_count {
                let position = ndx - buffer_count;
                ring.flush(position, row, pixel(position), step);
            }
            if ndx < width {
                for (dst, &s) in ring.slot_mut(ndx).iter_mut().zip(sum.iter()) {
                    *dst = s / count;
                }
            }
        }
    }
    Ok(())
}

#[inline(always)]
fn add_pixel(sum: &mut [f32], row: &[f32], x: usize, step: usize, factor: f32) {
    let pixel = &row[x * step..];
    for (s, &v) in sum.iter_mut().zip(pixel) {
        *s += v * factor;
    }
}
