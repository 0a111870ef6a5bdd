use crate::kernel::MAX_CHANNELS;
use crate::rows::{checked_channels, checked_row_count, WriteBackRing};
use crate::{ConvolutionKernel, EdgeMode, FilterError, FloatImage};

/// Convolves rows of image with weights of the kernel in place.
///
/// Only the first `active_channels` channels of every pixel are changed.
/// `row_count` equal to `None` means "all rows from `from_row` up to the
/// end of image".
///
/// Filtered pixels are written back with a delay of `radius + 1` positions
/// through a ring in the kernel's scratch buffer, so the source pixels are
/// still intact when later pixels need them.
///
/// Image narrower than `radius + 1` pixels is left unchanged.
pub fn convolve_rows(
    image: &mut FloatImage,
    kernel: &mut ConvolutionKernel,
    active_channels: u32,
    from_row: u32,
    row_count: Option<u32>,
) -> Result<(), FilterError> {
    let ch_used = checked_channels(image, active_channels)?;
    let row_count = checked_row_count(image, from_row, row_count)?;

    let radius = kernel.radius() as usize;
    let width = image.width() as usize;
    if width < radius + 1 {
        log::debug!(
            "Skip convolution: image width {} is less than half of kernel width {}",
            width,
            kernel.width()
        );
        return Ok(());
    }

    let gate = ChangeGate {
        min: kernel.threshold_min_change(),
        max: kernel.threshold_max_change(),
    };
    let edge_mode = kernel.edge_mode();
    let step = image.channels() as usize;
    let buffer_count = radius + 1;

    let (weights, scratch) = kernel.split_mut();
    let mut ring = WriteBackRing::new(scratch, buffer_count, ch_used)?;

    for row in image.iter_rows_mut(from_row, row_count) {
        for ndx in 0..width + buffer_count {
            if ndx >= buffer_count {
                let position = ndx - buffer_count;
                ring.flush(position, row, position, step);
            }
            if ndx < width {
                let mut avg = [0f32; MAX_CHANNELS];
                let avg = &mut avg[..ch_used];
                let window = Window {
                    row,
                    width,
                    step,
                    center: ndx,
                    radius,
                };
                window.convolve(weights, edge_mode, avg);

                let original = &row[ndx * step..ndx * step + ch_used];
                let slot = ring.slot_mut(ndx);
                if gate.rejects(original, avg) {
                    slot.copy_from_slice(original);
                } else {
                    slot.copy_from_slice(avg);
                }
            }
        }
    }
    Ok(())
}

struct Window<'a> {
    row: &'a [f32],
    width: usize,
    step: usize,
    center: usize,
    radius: usize,
}

impl Window<'_> {
    #[inline(always)]
    fn pixel(&self, x: usize, channels: usize) -> &[f32] {
        &self.row[x * self.step..x * self.step + channels]
    }

    fn convolve(&self, weights: &[f32], edge_mode: EdgeMode, avg: &mut [f32]) {
        let channels = avg.len();
        let left = self.center as isize - self.radius as isize;
        let inside = left >= 0 && self.center + self.radius < self.width;
        if inside {
            let left = left as usize;
            for (k, &weight) in weights.iter().enumerate() {
                accumulate(avg, weight, self.pixel(left + k, channels));
            }
            return;
        }

        let last = self.width as isize - 1;
        match edge_mode {
            EdgeMode::Renormalize => {
                let mut total_weight = 0f32;
                for (k, &weight) in weights.iter().enumerate() {
                    let x = left + k as isize;
                    if x < 0 || x > last {
                        continue;
                    }
                    total_weight += weight;
                    accumulate(avg, weight, self.pixel(x as usize, channels));
                }
                if total_weight != 0. {
                    avg.iter_mut().for_each(|v| *v /= total_weight);
                } else {
                    avg.copy_from_slice(self.pixel(self.center, channels));
                }
            }
            EdgeMode::Clamp => {
                for (k, &weight) in weights.iter().enumerate() {
                    let x = (left + k as isize).clamp(0, last) as usize;
                    accumulate(avg, weight, self.pixel(x, channels));
                }
            }
        }
    }
}

#[inline(always)]
fn accumulate(avg: &mut [f32], weight: f32, pixel: &[f32]) {
    for (a, &v) in avg.iter_mut().zip(pixel) {
        *a += weight * v;
    }
}

/// Edge-preserving gate: keeps the original pixel if the filter changed it
/// too little or too much. Zero threshold disables its bound.
#[derive(Debug, Clone, Copy)]
struct ChangeGate {
    min: f32,
    max: f32,
}

impl ChangeGate {
    #[inline(always)]
    fn rejects(&self, original: &[f32], filtered: &[f32]) -> bool {
        if self.min <= 0. && self.max <= 0. {
            return false;
        }
        let change: f32 = original
            .iter()
            .zip(filtered)
            .map(|(&o, &f)| (o - f).abs())
            .sum();
        (self.min > 0. && change < self.min) || (self.max > 0. && change > self.max)
    }
}
