//! Helpers shared by the in-place row filters.
use crate::kernel::{MAX_CHANNELS, SCRATCH_EXTRA_PIXELS};
use crate::{FilterError, FloatImage, InvalidStateReason};

/// Returns count of rows in range started from `from_row`.
/// `None` means "up to the end of image".
pub(crate) fn checked_row_count(
    image: &FloatImage,
    from_row: u32,
    row_count: Option<u32>,
) -> Result<u32, FilterError> {
    let height = image.height();
    let count = match row_count {
        None => height.checked_sub(from_row),
        Some(count) => from_row
            .checked_add(count)
            .filter(|&until_row| until_row <= height)
            .map(|_| count),
    };
    count.ok_or_else(|| {
        log::warn!(
            "Rows range (from {}, count {:?}) is out of image with height {}",
            from_row,
            row_count,
            height
        );
        InvalidStateReason::RowsOutOfRange {
            from_row,
            row_count: row_count.unwrap_or(0),
            height,
        }
        .into()
    })
}

/// Checks that the first `active` channels of image may be processed.
pub(crate) fn checked_channels(image: &FloatImage, active: u32) -> Result<usize, FilterError> {
    let available = image.channels();
    if active == 0 || active > available || active as usize > MAX_CHANNELS {
        log::warn!(
            "Can't filter {} channels of image with {} channels",
            active,
            available
        );
        return Err(InvalidStateReason::InvalidChannelsCount { active, available }.into());
    }
    Ok(active as usize)
}

/// Fixed count of slots with filtered pixels waiting to be written back
/// into the row they were computed from.
///
/// Slot of a pixel is chosen by its position modulo count of slots, so
/// the value of a pixel is alive until a pixel placed `len` positions
/// later is enqueued.
pub(crate) struct WriteBackRing<'a> {
    slots: &'a mut [f32],
    channels: usize,
    len: usize,
}

impl<'a> WriteBackRing<'a> {
    /// Takes `len` slots by `channels` floats from the scratch buffer
    /// of a kernel.
    ///
    /// If the scratch buffer is too small, the error holds the least
    /// radius of kernel whose scratch buffer would be enough.
    pub fn new(
        scratch: &'a mut [f32],
        len: usize,
        channels: usize,
    ) -> Result<Self, InvalidStateReason> {
        let size = len * channels;
        if scratch.len() < size {
            let required = scratch_radius(size);
            let available = scratch_radius(scratch.len());
            log::warn!(
                "Scratch buffer of kernel with radius {} can't hold {} pixels, radius {} is required",
                available,
                len,
                required
            );
            return Err(InvalidStateReason::KernelRadiusTooSmall {
                required,
                available,
            });
        }
        Ok(Self {
            slots: &mut scratch[..size],
            channels,
            len,
        })
    }

    #[inline(always)]
    pub fn slot(&self, position: usize) -> &[f32] {
        let start = (position % self.len) * self.channels;
        &self.slots[start..start + self.channels]
    }

    #[inline(always)]
    pub fn slot_mut(&mut self, position: usize) -> &mut [f32] {
        let start = (position % self.len) * self.channels;
        &mut self.slots[start..start + self.channels]
    }

    /// Copies the value enqueued for `position` into the pixel of row.
    #[inline(always)]
    pub fn flush(&self, position: usize, row: &mut [f32], dst_pixel: usize, step: usize) {
        let start = dst_pixel * step;
        row[start..start + self.channels].copy_from_slice(self.slot(position));
    }
}

/// Radius of the smallest kernel whose scratch buffer holds `size` floats.
fn scratch_radius(size: usize) -> u32 {
    let pixels = size.div_ceil(MAX_CHANNELS);
    pixels.saturating_sub(SCRATCH_EXTRA_PIXELS) as u32
}
