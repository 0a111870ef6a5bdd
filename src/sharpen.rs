use crate::rows::checked_row_count;
use crate::{FilterError, FloatImage, InvalidStateReason};

/// Sharpens `row_count` rows started from `start_row` in place with
/// 3-tap horizontal unsharp operator.
///
/// `pct` is expected to be in range `0.0..1.0`, zero value leaves
/// the image unchanged. All channels of pixels are sharpened, including
/// alpha. The first and the last pixels of a row are not changed.
///
/// Rows range is checked before any pixel is changed.
pub fn sharpen_rows(
    image: &mut FloatImage,
    start_row: u32,
    row_count: u32,
    pct: f64,
) -> Result<(), FilterError> {
    checked_row_count(image, start_row, Some(row_count))?;

    let n = (-pct / (pct - 1.)) as f32;
    if !n.is_finite() {
        log::warn!("Can't sharpen image with percent {}", pct);
        return Err(InvalidStateReason::InvalidSharpenPercent.into());
    }
    let coeffs = Coeffs {
        outer: n / -2.,
        inner: n + 1.,
    };

    let channels = image.channels();
    let rows = image.iter_rows_mut(start_row, row_count);
    match channels {
        1 => rows.for_each(|row| sharpen_row::<1>(row, coeffs)),
        2 => rows.for_each(|row| sharpen_row::<2>(row, coeffs)),
        3 => rows.for_each(|row| sharpen_row::<3>(row, coeffs)),
        _ => rows.for_each(|row| sharpen_row::<4>(row, coeffs)),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Coeffs {
    outer: f32,
    inner: f32,
}

/// Every pixel is combined with the original (not yet sharpened) value of
/// its left neighbour, which is carried in `left`.
#[inline(always)]
fn sharpen_row<const CN: usize>(row: &mut [f32], coeffs: Coeffs) {
    let width = row.len() / CN;
    if width < 3 {
        return;
    }
    let mut left = [0f32; CN];
    left.copy_from_slice(&row[..CN]);
    for ndx in 1..width - 1 {
        let (head, tail) = row.split_at_mut((ndx + 1) * CN);
        let current = &mut head[ndx * CN..];
        let right = &tail[..CN];
        for c in 0..CN {
            let value = current[c];
            current[c] = left[c] * coeffs.outer + value * coeffs.inner + right[c] * coeffs.outer;
            left[c] = value;
        }
    }
}
