use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBufferError {
    #[error("Size of buffer is smaller than required")]
    InvalidBufferSize,
    #[error("Stride is smaller than the size of one row")]
    InvalidStride,
    #[error("Count of channels must be in range 1..=4")]
    InvalidChannelsCount,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    #[error("Failed to allocate memory for the convolution kernel")]
    OutOfMemory,
    #[error("Invalid internal state: {0}")]
    InvalidInternalState(InvalidStateReason),
}

/// Precondition that was violated by a call of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidStateReason {
    /// Alignment of misaligned box blur must be `-1` or `1`.
    InvalidAlign(i32),
    /// Scratch buffer of the kernel is too small for the requested radius.
    KernelRadiusTooSmall { required: u32, available: u32 },
    RowsOutOfRange {
        from_row: u32,
        row_count: u32,
        height: u32,
    },
    InvalidChannelsCount { active: u32, available: u32 },
    /// Sharpening percent gives infinite coefficients.
    InvalidSharpenPercent,
}

impl fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidAlign(align) => {
                write!(f, "alignment must be -1 or 1, got {align}")
            }
            Self::KernelRadiusTooSmall {
                required,
                available,
            } => write!(
                f,
                "kernel radius {available} is smaller than required radius {required}"
            ),
            Self::RowsOutOfRange {
                from_row,
                row_count,
                height,
            } => write!(
                f,
                "rows {from_row}..{} are out of image with height {height}",
                from_row as u64 + row_count as u64
            ),
            Self::InvalidChannelsCount { active, available } => write!(
                f,
                "can't filter {active} channels of image with {available} channels"
            ),
            Self::InvalidSharpenPercent => write!(f, "sharpening percent must not be equal to 1"),
        }
    }
}

impl From<InvalidStateReason> for FilterError {
    fn from(reason: InvalidStateReason) -> Self {
        FilterError::InvalidInternalState(reason)
    }
}
