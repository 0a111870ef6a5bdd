#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use box_blur::{boxblur_misaligned_rows, boxblur_rows};
pub use convolution::convolve_rows;
pub use errors::*;
pub use gaussian::{approx_gaussian_blur_rows, box_blur_diameter};
pub use images::FloatImage;
pub use kernel::{ConvolutionKernel, EdgeMode, MAX_CHANNELS};
pub use sharpen::sharpen_rows;
#[cfg(feature = "rayon")]
pub use threading::{par_approx_gaussian_blur, par_boxblur, par_convolve, par_sharpen};

mod box_blur;
mod convolution;
mod errors;
mod gaussian;
pub mod images;
mod kernel;
mod rows;
mod sharpen;
#[cfg(feature = "rayon")]
mod threading;
