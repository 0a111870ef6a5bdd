use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb32FImage, Rgba32FImage};

use crate::images::FloatImage;
use crate::ImageBufferError;

impl FloatImage<'static> {
    /// Converts image into float pixels with components in range `0.0..=1.0`.
    ///
    /// Color images get 3 or 4 channels (with alpha), grayscale images
    /// get 1 or 2 channels.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self, ImageBufferError> {
        let width = image.width();
        let height = image.height();
        let color = image.color();
        let (channels, buffer) = match (color.has_color(), color.has_alpha()) {
            (true, true) => (4, image.to_rgba32f().into_raw()),
            (true, false) => (3, image.to_rgb32f().into_raw()),
            (false, true) => (2, image.to_luma_alpha32f().into_raw()),
            (false, false) => (1, image.to_luma32f().into_raw()),
        };
        Self::from_vec(width, height, channels, buffer)
    }
}

impl FloatImage<'_> {
    /// Converts float pixels into image of `image` crate.
    ///
    /// Images with 3 or 4 channels become `Rgb32F` or `Rgba32F` images.
    /// Grayscale images are stored with 16-bit components because
    /// `DynamicImage` has no float grayscale variant.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage, ImageBufferError> {
        let (width, height) = (self.width(), self.height());
        let pixels = self.packed_pixels();
        let image = match self.channels() {
            1 => ImageBuffer::<Luma<u16>, _>::from_raw(width, height, to_u16(&pixels))
                .map(DynamicImage::ImageLuma16),
            2 => ImageBuffer::<LumaA<u16>, _>::from_raw(width, height, to_u16(&pixels))
                .map(DynamicImage::ImageLumaA16),
            3 => Rgb32FImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb32F),
            _ => Rgba32FImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba32F),
        };
        image.ok_or(ImageBufferError::InvalidBufferSize)
    }

    /// Pixels of all rows without padding.
    fn packed_pixels(&self) -> Vec<f32> {
        let row_size = self.row_size();
        let mut res = Vec::with_capacity(row_size * self.height() as usize);
        for y in 0..self.height() {
            if let Some(row) = self.row(y) {
                res.extend_from_slice(row);
            }
        }
        res
    }
}

fn to_u16(pixels: &[f32]) -> Vec<u16> {
    pixels
        .iter()
        .map(|&v| (v.clamp(0., 1.) * u16::MAX as f32).round() as u16)
        .collect()
}
