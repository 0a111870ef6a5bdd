use std::num::NonZeroU32;

use super::BufferContainer;
use crate::kernel::MAX_CHANNELS;
use crate::ImageBufferError;

/// Image with pixels stored as interleaved `f32` components.
///
/// Every row holds `width * channels` floats and starts `stride` floats
/// after the previous one. Filters never allocate or free this buffer,
/// they only rewrite rows of it in place.
#[derive(Debug)]
pub struct FloatImage<'a> {
    width: u32,
    height: u32,
    channels: u32,
    stride: usize,
    buffer: BufferContainer<'a, f32>,
}

impl FloatImage<'static> {
    /// Creates zero-filled image with tightly packed rows.
    pub fn new(width: u32, height: u32, channels: u32) -> Result<Self, ImageBufferError> {
        check_channels(channels)?;
        let stride = width as usize * channels as usize;
        let buffer = vec![0.; stride * height as usize];
        Ok(Self {
            width,
            height,
            channels,
            stride,
            buffer: BufferContainer::Owned(buffer),
        })
    }

    pub fn from_vec(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Vec<f32>,
    ) -> Result<Self, ImageBufferError> {
        let stride = width as usize * channels as usize;
        Self::from_vec_with_stride(width, height, channels, stride, buffer)
    }

    /// Creates an image from vector with `stride` floats per row.
    pub fn from_vec_with_stride(
        width: u32,
        height: u32,
        channels: u32,
        stride: usize,
        buffer: Vec<f32>,
    ) -> Result<Self, ImageBufferError> {
        check_buffer(width, height, channels, stride, buffer.len())?;
        Ok(Self {
            width,
            height,
            channels,
            stride,
            buffer: BufferContainer::Owned(buffer),
        })
    }
}

impl<'a> FloatImage<'a> {
    pub fn from_slice(
        width: u32,
        height: u32,
        channels: u32,
        buffer: &'a mut [f32],
    ) -> Result<Self, ImageBufferError> {
        let stride = width as usize * channels as usize;
        Self::from_slice_with_stride(width, height, channels, stride, buffer)
    }

    pub fn from_slice_with_stride(
        width: u32,
        height: u32,
        channels: u32,
        stride: usize,
        buffer: &'a mut [f32],
    ) -> Result<Self, ImageBufferError> {
        check_buffer(width, height, channels, stride, buffer.len())?;
        Ok(Self {
            width,
            height,
            channels,
            stride,
            buffer: BufferContainer::Borrowed(buffer),
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Count of interleaved components of one pixel.
    #[inline(always)]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Distance in floats between starts of two adjacent rows.
    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Count of floats that contains pixels of one row.
    #[inline(always)]
    pub fn row_size(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Buffer with image pixels data.
    #[inline]
    pub fn buffer(&self) -> &[f32] {
        self.buffer.borrow()
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [f32] {
        self.buffer.borrow_mut()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        match self.buffer {
            BufferContainer::Borrowed(slice) => slice.into(),
            BufferContainer::Owned(vec) => vec,
        }
    }

    /// Creates an owned copy of the image.
    pub fn copy(&self) -> FloatImage<'static> {
        FloatImage {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            buffer: BufferContainer::Owned(self.buffer.as_vec()),
        }
    }

    pub fn row(&self, y: u32) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        self.buffer().get(start..start + self.row_size())
    }

    pub fn row_mut(&mut self, y: u32) -> Option<&mut [f32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        let row_size = self.row_size();
        self.buffer_mut().get_mut(start..start + row_size)
    }

    /// Returns components of the pixel with given coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[f32]> {
        if x >= self.width {
            return None;
        }
        let channels = self.channels as usize;
        let start = x as usize * channels;
        self.row(y).map(|row| &row[start..start + channels])
    }

    /// Returns an iterator over `row_count` mutable rows started from `start_row`.
    ///
    /// Every item contains only pixels data, the padding at the end of
    /// row is not included.
    pub fn iter_rows_mut(
        &mut self,
        start_row: u32,
        row_count: u32,
    ) -> impl Iterator<Item = &mut [f32]> {
        let row_size = self.row_size();
        let stride = self.stride.max(1);
        let start = (start_row as usize * self.stride).min(self.buffer().len());
        self.buffer_mut()[start..]
            .chunks_mut(stride)
            .take(row_count as usize)
            .map(move |row| &mut row[..row_size])
    }

    /// Creates a new image where rows of this image become columns.
    ///
    /// Filters of this crate process rows only, so a vertical pass
    /// is applied to the transposed image.
    pub fn transposed(&self) -> FloatImage<'static> {
        let channels = self.channels as usize;
        let dst_width = self.height;
        let dst_height = self.width;
        let dst_stride = dst_width as usize * channels;
        let mut buffer = vec![0.; dst_stride * dst_height as usize];
        let src = self.buffer();
        for y in 0..self.height as usize {
            let src_row = &src[y * self.stride..];
            for x in 0..self.width as usize {
                let dst_start = x * dst_stride + y * channels;
                let src_start = x * channels;
                buffer[dst_start..dst_start + channels]
                    .copy_from_slice(&src_row[src_start..src_start + channels]);
            }
        }
        FloatImage {
            width: dst_width,
            height: dst_height,
            channels: self.channels,
            stride: dst_stride,
            buffer: BufferContainer::Owned(buffer),
        }
    }

    /// Splits the image into `num_parts` bands of adjacent rows.
    ///
    /// Heights of bands differ at most by one row. Returns `None` if
    /// the image has fewer rows than the requested number of parts.
    pub fn split_by_height_mut(&mut self, num_parts: NonZeroU32) -> Option<Vec<FloatImage<'_>>> {
        let num_parts = num_parts.get();
        if num_parts > self.height {
            return None;
        }
        let (width, channels, stride) = (self.width, self.channels, self.stride);
        let mut res = Vec::with_capacity(num_parts as usize);
        let step = self.height / num_parts;
        let mut modulo = self.height % num_parts;
        let mut remains = self.buffer.borrow_mut();
        for part_index in 0..num_parts {
            let mut part_height = step;
            if modulo > 0 {
                part_height += 1;
                modulo -= 1;
            }
            let part_len = if part_index + 1 == num_parts {
                remains.len()
            } else {
                (part_height as usize * stride).min(remains.len())
            };
            let (part, rest) = remains.split_at_mut(part_len);
            remains = rest;
            let image =
                FloatImage::from_slice_with_stride(width, part_height, channels, stride, part)
                    .ok()?;
            res.push(image);
        }
        Some(res)
    }
}

fn check_channels(channels: u32) -> Result<(), ImageBufferError> {
    if channels == 0 || channels as usize > MAX_CHANNELS {
        return Err(ImageBufferError::InvalidChannelsCount);
    }
    Ok(())
}

fn check_buffer(
    width: u32,
    height: u32,
    channels: u32,
    stride: usize,
    buffer_len: usize,
) -> Result<(), ImageBufferError> {
    check_channels(channels)?;
    let row_size = width as usize * channels as usize;
    if stride < row_size {
        return Err(ImageBufferError::InvalidStride);
    }
    let size = match height {
        0 => 0,
        h => (h as usize - 1) * stride + row_size,
    };
    if buffer_len < size {
        return Err(ImageBufferError::InvalidBufferSize);
    }
    Ok(())
}
