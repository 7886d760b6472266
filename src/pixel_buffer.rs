/*
    bitmap

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/pixel_buffer.rs

    Defines PixelBuffer, the owned storage behind every image, and RawView,
    a borrow-scoped window over that storage.

    Pixels are stored top-down, row-major, with R, G and B interleaved and no
    row padding. Conversion to the padded, bottom-up, BGR layout of a BMP file
    happens in the codec.

*/
use crate::{pixel::Pixel, Axis, BitmapError, Dimension};
use bytemuck::{cast_slice, cast_slice_mut};
use std::{
    fmt::{self, Debug, Formatter},
    ops::{Deref, DerefMut},
};

/// The number of bytes each pixel occupies in a [PixelBuffer]. Only 24-bit RGB is supported.
pub const BYTES_PER_PIXEL: u8 = 3;

/// Return the storage size in bytes for an image of the given dimensions, or None if it would
/// not fit in memory.
fn storage_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL as usize)
}

#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    storage: Vec<u8>,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        PixelBuffer {
            width: 0,
            height: 0,
            storage: Vec::new(),
        }
    }
}

impl Debug for PixelBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.storage.len())
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Create a zero-filled (black) buffer of the specified dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, BitmapError> {
        let len = Self::checked_len(width, height)?;
        Ok(PixelBuffer {
            width,
            height,
            storage: vec![0; len],
        })
    }

    /// Wrap an existing byte vector of RGB triples. The vector must hold exactly
    /// `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, storage: Vec<u8>) -> Result<Self, BitmapError> {
        let len = Self::checked_len(width, height)?;
        if storage.len() != len {
            log::error!(
                "PixelBuffer::from_raw(): {}x{} requires {} bytes, got {}",
                width,
                height,
                len,
                storage.len()
            );
            return Err(BitmapError::InvalidDimension {
                dimension: Dimension::Length,
                value: storage.len() as i64,
            });
        }
        Ok(PixelBuffer { width, height, storage })
    }

    fn checked_len(width: u32, height: u32) -> Result<usize, BitmapError> {
        storage_len(width, height).ok_or_else(|| {
            log::error!("PixelBuffer: {}x{} is too large to allocate", width, height);
            // The larger of the two pushed the product over.
            if width >= height {
                BitmapError::InvalidDimension {
                    dimension: Dimension::Width,
                    value: width as i64,
                }
            }
            else {
                BitmapError::InvalidDimension {
                    dimension: Dimension::Height,
                    value: height as i64,
                }
            }
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> u8 {
        BYTES_PER_PIXEL
    }

    /// Length of the pixel storage in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Number of bytes in one unpadded row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL as usize
    }

    /// Reallocate the buffer to the new dimensions. Pixels within the overlap of the old and new
    /// bounds keep their (x, y) position; every other pixel is zero-filled.
    /// On error the buffer is left untouched.
    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<(), BitmapError> {
        if new_width == self.width && new_height == self.height {
            return Ok(());
        }

        let mut new_storage = vec![0; Self::checked_len(new_width, new_height)?];

        let old_stride = self.stride();
        let new_stride = new_width as usize * BYTES_PER_PIXEL as usize;
        let copy_len = self.width.min(new_width) as usize * BYTES_PER_PIXEL as usize;

        if copy_len > 0 {
            for y in 0..self.height.min(new_height) as usize {
                let src = y * old_stride;
                let dst = y * new_stride;
                new_storage[dst..dst + copy_len].copy_from_slice(&self.storage[src..src + copy_len]);
            }
        }

        log::trace!(
            "PixelBuffer::resize(): {}x{} -> {}x{}",
            self.width,
            self.height,
            new_width,
            new_height
        );
        self.width = new_width;
        self.height = new_height;
        self.storage = new_storage;
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize, BitmapError> {
        if x >= self.width {
            return Err(BitmapError::IndexOutOfBounds {
                axis: Axis::X,
                index: x as i64,
                bound: self.width,
            });
        }
        if y >= self.height {
            return Err(BitmapError::IndexOutOfBounds {
                axis: Axis::Y,
                index: y as i64,
                bound: self.height,
            });
        }
        Ok(y as usize * self.stride() + x as usize * BYTES_PER_PIXEL as usize)
    }

    /// Read the pixel at (x, y). Coordinates are not wrapped; anything outside the buffer is
    /// an [BitmapError::IndexOutOfBounds] error.
    pub fn get(&self, x: u32, y: u32) -> Result<Pixel, BitmapError> {
        let o = self.offset(x, y)?;
        Ok(Pixel::new(self.storage[o], self.storage[o + 1], self.storage[o + 2]))
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<(), BitmapError> {
        let o = self.offset(x, y)?;
        self.storage[o..o + BYTES_PER_PIXEL as usize].copy_from_slice(&<[u8; 3]>::from(pixel));
        Ok(())
    }

    /// Return row `y` as a slice of pixels.
    pub fn row(&self, y: u32) -> Result<&[Pixel], BitmapError> {
        if y >= self.height {
            return Err(BitmapError::IndexOutOfBounds {
                axis: Axis::Y,
                index: y as i64,
                bound: self.height,
            });
        }
        let start = y as usize * self.stride();
        Ok(cast_slice(&self.storage[start..start + self.stride()]))
    }

    pub fn row_mut(&mut self, y: u32) -> Result<&mut [Pixel], BitmapError> {
        if y >= self.height {
            return Err(BitmapError::IndexOutOfBounds {
                axis: Axis::Y,
                index: y as i64,
                bound: self.height,
            });
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Ok(cast_slice_mut(&mut self.storage[start..start + stride]))
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> {
        // chunks_exact panics on a zero chunk size, which a zero width would produce.
        let stride = self.stride().max(1);
        self.storage.chunks_exact(stride).map(cast_slice::<u8, Pixel>)
    }

    pub fn pixels(&self) -> &[Pixel] {
        cast_slice(&self.storage[..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Borrow the entire storage as a mutable [RawView]. The view keeps `self` mutably borrowed,
    /// so the buffer cannot be resized or dropped while the view is alive.
    pub fn raw_view(&mut self) -> RawView<'_> {
        RawView {
            width: self.width,
            height: self.height,
            bytes: &mut self.storage,
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.storage
    }
}

/// A zero-copy, mutable window over the storage of a [PixelBuffer].
///
/// A [RawView] is a lease: it holds an exclusive borrow of its owner for as long as it exists.
/// It can never outlive the image it was taken from, and the image cannot be resized through any
/// other path until the view is dropped. Writes land directly in the pixel storage and are seen
/// by later reads and saves.
///
/// The layout is row-major, top-down, R, G, B interleaved, `width * height * 3` bytes long.
pub struct RawView<'a> {
    width: u32,
    height: u32,
    bytes: &'a mut [u8],
}

impl<'a> RawView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte offset of the first channel (red) of pixel (x, y), or None if the coordinate lies
    /// outside the view.
    pub fn offset_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL as usize)
    }

    pub fn pixels(&self) -> &[Pixel] {
        cast_slice(&*self.bytes)
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        cast_slice_mut(&mut *self.bytes)
    }

    /// Consume the view, returning the underlying byte slice with the view's lifetime.
    pub fn into_slice(self) -> &'a mut [u8] {
        self.bytes
    }
}

impl Deref for RawView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for RawView<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}
