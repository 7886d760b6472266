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

    src/image_view.rs

    ImageView is the public face of the crate: an RGB image that can be
    loaded from and saved to BMP files, resized, and read or written one pixel
    or one row at a time using signed, wrap-around coordinates.

*/
use std::path::Path;

use crate::{
    codec::{BmpCodec, BmpInfo},
    io::{ReadSeek, ReadWriteSeek},
    pixel::{check_rgb, Pixel},
    pixel_buffer::{PixelBuffer, RawView, BYTES_PER_PIXEL},
    Axis,
    BitmapError,
    Dimension,
};

/// An owned row of pixels, copied out of an image.
pub type Row = Vec<Pixel>;

/// Convert a caller-supplied signed coordinate into an offset within `[0, bound)`.
/// Negative values count back from the far edge, so -1 is the last column or row.
fn normalize_axis(axis: Axis, index: i32, bound: u32) -> Result<u32, BitmapError> {
    let index = index as i64;
    let normalized = if index < 0 { bound as i64 + index } else { index };

    if normalized < 0 || normalized >= bound as i64 {
        return Err(BitmapError::IndexOutOfBounds { axis, index, bound });
    }
    Ok(normalized as u32)
}

fn check_dimension(dimension: Dimension, value: i32) -> Result<u32, BitmapError> {
    u32::try_from(value).map_err(|_| BitmapError::InvalidDimension {
        dimension,
        value: value as i64,
    })
}

/// An RGB image with 8 bits per channel, backed by a [PixelBuffer].
///
/// Coordinates passed to [ImageView::get_pixel], [ImageView::set_pixel], [ImageView::row] and
/// [ImageView::set_row] may be negative, in which case they are taken relative to the far edge:
/// `x = -1` is the rightmost column and `y = -1` the bottom row. A coordinate that is still outside
/// the image after this adjustment is an [BitmapError::IndexOutOfBounds] error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageView {
    buffer: PixelBuffer,
}

impl From<PixelBuffer> for ImageView {
    fn from(buffer: PixelBuffer) -> Self {
        ImageView { buffer }
    }
}

impl ImageView {
    /// Create a black image of the specified size. `ImageView::default()` is the 0x0 image.
    pub fn new(width: i32, height: i32) -> Result<Self, BitmapError> {
        let width = check_dimension(Dimension::Width, width)?;
        let height = check_dimension(Dimension::Height, height)?;
        Ok(ImageView {
            buffer: PixelBuffer::new(width, height)?,
        })
    }

    /// Load an image from a BMP file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            log::error!("ImageView::from_file(): error reading {}: {}", path.display(), e);
            BitmapError::IoError(format!("{}: {}", path.display(), e))
        })?;
        Ok(ImageView {
            buffer: BmpCodec::decode(&bytes)?,
        })
    }

    /// Load an image from a reader positioned anywhere within a BMP stream.
    pub fn load<RS: ReadSeek>(reader: RS) -> Result<Self, BitmapError> {
        Ok(ImageView {
            buffer: BmpCodec::read(reader)?,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The number of bytes used for each pixel. Always 3.
    #[inline]
    pub fn bytes_per_pixel(&self) -> u8 {
        BYTES_PER_PIXEL
    }

    /// Change the width, keeping the height. Existing pixels that still fit keep their position;
    /// new pixels are black.
    pub fn set_width(&mut self, width: i32) -> Result<(), BitmapError> {
        let width = check_dimension(Dimension::Width, width)?;
        self.buffer.resize(width, self.buffer.height())
    }

    /// Change the height, keeping the width. See [ImageView::set_width].
    pub fn set_height(&mut self, height: i32) -> Result<(), BitmapError> {
        let height = check_dimension(Dimension::Height, height)?;
        self.buffer.resize(self.buffer.width(), height)
    }

    /// Change both dimensions at once. Neither dimension changes unless both are valid.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), BitmapError> {
        let width = check_dimension(Dimension::Width, width)?;
        let height = check_dimension(Dimension::Height, height)?;
        self.buffer.resize(width, height)
    }

    /// Resolve a possibly negative (x, y) pair into unsigned coordinates inside the image.
    pub fn normalize_index(&self, x: i32, y: i32) -> Result<(u32, u32), BitmapError> {
        Ok((
            normalize_axis(Axis::X, x, self.width())?,
            normalize_axis(Axis::Y, y, self.height())?,
        ))
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Result<Pixel, BitmapError> {
        let (x, y) = self.normalize_index(x, y)?;
        self.buffer.get(x, y)
    }

    /// Write a single pixel. Nothing is written if the coordinates or the pixel are invalid.
    pub fn set_pixel(&mut self, x: i32, y: i32, pixel: impl Into<Pixel>) -> Result<(), BitmapError> {
        let (x, y) = self.normalize_index(x, y)?;
        let pixel = pixel.into();
        check_rgb(&pixel)?;
        self.buffer.set(x, y, pixel)
    }

    /// Copy out row `index`, left to right. The row index wraps like a y coordinate.
    pub fn row(&self, index: i32) -> Result<Row, BitmapError> {
        let y = normalize_axis(Axis::Y, index, self.height())?;
        Ok(self.buffer.row(y)?.to_vec())
    }

    /// Overwrite row `index` with `pixels`, which must hold exactly `width` pixels.
    pub fn set_row(&mut self, index: i32, pixels: &[Pixel]) -> Result<(), BitmapError> {
        let y = normalize_axis(Axis::Y, index, self.height())?;
        if pixels.len() != self.width() as usize {
            log::error!(
                "ImageView::set_row(): got {} pixels for a row of width {}",
                pixels.len(),
                self.width()
            );
            return Err(BitmapError::InvalidDimension {
                dimension: Dimension::Width,
                value: pixels.len() as i64,
            });
        }
        pixels.iter().try_for_each(check_rgb)?;
        self.buffer.row_mut(y)?.copy_from_slice(pixels);
        Ok(())
    }

    /// Borrow the pixel storage directly, without copying. See [RawView] for the layout. The
    /// view holds a mutable borrow of the image, so the image cannot be resized or dropped while
    /// the view is in use.
    pub fn data(&mut self) -> RawView<'_> {
        self.buffer.raw_view()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Return the metadata this image would be saved with.
    pub fn info(&self) -> Result<BmpInfo, BitmapError> {
        BmpCodec::info_for(&self.buffer)
    }

    /// Encode the image as a BMP file in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BitmapError> {
        BmpCodec::encode(&self.buffer)
    }

    pub fn save<WS: ReadWriteSeek>(&self, writer: &mut WS) -> Result<(), BitmapError> {
        BmpCodec::write(&self.buffer, writer)
    }

    /// Save the image as a BMP file at `path`, replacing any existing file.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<(), BitmapError> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        std::fs::write(path, data).map_err(|e| {
            log::error!("ImageView::save_image(): error writing {}: {}", path.display(), e);
            BitmapError::IoError(format!("{}: {}", path.display(), e))
        })
    }
}
