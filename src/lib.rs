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
*/

//! A codec for uncompressed 24-bit BMP files and an in-memory RGB image type.
//!
//! ```no_run
//! use bitmap::{ImageView, Pixel};
//!
//! let mut image = ImageView::new(2, 2)?;
//! image.set_pixel(0, 0, Pixel::RED)?;
//! image.set_pixel(-1, -1, (0, 255, 0))?;
//! image.save_image("t.bmp")?;
//!
//! let image = ImageView::from_file("t.bmp")?;
//! assert_eq!(image.get_pixel(1, 1)?, (0, 255, 0));
//! # Ok::<(), bitmap::BitmapError>(())
//! ```

pub mod codec;
pub mod image_view;
pub mod io;
pub mod pixel;
pub mod pixel_buffer;
mod util;

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// A coordinate axis, used to report which half of an index was out of bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// An image dimension, used to report which dimension was invalid. [Dimension::Length] is the
/// byte length of pixel storage that does not match its width and height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
    Length,
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Dimension::Width => write!(f, "Width"),
            Dimension::Height => write!(f, "Height"),
            Dimension::Length => write!(f, "Storage length"),
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum BitmapError {
    #[error("{dimension} is invalid: {value}")]
    InvalidDimension { dimension: Dimension, value: i64 },
    #[error("{axis} coordinate ({index}) is out of bounds ({bound})")]
    IndexOutOfBounds { axis: Axis, index: i64, bound: u32 },
    #[error("RGB value must be between 0 and 255, got ({0}, {1}, {2})")]
    InvalidPixelValue(i32, i32, i32),
    #[error("The bitmap header is malformed: {0}")]
    MalformedHeader(String),
    #[error("Unsupported bitmap format: {0}")]
    UnsupportedFormat(String),
    #[error("An IO error occurred reading or writing the bitmap: {0}")]
    IoError(String),
}

// Running out of data mid-structure means the file is bad, not the device.
impl From<io::Error> for BitmapError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => BitmapError::MalformedHeader(e.to_string()),
            _ => BitmapError::IoError(e.to_string()),
        }
    }
}

impl From<binrw::Error> for BitmapError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Io(e) => BitmapError::from(e),
            binrw::Error::BadMagic { pos, .. } => {
                BitmapError::MalformedHeader(format!("missing 'BM' signature at offset {:#x}", pos))
            }
            e => BitmapError::MalformedHeader(e.to_string()),
        }
    }
}

pub use crate::{
    codec::{BmpCodec, BmpCompression, BmpInfo},
    image_view::{ImageView, Row},
    pixel::Pixel,
    pixel_buffer::{PixelBuffer, RawView, BYTES_PER_PIXEL},
};
