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

    src/pixel.rs

    Defines the Pixel type, an RGB triple with 8 bits per channel.

*/
use crate::BitmapError;
use bytemuck::{Pod, Zeroable};
use std::fmt::{self, Display, Formatter};

/// A [Pixel] is a single 24-bit RGB color. Its memory layout matches three consecutive bytes of
/// pixel storage, so a byte buffer can be viewed as a `[Pixel]` slice without copying.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[rustfmt::skip]
impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };
    pub const WHITE: Pixel = Pixel { r: 255, g: 255, b: 255 };
    pub const RED: Pixel = Pixel { r: 255, g: 0, b: 0 };
    pub const GREEN: Pixel = Pixel { r: 0, g: 255, b: 0 };
    pub const BLUE: Pixel = Pixel { r: 0, g: 0, b: 255 };
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Pixel {
        Pixel { r, g, b }
    }

    /// Build a [Pixel] from wider integer channel values, as handed over by a host language that
    /// has no 8-bit integer type. Fails with [BitmapError::InvalidPixelValue] if any channel is
    /// outside 0-255.
    pub fn from_channels(r: i32, g: i32, b: i32) -> Result<Pixel, BitmapError> {
        match (u8::try_from(r), u8::try_from(g), u8::try_from(b)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Pixel { r, g, b }),
            _ => Err(BitmapError::InvalidPixelValue(r, g, b)),
        }
    }

    /// Return the pixel as a BGR byte triple, the channel order used by BMP files.
    #[inline]
    pub fn to_bgr(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }

    #[inline]
    pub fn from_bgr(bgr: [u8; 3]) -> Pixel {
        Pixel {
            r: bgr[2],
            g: bgr[1],
            b: bgr[0],
        }
    }
}

/// Check that every channel of `pixel` is within 0-255.
///
/// With `u8` channels this can never fail. It stays in the write path so the range contract holds
/// if the channel representation ever widens.
pub(crate) fn check_rgb(pixel: &Pixel) -> Result<(), BitmapError> {
    let channels = [pixel.r as i32, pixel.g as i32, pixel.b as i32];
    if channels.iter().any(|c| !(0..=255).contains(c)) {
        return Err(BitmapError::InvalidPixelValue(channels[0], channels[1], channels[2]));
    }
    Ok(())
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Pixel { r, g, b }
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Pixel { r, g, b }
    }
}

impl From<Pixel> for (u8, u8, u8) {
    fn from(pixel: Pixel) -> Self {
        (pixel.r, pixel.g, pixel.b)
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(pixel: Pixel) -> Self {
        [pixel.r, pixel.g, pixel.b]
    }
}

impl PartialEq<(u8, u8, u8)> for Pixel {
    fn eq(&self, other: &(u8, u8, u8)) -> bool {
        (self.r, self.g, self.b) == *other
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}
