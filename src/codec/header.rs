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

    src/codec/header.rs

    On-disk header structures of the BMP format and the BmpInfo metadata
    summary derived from them.

    A BMP file starts with a 14 byte file header (BITMAPFILEHEADER) followed
    by a DIB header. Only the 40 byte BITMAPINFOHEADER layout is interpreted;
    the V2-V5 headers extend it, and their extra fields are skipped.

*/
use crate::{io::Write, BitmapError};
use binrw::binrw;
use std::fmt::{self, Display, Formatter};

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
/// Size of the OS/2 1.x BITMAPCOREHEADER.
pub const CORE_HEADER_SIZE: u32 = 12;
/// Size of the shortest OS/2 2.x header variant.
pub const OS2_SHORT_HEADER_SIZE: u32 = 16;
/// 2835 pixels per meter is 72 DPI.
pub const DEFAULT_PELS_PER_METER: i32 = 2835;

#[derive(Debug)]
#[binrw]
#[brw(little, magic = b"BM")]
pub(crate) struct BmpFileHeader {
    pub(crate) file_size: u32,
    pub(crate) reserved1: u16,
    pub(crate) reserved2: u16,
    pub(crate) pixel_offset: u32,
}

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub(crate) struct BmpInfoHeader {
    pub(crate) header_size: u32,
    pub(crate) width: i32,
    // Positive for bottom-up row order, negative for top-down.
    pub(crate) height: i32,
    pub(crate) planes: u16,
    pub(crate) bit_count: u16,
    pub(crate) compression: u32,
    pub(crate) image_size: u32,
    pub(crate) x_pels_per_meter: i32,
    pub(crate) y_pels_per_meter: i32,
    pub(crate) colors_used: u32,
    pub(crate) colors_important: u32,
}

/// The compression method field of a DIB header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BmpCompression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
    Jpeg,
    Png,
    AlphaBitfields,
    Unknown(u32),
}

impl From<u32> for BmpCompression {
    fn from(value: u32) -> Self {
        match value {
            0 => BmpCompression::Rgb,
            1 => BmpCompression::Rle8,
            2 => BmpCompression::Rle4,
            3 => BmpCompression::Bitfields,
            4 => BmpCompression::Jpeg,
            5 => BmpCompression::Png,
            6 => BmpCompression::AlphaBitfields,
            _ => BmpCompression::Unknown(value),
        }
    }
}

impl From<BmpCompression> for u32 {
    fn from(value: BmpCompression) -> Self {
        match value {
            BmpCompression::Rgb => 0,
            BmpCompression::Rle8 => 1,
            BmpCompression::Rle4 => 2,
            BmpCompression::Bitfields => 3,
            BmpCompression::Jpeg => 4,
            BmpCompression::Png => 5,
            BmpCompression::AlphaBitfields => 6,
            BmpCompression::Unknown(value) => value,
        }
    }
}

impl Display for BmpCompression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BmpCompression::Rgb => write!(f, "BI_RGB"),
            BmpCompression::Rle8 => write!(f, "BI_RLE8"),
            BmpCompression::Rle4 => write!(f, "BI_RLE4"),
            BmpCompression::Bitfields => write!(f, "BI_BITFIELDS"),
            BmpCompression::Jpeg => write!(f, "BI_JPEG"),
            BmpCompression::Png => write!(f, "BI_PNG"),
            BmpCompression::AlphaBitfields => write!(f, "BI_ALPHABITFIELDS"),
            BmpCompression::Unknown(value) => write!(f, "Unknown({})", value),
        }
    }
}

/// Metadata describing a BMP file, read from its headers without decoding any pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpInfo {
    pub width: u32,
    pub height: u32,
    /// True if rows are stored top to bottom (negative height in the DIB header).
    pub top_down: bool,
    pub bit_count: u16,
    pub compression: BmpCompression,
    pub header_size: u32,
    pub pixel_offset: u32,
    pub file_size: u32,
    pub image_size: u32,
    /// Bytes per stored row, including padding.
    pub stride: u32,
}

impl BmpInfo {
    /// Bytes per pixel implied by the bit count. Zero for sub-byte formats.
    pub fn bytes_per_pixel(&self) -> u8 {
        (self.bit_count / 8) as u8
    }

    pub fn dump_info<W: Write>(&self, mut out: W) -> Result<(), BitmapError> {
        out.write_fmt(format_args!("{}", self))?;
        Ok(())
    }
}

impl Display for BmpInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Width: {}", self.width)?;
        writeln!(f, "Bytes per pixel: {}", self.bytes_per_pixel())?;
        writeln!(f, "Bit count: {}", self.bit_count)?;
        writeln!(f, "Compression: {}", self.compression)?;
        writeln!(f, "Row order: {}", if self.top_down { "top-down" } else { "bottom-up" })?;
        writeln!(f, "DIB header size: {}", self.header_size)?;
        writeln!(f, "Pixel data offset: {}", self.pixel_offset)?;
        writeln!(f, "Row stride: {}", self.stride)?;
        writeln!(f, "Image size: {}", self.image_size)?;
        writeln!(f, "File size: {}", self.file_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::{BinRead, BinWrite};
    use std::io::Cursor;

    #[test]
    fn test_file_header_layout() {
        let header = BmpFileHeader {
            file_size: 0x0102_0304,
            reserved1: 0,
            reserved2: 0,
            pixel_offset: 54,
        };
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        assert_eq!(
            cursor.into_inner(),
            vec![b'B', b'M', 0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0, 54, 0, 0, 0]
        );
    }

    #[test]
    fn test_file_header_bad_magic() {
        let bytes = [b'M', b'B', 0, 0, 0, 0, 0, 0, 0, 0, 54, 0, 0, 0];
        assert!(BmpFileHeader::read(&mut Cursor::new(&bytes)).is_err());
    }

    #[test]
    fn test_info_header_is_40_bytes() {
        let header = BmpInfoHeader {
            header_size: INFO_HEADER_SIZE,
            width: 4,
            height: -3,
            planes: 1,
            bit_count: 24,
            compression: 0,
            image_size: 36,
            x_pels_per_meter: DEFAULT_PELS_PER_METER,
            y_pels_per_meter: DEFAULT_PELS_PER_METER,
            colors_used: 0,
            colors_important: 0,
        };
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), INFO_HEADER_SIZE as usize);
        // Height is a signed little-endian field.
        assert_eq!(&bytes[8..12], &(-3i32).to_le_bytes());

        let read_back = BmpInfoHeader::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(read_back.height, -3);
        assert_eq!(read_back.bit_count, 24);
    }

    #[test]
    fn test_compression_names() {
        assert_eq!(BmpCompression::from(0), BmpCompression::Rgb);
        assert_eq!(BmpCompression::from(1).to_string(), "BI_RLE8");
        assert_eq!(BmpCompression::from(42), BmpCompression::Unknown(42));
        assert_eq!(u32::from(BmpCompression::Bitfields), 3);
    }
}
