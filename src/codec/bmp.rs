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

    src/codec/bmp.rs

    A reader and writer for uncompressed 24-bit BMP files.

    Pixel rows are stored bottom-up (unless the DIB header declares a negative
    height), each row padded to a multiple of 4 bytes, with the channels of
    each pixel in B, G, R order. PixelBuffer keeps pixels top-down in R, G, B
    order; the conversion happens here and nowhere else.

*/
use crate::{
    codec::header::{
        BmpCompression,
        BmpFileHeader,
        BmpInfo,
        BmpInfoHeader,
        CORE_HEADER_SIZE,
        DEFAULT_PELS_PER_METER,
        FILE_HEADER_SIZE,
        INFO_HEADER_SIZE,
        OS2_SHORT_HEADER_SIZE,
    },
    io::{Cursor, ReadSeek, ReadWriteSeek, SeekFrom},
    pixel::Pixel,
    pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL},
    util::{get_length, padded_stride},
    BitmapError,
    Dimension,
};
use binrw::{BinRead, BinReaderExt, BinWrite};

const BMP_BIT_COUNT: u16 = 24;

pub struct BmpCodec;

impl BmpCodec {
    pub fn extensions() -> Vec<&'static str> {
        vec!["bmp", "dib"]
    }

    /// Return true if the stream starts with a BMP signature followed by a plausible DIB header.
    /// Detection does not imply the image is supported; see [BmpCodec::read].
    pub fn detect<RS: ReadSeek>(mut reader: RS) -> bool {
        if reader.seek(SeekFrom::Start(0)).is_err() {
            return false;
        }

        let mut detected = false;
        if BmpFileHeader::read(&mut reader).is_ok() {
            if let Ok(header_size) = reader.read_le::<u32>() {
                detected = header_size >= CORE_HEADER_SIZE;
            }
        }
        detected
    }

    /// Read the headers of a BMP file and return its metadata. Pixel data is not decoded, and
    /// bit depths or compression methods the decoder cannot handle are reported rather than
    /// rejected.
    pub fn read_info<RS: ReadSeek>(mut reader: RS) -> Result<BmpInfo, BitmapError> {
        let data_len = get_length(&mut reader)?;
        Self::read_headers(&mut reader, data_len)
    }

    /// Decode a complete BMP file from a byte slice.
    pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, BitmapError> {
        Self::read(Cursor::new(bytes))
    }

    /// Decode a complete BMP file from a seekable reader.
    pub fn read<RS: ReadSeek>(mut reader: RS) -> Result<PixelBuffer, BitmapError> {
        let data_len = get_length(&mut reader)?;
        let info = Self::read_headers(&mut reader, data_len)?;
        Self::check_supported(&info)?;

        let pixel_bytes = info.stride as u64 * info.height as u64;
        if info.pixel_offset as u64 + pixel_bytes > data_len {
            log::error!(
                "BmpCodec::read(): pixel array of {} bytes at offset {} exceeds data length {}",
                pixel_bytes,
                info.pixel_offset,
                data_len
            );
            return Err(BitmapError::MalformedHeader(format!(
                "pixel array of {} bytes at offset {} extends past end of data ({} bytes)",
                pixel_bytes, info.pixel_offset, data_len
            )));
        }
        if info.image_size != 0 && info.image_size as u64 != pixel_bytes {
            log::warn!(
                "BmpCodec::read(): image size field {} does not match computed size {}",
                info.image_size,
                pixel_bytes
            );
        }

        // A zero-width image has no pixel data, however many rows it declares.
        if info.stride == 0 {
            log::debug!("BmpCodec::read(): decoded empty {}x{} image", info.width, info.height);
            return PixelBuffer::new(info.width, info.height);
        }

        let mut buffer = PixelBuffer::new(info.width, info.height)?;
        let mut stored_row = vec![0u8; info.stride as usize];

        reader.seek(SeekFrom::Start(info.pixel_offset as u64))?;
        for stored_y in 0..info.height {
            reader.read_exact(&mut stored_row)?;

            let y = if info.top_down {
                stored_y
            }
            else {
                info.height - 1 - stored_y
            };
            let row = buffer.row_mut(y)?;
            for (pixel, bgr) in row.iter_mut().zip(stored_row.chunks_exact(BYTES_PER_PIXEL as usize)) {
                *pixel = Pixel::from_bgr([bgr[0], bgr[1], bgr[2]]);
            }
        }

        log::debug!(
            "BmpCodec::read(): decoded {}x{} image ({})",
            info.width,
            info.height,
            if info.top_down { "top-down" } else { "bottom-up" }
        );
        Ok(buffer)
    }

    /// Encode a [PixelBuffer] as a 24-bit uncompressed, bottom-up BMP file.
    pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>, BitmapError> {
        let info = Self::info_for(buffer)?;
        let mut cursor = Cursor::new(Vec::with_capacity(info.file_size as usize));
        Self::write(buffer, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    pub fn write<WS: ReadWriteSeek>(buffer: &PixelBuffer, writer: &mut WS) -> Result<(), BitmapError> {
        let info = Self::info_for(buffer)?;

        let file_header = BmpFileHeader {
            file_size: info.file_size,
            reserved1: 0,
            reserved2: 0,
            pixel_offset: info.pixel_offset,
        };
        let info_header = BmpInfoHeader {
            header_size: INFO_HEADER_SIZE,
            width: info.width as i32,
            height: info.height as i32,
            planes: 1,
            bit_count: BMP_BIT_COUNT,
            compression: BmpCompression::Rgb.into(),
            image_size: info.image_size,
            x_pels_per_meter: DEFAULT_PELS_PER_METER,
            y_pels_per_meter: DEFAULT_PELS_PER_METER,
            colors_used: 0,
            colors_important: 0,
        };
        log::trace!("BmpCodec::write(): {:?} {:?}", file_header, info_header);

        file_header.write(writer)?;
        info_header.write(writer)?;

        // Padding bytes at the end of the row stay zero.
        let mut stored_row = vec![0u8; info.stride as usize];
        for row in buffer.rows().rev() {
            for (bgr, pixel) in stored_row.chunks_exact_mut(BYTES_PER_PIXEL as usize).zip(row) {
                bgr.copy_from_slice(&pixel.to_bgr());
            }
            writer.write_all(&stored_row)?;
        }
        Ok(())
    }

    /// Return the metadata [BmpCodec::encode] would write for `buffer`. Fails with
    /// [BitmapError::InvalidDimension] if the buffer cannot be represented as a BMP file.
    pub fn info_for(buffer: &PixelBuffer) -> Result<BmpInfo, BitmapError> {
        if buffer.width() > i32::MAX as u32 {
            return Err(BitmapError::InvalidDimension {
                dimension: Dimension::Width,
                value: buffer.width() as i64,
            });
        }
        if buffer.height() > i32::MAX as u32 {
            return Err(BitmapError::InvalidDimension {
                dimension: Dimension::Height,
                value: buffer.height() as i64,
            });
        }

        let too_large = || BitmapError::InvalidDimension {
            dimension: Dimension::Width,
            value: buffer.width() as i64,
        };

        let stride = padded_stride(buffer.width(), BYTES_PER_PIXEL).ok_or_else(too_large)?;
        let image_size = (stride as u64) * (buffer.height() as u64);
        let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
        let file_size = u32::try_from(pixel_offset as u64 + image_size).map_err(|_| too_large())?;

        Ok(BmpInfo {
            width: buffer.width(),
            height: buffer.height(),
            top_down: false,
            bit_count: BMP_BIT_COUNT,
            compression: BmpCompression::Rgb,
            header_size: INFO_HEADER_SIZE,
            pixel_offset,
            file_size,
            image_size: image_size as u32,
            stride: stride as u32,
        })
    }

    /// Read both headers and check them for structural consistency against `data_len`, the
    /// total number of bytes available.
    fn read_headers<RS: ReadSeek>(reader: &mut RS, data_len: u64) -> Result<BmpInfo, BitmapError> {
        if data_len < (FILE_HEADER_SIZE + 4) as u64 {
            log::error!("BmpCodec: {} bytes is too short for a BMP header", data_len);
            return Err(BitmapError::MalformedHeader(format!(
                "{} bytes is too short to hold a BMP header",
                data_len
            )));
        }

        reader.seek(SeekFrom::Start(0))?;
        let file_header = BmpFileHeader::read(reader)?;
        log::trace!("BmpCodec: {:?}", file_header);

        let header_size: u32 = reader.read_le()?;
        match header_size {
            CORE_HEADER_SIZE | OS2_SHORT_HEADER_SIZE => {
                return Err(BitmapError::UnsupportedFormat(format!(
                    "OS/2 bitmap header of {} bytes",
                    header_size
                )));
            }
            size if size < INFO_HEADER_SIZE => {
                log::error!("BmpCodec: invalid DIB header size {}", size);
                return Err(BitmapError::MalformedHeader(format!("invalid DIB header size {}", size)));
            }
            _ => {}
        }

        let headers_end = FILE_HEADER_SIZE as u64 + header_size as u64;
        if headers_end > data_len {
            return Err(BitmapError::MalformedHeader(format!(
                "DIB header of {} bytes extends past end of data ({} bytes)",
                header_size, data_len
            )));
        }

        reader.seek(SeekFrom::Start(FILE_HEADER_SIZE as u64))?;
        let info_header = BmpInfoHeader::read(reader)?;
        log::trace!("BmpCodec: {:?}", info_header);

        if info_header.width < 0 {
            return Err(BitmapError::MalformedHeader(format!(
                "negative width {}",
                info_header.width
            )));
        }
        if info_header.height == i32::MIN {
            return Err(BitmapError::MalformedHeader(format!(
                "invalid height {}",
                info_header.height
            )));
        }
        if info_header.planes != 1 {
            return Err(BitmapError::MalformedHeader(format!(
                "{} color planes, expected 1",
                info_header.planes
            )));
        }
        if !matches!(info_header.bit_count, 1 | 4 | 8 | 16 | 24 | 32) {
            return Err(BitmapError::MalformedHeader(format!(
                "invalid bit count {}",
                info_header.bit_count
            )));
        }
        if (file_header.pixel_offset as u64) < headers_end {
            return Err(BitmapError::MalformedHeader(format!(
                "pixel data offset {} overlaps the headers ({} bytes)",
                file_header.pixel_offset, headers_end
            )));
        }
        if file_header.file_size as u64 > data_len {
            return Err(BitmapError::MalformedHeader(format!(
                "header declares {} bytes but only {} are present",
                file_header.file_size, data_len
            )));
        }

        let width = info_header.width as u32;
        let stride = (width as u64 * info_header.bit_count as u64).div_ceil(32) * 4;
        let stride = u32::try_from(stride)
            .map_err(|_| BitmapError::MalformedHeader(format!("width {} is too large", width)))?;

        Ok(BmpInfo {
            width,
            height: info_header.height.unsigned_abs(),
            top_down: info_header.height < 0,
            bit_count: info_header.bit_count,
            compression: BmpCompression::from(info_header.compression),
            header_size,
            pixel_offset: file_header.pixel_offset,
            file_size: file_header.file_size,
            image_size: info_header.image_size,
            stride,
        })
    }

    fn check_supported(info: &BmpInfo) -> Result<(), BitmapError> {
        match info.bit_count {
            BMP_BIT_COUNT => {}
            1 | 4 | 8 => {
                return Err(BitmapError::UnsupportedFormat(format!(
                    "{}-bit indexed color",
                    info.bit_count
                )));
            }
            _ => {
                return Err(BitmapError::UnsupportedFormat(format!(
                    "{}-bit color, only 24-bit is supported",
                    info.bit_count
                )));
            }
        }
        if info.compression != BmpCompression::Rgb {
            return Err(BitmapError::UnsupportedFormat(format!(
                "compression method {}",
                info.compression
            )));
        }
        Ok(())
    }
}
