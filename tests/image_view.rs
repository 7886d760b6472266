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

//! Behavior of ImageView as seen by a caller: construction, resizing,
//! wrap-around indexing, row access, the raw data view, and save/load.

mod common;

use bitmap::{Axis, BitmapError, BmpCodec, Dimension, ImageView, Pixel, PixelBuffer};
use common::*;
use quickcheck::{quickcheck, TestResult};
use std::io::Cursor;

#[test]
fn test_save_and_reload() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.bmp");

    let mut image = ImageView::new(2, 2).unwrap();
    image.set_pixel(0, 0, (255, 0, 0)).unwrap();
    image.set_pixel(1, 1, (0, 255, 0)).unwrap();
    image.save_image(&path).unwrap();

    let image = ImageView::from_file(&path).unwrap();
    assert_eq!(image.get_pixel(0, 0).unwrap(), (255, 0, 0));
    assert_eq!(image.get_pixel(1, 1).unwrap(), (0, 255, 0));
    assert_eq!(image.get_pixel(1, 0).unwrap(), Pixel::BLACK);
}

#[test]
fn test_save_to_bad_path() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("t.bmp");
    let image = ImageView::new(1, 1).unwrap();
    assert!(matches!(image.save_image(&path), Err(BitmapError::IoError(_))));
}

#[test]
fn test_save_and_load_stream() {
    init();
    let mut image = ImageView::new(3, 3).unwrap();
    image.set_pixel(-1, 0, Pixel::BLUE).unwrap();

    let mut cursor = Cursor::new(Vec::new());
    image.save(&mut cursor).unwrap();
    let reloaded = ImageView::load(Cursor::new(cursor.into_inner())).unwrap();
    assert_eq!(reloaded, image);
}

#[test]
fn test_default_is_empty() {
    let image = ImageView::default();
    assert_eq!((image.width(), image.height()), (0, 0));
    assert!(image.as_bytes().is_empty());
    assert!(matches!(image.get_pixel(0, 0), Err(BitmapError::IndexOutOfBounds { .. })));
    assert_eq!(image.bytes_per_pixel(), 3);
}

#[test]
fn test_negative_dimensions() {
    assert!(matches!(
        ImageView::new(-5, 10),
        Err(BitmapError::InvalidDimension {
            dimension: Dimension::Width,
            value: -5
        })
    ));
    assert!(matches!(
        ImageView::new(10, -1),
        Err(BitmapError::InvalidDimension {
            dimension: Dimension::Height,
            ..
        })
    ));

    let mut image = ImageView::from_file(image_path("gradient_4x3.bmp")).unwrap();
    let before = image.clone();
    assert!(matches!(image.set_width(-1), Err(BitmapError::InvalidDimension { .. })));
    assert!(matches!(image.set_height(-1), Err(BitmapError::InvalidDimension { .. })));
    assert_eq!(image, before);
}

#[test]
fn test_set_width_and_height() {
    init();
    let mut image = ImageView::from_file(image_path("gradient_4x3.bmp")).unwrap();

    image.set_height(5).unwrap();
    assert_eq!((image.width(), image.height()), (4, 5));
    image.set_width(6).unwrap();
    assert_eq!((image.width(), image.height()), (6, 5));
    assert_eq!(image.as_bytes().len(), 6 * 5 * 3);

    // The original pixels survive, the new area is black.
    assert_eq!(image.get_pixel(3, 2).unwrap(), fixture_pixel(3, 2));
    assert_eq!(image.get_pixel(5, 4).unwrap(), Pixel::BLACK);
    assert_eq!(image.get_pixel(0, 3).unwrap(), Pixel::BLACK);

    image.set_width(0).unwrap();
    assert_eq!(image.width(), 0);
    assert!(image.row(0).unwrap().is_empty());
}

#[test]
fn test_bounds() {
    let image = ImageView::new(4, 3).unwrap();
    let (w, h) = (4, 3);
    assert!(matches!(
        image.get_pixel(w, 0),
        Err(BitmapError::IndexOutOfBounds { axis: Axis::X, .. })
    ));
    assert!(matches!(
        image.get_pixel(0, h),
        Err(BitmapError::IndexOutOfBounds { axis: Axis::Y, .. })
    ));
    assert!(matches!(
        image.get_pixel(-w - 1, 0),
        Err(BitmapError::IndexOutOfBounds { axis: Axis::X, index: -5, bound: 4 })
    ));
    assert!(matches!(
        image.get_pixel(0, -h - 1),
        Err(BitmapError::IndexOutOfBounds { axis: Axis::Y, index: -4, bound: 3 })
    ));
}

#[test]
fn test_failed_set_does_not_write() {
    let mut image = ImageView::new(4, 3).unwrap();
    let before = image.clone();
    assert!(image.set_pixel(4, 0, Pixel::WHITE).is_err());
    assert!(image.set_pixel(0, -4, Pixel::WHITE).is_err());
    assert_eq!(image, before);
}

#[test]
fn test_pixel_value_range() {
    let mut image = ImageView::new(1, 1).unwrap();
    assert!(matches!(
        Pixel::from_channels(0, 300, 0),
        Err(BitmapError::InvalidPixelValue(0, 300, 0))
    ));
    image.set_pixel(0, 0, Pixel::from_channels(1, 2, 255).unwrap()).unwrap();
    assert_eq!(image.get_pixel(0, 0).unwrap(), (1, 2, 255));
}

#[test]
fn test_row_extraction() {
    init();
    let image = ImageView::from_file(image_path("gradient_4x3.bmp")).unwrap();
    let row = image.row(0).unwrap();
    assert_eq!(row.len(), 4);
    for (x, pixel) in row.iter().enumerate() {
        assert_eq!(*pixel, image.get_pixel(x as i32, 0).unwrap());
    }

    assert_eq!(image.row(-1).unwrap(), image.row(2).unwrap());
    assert!(matches!(image.row(3), Err(BitmapError::IndexOutOfBounds { .. })));
    assert!(matches!(image.row(-4), Err(BitmapError::IndexOutOfBounds { .. })));
}

#[test]
fn test_row_after_clearing() {
    let mut image = ImageView::from_file(image_path("gradient_4x3.bmp")).unwrap();
    for x in 0..image.width() as i32 {
        image.set_pixel(x, 0, Pixel::BLACK).unwrap();
    }
    let row = image.row(0).unwrap();
    assert_eq!(row.len(), image.width() as usize);
    assert!(row.iter().all(|p| *p == Pixel::BLACK));
}

#[test]
fn test_raw_view_mutation_visible() {
    init();
    let mut image = ImageView::from_file(image_path("gradient_4x3.bmp")).unwrap();
    {
        let mut data = image.data();
        assert_eq!(data.len(), 4 * 3 * 3);
        // Pixel (2, 1) starts at (1 * 4 + 2) * 3.
        let offset = data.offset_of(2, 1).unwrap();
        assert_eq!(offset, 18);
        data[offset..offset + 3].copy_from_slice(&[9, 8, 7]);
    }
    assert_eq!(image.get_pixel(2, 1).unwrap(), (9, 8, 7));

    // And the write is what gets saved.
    let reloaded = ImageView::load(Cursor::new(image.to_bytes().unwrap())).unwrap();
    assert_eq!(reloaded.get_pixel(2, 1).unwrap(), (9, 8, 7));
}

#[test]
fn test_raw_view_matches_get_pixel() {
    let mut image = ImageView::from_file(image_path("topdown_3x2.bmp")).unwrap();
    let (w, h) = (image.width(), image.height());
    let expected: Vec<Pixel> = (0..h)
        .flat_map(|y| (0..w).map(move |x| fixture_pixel(x, y)))
        .collect();
    assert_eq!(image.data().pixels(), expected.as_slice());
}

fn buffer_from_seed(width: u8, height: u8, seed: Vec<u8>) -> PixelBuffer {
    let (width, height) = (width as u32 % 17, height as u32 % 17);
    let len = (width * height * 3) as usize;
    let bytes = (0..len)
        .map(|i| seed.get(i % seed.len().max(1)).copied().unwrap_or(0).wrapping_add(i as u8))
        .collect();
    PixelBuffer::from_raw(width, height, bytes).unwrap()
}

quickcheck! {
    fn prop_round_trip(width: u8, height: u8, seed: Vec<u8>) -> bool {
        let buffer = buffer_from_seed(width, height, seed);
        let bytes = BmpCodec::encode(&buffer).unwrap();
        BmpCodec::decode(&bytes).unwrap() == buffer
    }

    fn prop_negative_index_wraps(width: u8, height: u8, seed: Vec<u8>, x: u8, y: u8) -> TestResult {
        let image = ImageView::from(buffer_from_seed(width, height, seed));
        let (w, h) = (image.width() as i32, image.height() as i32);
        if w == 0 || h == 0 {
            return TestResult::discard();
        }
        // x in [-w, -1], y in [-h, h - 1]
        let x = -1 - (x as i32 % w);
        let y = (y as i32 % (2 * h)) - h;

        let wrapped_x = image.get_pixel(x, y).unwrap() == image.get_pixel(x + w, y).unwrap();
        let wrapped_y = y >= 0 || image.get_pixel(x, y).unwrap() == image.get_pixel(x, y + h).unwrap();
        TestResult::from_bool(wrapped_x && wrapped_y)
    }

    fn prop_index_outside_range_fails(width: u8, height: u8, x: i8, y: i8) -> bool {
        let image = ImageView::new(width as i32 % 17, height as i32 % 17).unwrap();
        let (w, h) = (image.width() as i32, image.height() as i32);
        let (x, y) = (x as i32 / 4, y as i32 / 4);
        let in_range = (-w..w).contains(&x) && (-h..h).contains(&y);
        image.get_pixel(x, y).is_ok() == in_range
    }
}
