//! Pictures generated in-process for the integration tests.

#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;

/// Wallpaper-sized test scene of 9x9 coloured blocks
///
/// Neighbouring blocks never share a brightness, so every code bit has a
/// wide margin. Different seeds give unrelated codes.
pub fn scene(width: u32, height: u32, seed: u32) -> DynamicImage {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let cx = x * 9 / width;
        let cy = y * 9 / height;
        let level = ((cx * 37 + cy * 91 + seed * 13) % 11) as u8;
        let v = 20 + level * 20;
        Rgb([v, v / 2 + 60, 255 - v])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn wallpaper(seed: u32) -> DynamicImage {
    scene(1600, 1066, seed)
}

pub fn jpeg_bytes(image: &DynamicImage, quality: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&image.to_rgb8())
        .unwrap();
    bytes
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}
