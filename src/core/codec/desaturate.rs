//! Luminance reduction with fixed NTSC weights.

use image::{Rgba, RgbaImage};

/// Red weight of the luma transform
pub const RED_WEIGHT: f32 = 0.299;
/// Green weight of the luma transform
pub const GREEN_WEIGHT: f32 = 0.587;
/// Blue weight of the luma transform
pub const BLUE_WEIGHT: f32 = 0.114;

/// Luma of a single RGB triple, rounded to the nearest byte value.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let value = f32::from(r) * RED_WEIGHT + f32::from(g) * GREEN_WEIGHT + f32::from(b) * BLUE_WEIGHT;
    value.round().clamp(0.0, 255.0) as u8
}

/// Replace every colour channel with the pixel's luma, keeping alpha.
pub fn desaturate(image: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let l = luma(r, g, b);
        Rgba([l, l, l, a])
    })
}
