//! # Decode Module
//!
//! Turns file bytes into pixels, with format-specific fast paths.
//!
//! The format is detected from the content, not the file name: Spotlight
//! assets carry no extension at all.
//! - JPEG: zune-jpeg (1.5-2x faster), image crate as fallback
//! - Other formats: image crate

mod filter;

pub use filter::{PictureFilter, RejectReason, WALLPAPER_MIN_WIDTH};

use crate::error::DecodeError;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// A decoded raster together with the format it was stored in
#[derive(Debug, Clone)]
pub struct DecodedPicture {
    /// The pixels
    pub image: DynamicImage,
    /// Format detected from the file content
    pub format: ImageFormat,
}

impl DecodedPicture {
    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Read and decode an image file
pub fn decode_file(path: &Path) -> Result<DecodedPicture, DecodeError> {
    let bytes = fs::read(path).map_err(|e| DecodeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode_bytes(path, &bytes)
}

/// Decode in-memory image bytes; `path` is only used in error messages
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<DecodedPicture, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let image = match format {
        ImageFormat::Jpeg => decode_jpeg(path, bytes).or_else(|_| decode_fallback(path, bytes, format))?,
        _ => decode_fallback(path, bytes, format)?,
    };

    Ok(DecodedPicture { image, format })
}

/// Fast JPEG decoding using zune-jpeg
fn decode_jpeg(path: &Path, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let corrupt = |reason: String| DecodeError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(bytes, options);

    let pixels = decoder
        .decode()
        .map_err(|e| corrupt(format!("zune-jpeg decode failed: {:?}", e)))?;

    let info = decoder
        .info()
        .ok_or_else(|| corrupt("Failed to get image info".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB);

    let image = match out_colorspace {
        ColorSpace::RGB => {
            let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| corrupt("Failed to create RGB buffer".to_string()))?;
            DynamicImage::ImageRgb8(buffer)
        }
        ColorSpace::RGBA => {
            let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| corrupt("Failed to create RGBA buffer".to_string()))?;
            DynamicImage::ImageRgba8(buffer)
        }
        ColorSpace::Luma => {
            let buffer: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| corrupt("Failed to create Luma buffer".to_string()))?;
            DynamicImage::ImageLuma8(buffer)
        }
        other => return Err(corrupt(format!("unexpected colorspace {:?}", other))),
    };

    Ok(image)
}

/// Decoding through the image crate
fn decode_fallback(path: &Path, bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, DecodeError> {
    image::load_from_memory_with_format(bytes, format).map_err(|e| DecodeError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::test_images::{jpeg_bytes, png_bytes, scene};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_jpeg_from_content() {
        let bytes = jpeg_bytes(&scene(64, 48, 0), 90);
        let decoded = decode_bytes(Path::new("asset"), &bytes).unwrap();

        assert_eq!(decoded.format, ImageFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn detects_png_from_content() {
        let bytes = png_bytes(&scene(30, 20, 1));
        let decoded = decode_bytes(Path::new("picture.jpg"), &bytes).unwrap();

        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.image.to_rgb8(), scene(30, 20, 1).to_rgb8());
    }

    #[test]
    fn rejects_unknown_content() {
        let result = decode_bytes(Path::new("notes"), b"this is not a picture");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat { .. })));
    }

    #[test]
    fn reports_truncated_png() {
        let bytes = png_bytes(&scene(30, 20, 1));
        let result = decode_bytes(Path::new("half.png"), &bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::Corrupt { .. })));
    }

    #[test]
    fn decode_file_reads_extensionless_asset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a1b2c3d4e5");
        std::fs::write(&path, jpeg_bytes(&scene(40, 40, 2), 80)).unwrap();

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.format, ImageFormat::Jpeg);
    }

    #[test]
    fn decode_file_reports_missing_file() {
        let result = decode_file(Path::new("/nonexistent/asset/12345"));
        assert!(matches!(result, Err(DecodeError::Io { .. })));
    }
}
