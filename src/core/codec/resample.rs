//! SIMD-accelerated resampling onto the fingerprint grid.
//!
//! Uses fast_image_resize, which treats each source pixel as a unit area, so
//! the sampling domain always spans the full edge-to-edge extent of the image.
//! Automatically uses AVX2/NEON SIMD when available.

use crate::error::CodecError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

/// Resampler that keeps its scratch buffers between calls
pub struct GridResampler {
    resizer: Resizer,
    options: ResizeOptions,
}

impl GridResampler {
    /// Create a resampler using the Catmull-Rom bicubic filter
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
        }
    }

    /// Resample the whole image to `width` x `height` RGBA pixels.
    pub fn resample(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::invalid(format!(
                "resample target must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        let rgba = image.to_rgba8();
        let (src_width, src_height) = rgba.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(CodecError::invalid("source image has no pixels"));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, rgba.into_raw(), PixelType::U8x4)
            .map_err(|e| {
                CodecError::ResampleFailed(format!("Failed to create source image: {}", e))
            })?;

        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| CodecError::ResampleFailed(format!("Resize failed: {}", e)))?;

        RgbaImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            CodecError::ResampleFailed("Failed to create result buffer".to_string())
        })
    }
}

impl Default for GridResampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resampling
pub fn resample(image: &DynamicImage, width: u32, height: u32) -> Result<RgbaImage, CodecError> {
    GridResampler::new().resample(image, width, height)
}
