//! # Codec Module
//!
//! Turns a decoded image into a 128-bit picture code.
//!
//! ## How It Works
//! 1. Resample the full image to a 9x9 grid (Catmull-Rom bicubic)
//! 2. Desaturate with fixed NTSC weights (R 0.299, G 0.587, B 0.114)
//! 3. Compare neighbouring pixels: 64 row bits, then 64 column bits
//! 4. Encode as `"<64 bits>,<64 bits>"`
//!
//! The stages always run in this order; codes from a different order are
//! not comparable.
//!
//! ## Example
//! ```rust,ignore
//! use spotlight_pics::core::codec::fingerprint;
//!
//! let code = fingerprint(&image)?;
//! println!("{}", code);
//! ```

mod code;
pub mod desaturate;
pub mod gradient;
pub mod resample;

pub use code::{PictureCode, CODE_BITS, CODE_TEXT_LEN, SEGMENT_BITS, SEGMENT_SEPARATOR};
pub use resample::GridResampler;

use crate::error::CodecError;
use image::DynamicImage;

/// Width and height of the resampled grid
pub const GRID_SIZE: u32 = 9;

/// Computes picture codes, reusing resampling buffers between images
pub struct Fingerprinter {
    resampler: GridResampler,
}

impl Fingerprinter {
    /// Create a new fingerprinter
    pub fn new() -> Self {
        Self {
            resampler: GridResampler::new(),
        }
    }

    /// Compute the picture code of an image
    pub fn fingerprint(&mut self, image: &DynamicImage) -> Result<PictureCode, CodecError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CodecError::invalid("image has no pixels"));
        }

        let grid = self.resampler.resample(image, GRID_SIZE, GRID_SIZE)?;
        let grey = desaturate::desaturate(&grid);
        gradient::extract_code(&grey)
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the picture code of an image
pub fn fingerprint(image: &DynamicImage) -> Result<PictureCode, CodecError> {
    Fingerprinter::new().fingerprint(image)
}

/// Fingerprint two images and return their similarity (0.0 to 1.0)
pub fn compare_images(a: &DynamicImage, b: &DynamicImage) -> Result<f64, CodecError> {
    let mut fingerprinter = Fingerprinter::new();
    let code_a = fingerprinter.fingerprint(a)?;
    let code_b = fingerprinter.fingerprint(b)?;
    Ok(code_a.similarity(&code_b))
}
