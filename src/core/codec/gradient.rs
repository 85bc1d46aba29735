//! Gradient bit extraction.
//!
//! Each bit records whether brightness holds or rises between two adjacent
//! pixels of the 9x9 luma grid:
//! 1. Row bits compare a pixel with its right neighbour, row by row
//! 2. Column bits compare a pixel with the one below it, column by column
//!
//! Equal brightness yields a 1.

use super::code::PictureCode;
use super::GRID_SIZE;
use crate::error::CodecError;
use image::RgbaImage;

/// Number of comparisons along each axis
const STEPS: u32 = GRID_SIZE - 1;

/// Collects bits into a word, first pushed bit ending up most significant
struct BitWriter {
    word: u64,
}

impl BitWriter {
    fn new() -> Self {
        Self { word: 0 }
    }

    fn push(&mut self, bit: bool) {
        self.word = (self.word << 1) | u64::from(bit);
    }
}

/// Build a picture code from the top-left 9x9 pixels of a desaturated grid.
///
/// Only the red channel is read; after desaturation it equals the luma.
pub fn extract_code(grid: &RgbaImage) -> Result<PictureCode, CodecError> {
    if grid.width() < GRID_SIZE || grid.height() < GRID_SIZE {
        return Err(CodecError::invalid(format!(
            "gradient grid must be at least {}x{}, got {}x{}",
            GRID_SIZE,
            GRID_SIZE,
            grid.width(),
            grid.height()
        )));
    }

    let luma = |x: u32, y: u32| grid.get_pixel(x, y)[0];

    let mut rows = BitWriter::new();
    for r in 0..STEPS {
        for c in 0..STEPS {
            rows.push(luma(c + 1, r) >= luma(c, r));
        }
    }

    let mut columns = BitWriter::new();
    for c in 0..STEPS {
        for r in 0..STEPS {
            columns.push(luma(c, r + 1) >= luma(c, r));
        }
    }

    Ok(PictureCode::from_segments(rows.word, columns.word))
}
