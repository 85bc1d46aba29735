//! Acceptance rules applied to decoded pictures before they are fingerprinted.

use super::DecodedPicture;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the Spotlight landscape wallpapers
pub const WALLPAPER_MIN_WIDTH: u32 = 1600;

/// Why a decoded picture was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Stored in some other format
    NotJpeg { format: ImageFormat },
    /// Narrower than the configured minimum
    TooNarrow { width: u32, min_width: u32 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotJpeg { format } => write!(f, "not a JPEG ({:?})", format),
            RejectReason::TooNarrow { width, min_width } => {
                write!(f, "too narrow ({}px, need at least {}px)", width, min_width)
            }
        }
    }
}

/// Which decoded pictures are worth fingerprinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureFilter {
    /// Only accept JPEG content
    pub jpeg_only: bool,
    /// Minimum width in pixels, if any
    pub min_width: Option<u32>,
}

impl Default for PictureFilter {
    fn default() -> Self {
        Self {
            jpeg_only: true,
            min_width: None,
        }
    }
}

impl PictureFilter {
    /// Accept every decodable picture
    pub fn any() -> Self {
        Self {
            jpeg_only: false,
            min_width: None,
        }
    }

    /// JPEG wallpapers at least [`WALLPAPER_MIN_WIDTH`] wide; icons and
    /// portrait crops in the asset folder are narrower
    pub fn wallpapers() -> Self {
        Self {
            jpeg_only: true,
            min_width: Some(WALLPAPER_MIN_WIDTH),
        }
    }

    /// Require JPEG content or not
    pub fn with_jpeg_only(mut self, jpeg_only: bool) -> Self {
        self.jpeg_only = jpeg_only;
        self
    }

    /// Set the minimum width
    pub fn with_min_width(mut self, min_width: Option<u32>) -> Self {
        self.min_width = min_width;
        self
    }

    /// Check a decoded picture against the rules
    pub fn check(&self, picture: &DecodedPicture) -> Result<(), RejectReason> {
        self.check_properties(picture.format, picture.width())
    }

    /// Check a picture known only by its format and width, e.g. from the cache
    pub fn check_properties(&self, format: ImageFormat, width: u32) -> Result<(), RejectReason> {
        if self.jpeg_only && format != ImageFormat::Jpeg {
            return Err(RejectReason::NotJpeg { format });
        }

        if let Some(min_width) = self.min_width {
            if width < min_width {
                return Err(RejectReason::TooNarrow { width, min_width });
            }
        }

        Ok(())
    }
}
