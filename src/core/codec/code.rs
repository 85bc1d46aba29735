//! The picture code value type.

use crate::core::matcher::SAME_PICTURE_THRESHOLD;
use crate::error::CodecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of bits in each segment of a picture code
pub const SEGMENT_BITS: u32 = 64;

/// Total number of comparable bits in a picture code
pub const CODE_BITS: u32 = SEGMENT_BITS * 2;

/// Separator between the row and column segments in the text form
pub const SEGMENT_SEPARATOR: char = ',';

/// Length of the text form: 64 + separator + 64
pub const CODE_TEXT_LEN: usize = (CODE_BITS as usize) + 1;

/// A perceptual fingerprint made of a row-gradient and a column-gradient segment.
///
/// The first bit produced by the scan is stored as the most significant bit
/// of its segment, so the text form reads the words from high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PictureCode {
    rows: u64,
    columns: u64,
}

impl PictureCode {
    /// Build a code from its two raw segments
    pub fn from_segments(rows: u64, columns: u64) -> Self {
        Self { rows, columns }
    }

    /// Row-direction gradient bits
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Column-direction gradient bits
    pub fn columns(&self) -> u64 {
        self.columns
    }

    /// Number of differing bits across both segments
    pub fn distance(&self, other: &Self) -> u32 {
        (self.rows ^ other.rows).count_ones() + (self.columns ^ other.columns).count_ones()
    }

    /// Fraction of matching bits, between 0.0 and 1.0
    pub fn similarity(&self, other: &Self) -> f64 {
        f64::from(CODE_BITS - self.distance(other)) / f64::from(CODE_BITS)
    }

    /// True when both codes are considered the same picture
    pub fn is_match(&self, other: &Self) -> bool {
        self.similarity(other) > SAME_PICTURE_THRESHOLD
    }
}

fn write_segment(f: &mut fmt::Formatter<'_>, word: u64) -> fmt::Result {
    for bit in (0..SEGMENT_BITS).rev() {
        let c = if (word >> bit) & 1 == 1 { '1' } else { '0' };
        fmt::Write::write_char(f, c)?;
    }
    Ok(())
}

impl fmt::Display for PictureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segment(f, self.rows)?;
        fmt::Write::write_char(f, SEGMENT_SEPARATOR)?;
        write_segment(f, self.columns)
    }
}

fn parse_segment(segment: &str, name: &str) -> Result<u64, CodecError> {
    if segment.len() != SEGMENT_BITS as usize {
        return Err(CodecError::invalid(format!(
            "{} segment has {} characters, expected {}",
            name,
            segment.len(),
            SEGMENT_BITS
        )));
    }

    segment.chars().try_fold(0u64, |word, c| match c {
        '0' => Ok(word << 1),
        '1' => Ok((word << 1) | 1),
        other => Err(CodecError::invalid(format!(
            "{} segment contains '{}', only '0' and '1' are allowed",
            name, other
        ))),
    })
}

impl FromStr for PictureCode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CodecError::invalid("picture code is blank"));
        }

        let (rows, columns) = s
            .split_once(SEGMENT_SEPARATOR)
            .ok_or_else(|| CodecError::invalid("picture code has no segment separator"))?;

        Ok(Self {
            rows: parse_segment(rows, "row")?,
            columns: parse_segment(columns, "column")?,
        })
    }
}

impl Serialize for PictureCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PictureCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
