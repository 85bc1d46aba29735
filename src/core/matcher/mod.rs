//! # Matcher Module
//!
//! Decides whether two picture codes show the same picture.
//!
//! ## How It Works
//! 1. Count the positions where two codes agree
//! 2. Divide by the code length to get a score between 0.0 and 1.0
//! 3. Scores strictly above [`SAME_PICTURE_THRESHOLD`] are the same picture
//!
//! ## Thresholds
//! | Flipped bits | Score  | Verdict   |
//! |--------------|--------|-----------|
//! | 0            | 1.000  | Identical |
//! | 1-6          | ≥0.953 | Same      |
//! | 7+           | ≤0.945 | Different |
//!
//! Catalog lookups return the first matching entry in iteration order, so the
//! order in which a catalog was filled decides between several candidates.

mod traits;

pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::catalog::CatalogEntry;
use crate::core::codec::PictureCode;
use crate::error::MatchError;
use serde::{Deserialize, Serialize};

/// Score two codes must exceed to count as the same picture
pub const SAME_PICTURE_THRESHOLD: f64 = 0.95;

/// Classification of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Every position agrees
    Identical,
    /// Above the threshold, re-encodes and rescales land here
    NearIdentical,
    /// At or below the threshold
    Different,
}

impl MatchType {
    /// Classify a score against a threshold
    pub fn from_similarity(similarity: f64, threshold: f64) -> Self {
        if similarity >= 1.0 {
            MatchType::Identical
        } else if similarity > threshold {
            MatchType::NearIdentical
        } else {
            MatchType::Different
        }
    }

    /// Check if this match type counts as the same picture
    pub fn is_same_picture(&self) -> bool {
        matches!(self, MatchType::Identical | MatchType::NearIdentical)
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Identical => write!(f, "Identical"),
            MatchType::NearIdentical => write!(f, "Same picture"),
            MatchType::Different => write!(f, "Different"),
        }
    }
}

/// Similarity of two textual picture codes.
///
/// Compares character by character, so any pair of equally long code strings
/// can be scored, including ones read back from a saved catalog.
pub fn similarity(code_a: &str, code_b: &str) -> Result<f64, MatchError> {
    if code_a.trim().is_empty() {
        return Err(MatchError::InvalidInput {
            reason: "picture code A is blank".to_string(),
        });
    }

    if code_b.trim().is_empty() {
        return Err(MatchError::InvalidInput {
            reason: "picture code B is blank".to_string(),
        });
    }

    let len_a = code_a.chars().count();
    let len_b = code_b.chars().count();
    if len_a != len_b {
        return Err(MatchError::InvalidInput {
            reason: format!("picture codes differ in length ({} vs {})", len_a, len_b),
        });
    }

    let differing = code_a
        .chars()
        .zip(code_b.chars())
        .filter(|(a, b)| a != b)
        .count();

    Ok((len_a - differing) as f64 / len_a as f64)
}

/// True when both codes are considered the same picture
pub fn is_match(code_a: &PictureCode, code_b: &PictureCode) -> bool {
    code_a.is_match(code_b)
}

/// First entry, in iteration order, that shows the same picture as `code`
pub fn find_match<'a, I>(code: &PictureCode, entries: I) -> Option<&'a CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    find_match_with(code, entries, &ThresholdStrategy::default())
}

/// Like [`find_match`], with a custom strategy
pub fn find_match_with<'a, I>(
    code: &PictureCode,
    entries: I,
    strategy: &dyn ComparisonStrategy,
) -> Option<&'a CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    entries
        .into_iter()
        .find(|entry| strategy.is_match(entry.code().similarity(code)))
}

/// True when any entry shows the same picture as `code`
pub fn exists<'a, I>(code: &PictureCode, entries: I) -> bool
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    find_match(code, entries).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use std::path::PathBuf;

    fn code_with_flips(base: &PictureCode, row_mask: u64) -> PictureCode {
        PictureCode::from_segments(base.rows() ^ row_mask, base.columns())
    }

    fn base_code() -> PictureCode {
        PictureCode::from_segments(0xAAAA_5555_F0F0_0F0F, 0x1234_5678_9ABC_DEF0)
    }

    #[test]
    fn text_similarity_of_identical_codes_is_one() {
        let text = base_code().to_string();
        assert_eq!(similarity(&text, &text).unwrap(), 1.0);
    }

    #[test]
    fn text_similarity_counts_differing_positions() {
        assert_eq!(similarity("1100", "1000").unwrap(), 0.75);
        assert_eq!(similarity("1111", "0000").unwrap(), 0.0);
    }

    #[test]
    fn text_similarity_of_one_flip_is_above_threshold() {
        let a = base_code();
        let b = code_with_flips(&a, 1);

        let score = similarity(&a.to_string(), &b.to_string()).unwrap();
        assert!(score > 0.992 && score < 1.0);
    }

    #[test]
    fn text_similarity_rejects_blank_codes() {
        assert!(matches!(
            similarity("", "0101"),
            Err(MatchError::InvalidInput { .. })
        ));
        assert!(matches!(
            similarity("0101", "   "),
            Err(MatchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn text_similarity_rejects_length_mismatch() {
        assert!(matches!(
            similarity("0101", "01010"),
            Err(MatchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn match_type_from_similarity() {
        let t = SAME_PICTURE_THRESHOLD;
        assert_eq!(MatchType::from_similarity(1.0, t), MatchType::Identical);
        assert_eq!(MatchType::from_similarity(0.99, t), MatchType::NearIdentical);
        assert_eq!(MatchType::from_similarity(0.95, t), MatchType::Different);
        assert!(MatchType::NearIdentical.is_same_picture());
        assert!(!MatchType::Different.is_same_picture());
    }

    #[test]
    fn find_match_in_empty_catalog_is_none() {
        let catalog = Catalog::new();
        assert!(find_match(&base_code(), &catalog).is_none());
        assert!(!exists(&base_code(), &catalog));
    }

    #[test]
    fn find_match_returns_first_qualifying_entry() {
        let base = base_code();
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code_with_flips(&base, u64::MAX), "/far.jpg"));
        catalog.insert(CatalogEntry::new(code_with_flips(&base, 0b11), "/first.jpg"));
        catalog.insert(CatalogEntry::new(base, "/exact.jpg"));

        let found = find_match(&base, &catalog).unwrap();
        assert_eq!(found.path(), PathBuf::from("/first.jpg").as_path());
    }

    #[test]
    fn find_match_ignores_distant_codes() {
        let base = base_code();
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code_with_flips(&base, 0b111_1111), "/seven.jpg"));

        assert!(find_match(&base, &catalog).is_none());
        assert!(!exists(&base, &catalog));
    }

    #[test]
    fn custom_strategy_changes_only_the_threshold() {
        let base = base_code();
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code_with_flips(&base, 0b111_1111), "/seven.jpg"));

        let lenient = ThresholdStrategy::new(0.9);
        assert!(find_match_with(&base, &catalog, &lenient).is_some());
    }

    #[test]
    fn is_match_agrees_with_code_method() {
        let a = base_code();
        let b = code_with_flips(&a, 0b10_0000);
        assert_eq!(is_match(&a, &b), a.is_match(&b));
        assert!(is_match(&a, &b));
    }
}
