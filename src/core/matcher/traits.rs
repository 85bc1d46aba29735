//! Trait definitions for comparison strategies.

use super::{MatchType, SAME_PICTURE_THRESHOLD};

/// Strategy trait for deciding whether two codes show the same picture
pub trait ComparisonStrategy: Send + Sync {
    /// Decide based on the similarity score (0.0 to 1.0)
    fn is_match(&self, similarity: f64) -> bool;

    /// Classify the match type based on the similarity score
    fn classify(&self, similarity: f64) -> MatchType;

    /// Get the threshold used
    fn threshold(&self) -> f64;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Strict "greater than threshold" comparison strategy
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Score a pair must exceed to count as the same picture
    threshold: f64,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(SAME_PICTURE_THRESHOLD)
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_match(&self, similarity: f64) -> bool {
        similarity > self.threshold
    }

    fn classify(&self, similarity: f64) -> MatchType {
        MatchType::from_similarity(similarity, self.threshold)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: codes agreeing on more than {:.1}% of their bits show the same picture",
            self.threshold * 100.0
        )
    }
}
