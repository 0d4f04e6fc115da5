//! Urgency scoring.
//!
//! A fixed linear combination of the four triage signals. Pure and
//! bit-reproducible: identical inputs always produce the identical score.

use crate::config::UrgencyWeights;
use civica_proto::UrgencyLevel;

/// Combines triage signals into a single bounded urgency value.
#[derive(Debug, Clone)]
pub struct UrgencyCalculator {
    weights: UrgencyWeights,
}

impl UrgencyCalculator {
    /// Creates a calculator with the given weights.
    pub fn new(weights: &UrgencyWeights) -> Self {
        Self {
            weights: weights.clone(),
        }
    }

    /// Computes the urgency score, clamped to [0, 1].
    pub fn score(
        &self,
        sentiment_score: f32,
        category_confidence: f32,
        hazard_score: f32,
        trust_score: f32,
    ) -> f32 {
        let w = &self.weights;
        (w.sentiment * sentiment_score
            + w.category_confidence * category_confidence
            + w.hazard * hazard_score
            + w.trust * trust_score)
            .clamp(0.0, 1.0)
    }

    /// Derives the urgency band for a score.
    pub fn level(&self, score: f32) -> UrgencyLevel {
        if score >= self.weights.critical_threshold {
            UrgencyLevel::Critical
        } else if score >= self.weights.urgent_threshold {
            UrgencyLevel::Urgent
        } else {
            UrgencyLevel::Normal
        }
    }
}

impl Default for UrgencyCalculator {
    fn default() -> Self {
        Self::new(&UrgencyWeights::default())
    }
}
