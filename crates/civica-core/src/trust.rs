//! Submitter trust scoring.
//!
//! Trust is behind a trait so future tiers (verified phone, repeat
//! reporter) can be added without touching the urgency formula's shape.

use crate::config::TrustScores;
use civica_proto::TrustClass;

/// Maps a submitter's trust class to the score used in the urgency formula.
pub trait TrustScorer: Send + Sync {
    /// Returns the trust score for the class, in [0, 1].
    fn trust_score(&self, class: TrustClass) -> f32;
}

/// The fixed two-value lookup: anonymous low, registered high.
#[derive(Debug, Clone)]
pub struct FixedTrustScorer {
    scores: TrustScores,
}

impl FixedTrustScorer {
    /// Creates a scorer from configured trust scores.
    pub fn new(scores: &TrustScores) -> Self {
        Self {
            scores: scores.clone(),
        }
    }
}

impl Default for FixedTrustScorer {
    fn default() -> Self {
        Self::new(&TrustScores::default())
    }
}

impl TrustScorer for FixedTrustScorer {
    fn trust_score(&self, class: TrustClass) -> f32 {
        match class {
            TrustClass::Anonymous => self.scores.anonymous,
            TrustClass::Registered => self.scores.registered,
        }
    }
}
